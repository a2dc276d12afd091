//! 领域模型与 protobuf 消息互转

use crate::api::proto::cart as pb;
use crate::domain::{Item, ReportSummary, User};

impl From<pb::Item> for Item {
    fn from(item: pb::Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            description: item.description,
            price: item.price,
        }
    }
}

impl From<Item> for pb::Item {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            description: item.description,
            price: item.price,
        }
    }
}

impl From<ReportSummary> for pb::ReportSummary {
    fn from(summary: ReportSummary) -> Self {
        Self {
            id: summary.id,
            message: summary.message,
        }
    }
}

impl From<pb::User> for User {
    fn from(user: pb::User) -> Self {
        Self { name: user.name }
    }
}
