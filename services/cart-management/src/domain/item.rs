//! 商品实体

use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// 用户不存在时在商品名称位置返回的标记
pub const UNKNOWN_USER_MARKER: &str = "User does not exist";

/// 商品
///
/// `id` 是目录内的唯一标识；入库后不可修改。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// 购物车查询中代表未知用户的哨兵商品
    pub fn unknown_user() -> Self {
        Self {
            name: UNKNOWN_USER_MARKER.to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), CartError> {
        if self.id.trim().is_empty() {
            return Err(CartError::MalformedItem("item id must not be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(CartError::MalformedItem(format!(
                "item {} has an empty name",
                self.id
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CartError::MalformedItem(format!(
                "item {} has an invalid price {}",
                self.id, self.price
            )));
        }
        Ok(())
    }
}

/// 删除或批量添加的回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub id: String,
    pub message: String,
}

impl ReportSummary {
    pub fn removed(id: &str, remaining: usize) -> Self {
        Self {
            id: id.to_string(),
            message: format!(
                "Item Id: {} successfully removed. Current items: {}",
                id, remaining
            ),
        }
    }
}

/// 购物车查询键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
}
