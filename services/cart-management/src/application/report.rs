//! Add 调用的逐项结果汇总

use crate::domain::ReportSummary;

/// 逐项应用，不回滚；只在输入正常结束时转换为回执
#[derive(Debug, Default)]
pub struct AddReport {
    added: usize,
    rejected: usize,
    last_id: Option<String>,
}

impl AddReport {
    pub fn record_added(&mut self, id: String) {
        self.added += 1;
        self.last_id = Some(id);
    }

    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    pub fn added(&self) -> usize {
        self.added
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn into_summary(self, current_items: usize) -> ReportSummary {
        let message = if self.rejected == 0 {
            format!(
                "{} items successfully added. Current items: {}",
                self.added, current_items
            )
        } else {
            format!(
                "{} items added, {} rejected. Current items: {}",
                self.added, self.rejected, current_items
            )
        };

        ReportSummary {
            id: self.last_id.unwrap_or_default(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_without_rejections() {
        let mut report = AddReport::default();
        report.record_added("5".into());
        report.record_added("6".into());

        let summary = report.into_summary(4);
        assert_eq!(summary.id, "6");
        assert_eq!(summary.message, "2 items successfully added. Current items: 4");
    }

    #[test]
    fn test_summary_with_rejections() {
        let mut report = AddReport::default();
        report.record_rejected();
        assert_eq!(report.added(), 0);
        assert_eq!(report.rejected(), 1);

        let summary = report.into_summary(2);
        assert_eq!(summary.id, "");
        assert_eq!(summary.message, "0 items added, 1 rejected. Current items: 2");
    }
}
