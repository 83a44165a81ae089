//! # Planner Report
//!
//! 規劃結果輸出：HTML 報表、文字產能表、JSON 匯出與成品顏色配置

pub mod format;
pub mod html;
pub mod json;
pub mod palette;
pub mod text;

pub use html::HtmlReport;
pub use json::{to_json, to_json_pretty};
pub use palette::{FgPalette, FG_COLORS};
pub use text::capability_table;

use chrono::NaiveDateTime;
use thiserror::Error;

/// 報表錯誤
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("報表格式化失敗: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("JSON 序列化失敗: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result 類型別名
pub type Result<T> = std::result::Result<T, ReportError>;

/// 報表標題資訊
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// 報表標題
    pub title: String,

    /// 產生時間（由呼叫端提供）
    pub generated_at: NaiveDateTime,

    /// 頁尾單位名稱
    pub organisation: Option<String>,
}

impl ReportContext {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            title: "MRP Production Planning Summary Report".to_string(),
            generated_at,
            organisation: None,
        }
    }

    /// 建構器模式：設置標題
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// 建構器模式：設置頁尾單位
    pub fn with_organisation(mut self, organisation: impl Into<String>) -> Self {
        self.organisation = Some(organisation.into());
        self
    }

    pub(crate) fn generated_display(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};
    use planner_calc::{PlanResult, Planner};
    use planner_core::{FormulaLine, PlanningContext, PurchaseOrder, RmStock};
    use rust_decimal::Decimal;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    pub fn generated_at() -> NaiveDateTime {
        date(10).and_hms_opt(8, 0, 0).unwrap()
    }

    /// FG-A 可生產 4 批，FG-B 缺 RM1 / RM2，一張延誤採購單
    pub fn sample_result() -> PlanResult {
        let mut ctx = PlanningContext::new();
        ctx.replace_stock(vec![
            RmStock::new("RM1", Decimal::from(100)).unwrap(),
            RmStock::new("RM2", Decimal::from(40)).unwrap(),
        ]);
        ctx.merge_formulas(vec![
            FormulaLine::new("FG-A", "RM1", Decimal::from(25)).unwrap(),
            FormulaLine::new("FG-B", "RM1", Decimal::from(10)).unwrap(),
            FormulaLine::new("FG-B", "RM2", Decimal::from(50)).unwrap(),
        ]);
        ctx.set_priority_order(["FG-A", "FG-B"]);
        ctx.replace_purchase_orders(vec![
            PurchaseOrder::new("RM2", Decimal::from(100), date(3)).unwrap(),
            PurchaseOrder::new("RM1", Decimal::new(12505, 1), date(20)).unwrap(),
        ]);

        Planner::new(&ctx).run(date(10)).unwrap()
    }
}
