//! # FG Planner
//!
//! 成品批次生產規劃：依優先順序將原料庫存分配給各成品，
//! 以 25 Kg 為批次單位計算最大與實際產能，並彙總缺料與採購單到貨狀態。
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use fg_planner::prelude::*;
//! use rust_decimal::Decimal;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ctx = PlanningContext::new();
//! ctx.replace_stock(vec![RmStock::new("RM1", Decimal::from(100))?]);
//! ctx.merge_formulas(vec![FormulaLine::new("FG-A", "RM1", Decimal::from(25))?]);
//! ctx.select_all_fgs();
//!
//! let plan_date = NaiveDate::from_ymd_opt(2025, 11, 10).ok_or("invalid date")?;
//! let result = Planner::new(&ctx).run(plan_date)?;
//! println!("{}", capability_table(&result)?);
//! # Ok(())
//! # }
//! ```

pub use planner_calc;
pub use planner_core;
pub use planner_ingest;
pub use planner_report;

/// 常用類型
pub mod prelude {
    pub use planner_calc::{
        PlanResult, PlanSummary, PlanWarning, Planner, PoStatusEntry, RmShortageSummary,
        WarningSeverity,
    };
    pub use planner_core::{
        AllocationResult, AllocationStatus, FormulaLine, MergeOutcome, MissingInput, PlanError,
        PlanningConfig, PlanningContext, PoStatus, PurchaseOrder, RmStock, ShortageKind,
        ShortageRecord,
    };
    pub use planner_ingest::{
        import_formula_files, FormulaImporter, ImportError, PurchaseOrderImporter, StockImporter,
        TableImporter,
    };
    pub use planner_report::{capability_table, to_json_pretty, FgPalette, HtmlReport, ReportContext};
}
