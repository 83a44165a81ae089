//! # Planner Core
//!
//! 核心資料模型與類型定義（原料庫存、採購單、成品配方、規劃上下文）

pub mod config;
pub mod context;
pub mod formula;
pub mod plan;
pub mod priority;
pub mod purchase_order;
pub mod stock;

// Re-export 主要類型
pub use config::{PlanningConfig, DEFAULT_BATCH_SIZE, DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};
pub use context::{MergeOutcome, MissingInput, PlanningContext};
pub use formula::{FormulaLine, FormulaRegistry};
pub use plan::{AllocationResult, AllocationStatus, ShortageKind, ShortageRecord};
pub use priority::PriorityOrder;
pub use purchase_order::{PoStatus, PurchaseOrder};
pub use stock::RmStock;

use rust_decimal::Decimal;

/// 規劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("小數位數超出範圍（0-{max}）: {0}", max = MAX_DECIMAL_PLACES)]
    InvalidDecimalPlaces(u32),

    #[error("數量不可為負: {code} = {quantity}")]
    NegativeQuantity { code: String, quantity: Decimal },

    #[error("物料代碼不可為空")]
    EmptyCode,

    #[error("規劃輸入不完整: {}", format_missing(.0))]
    IncompleteInputs(Vec<MissingInput>),

    #[error("其他錯誤: {0}")]
    Other(String),
}

fn format_missing(missing: &[MissingInput]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// 清理物料代碼（去除前後空白），空代碼視為錯誤
pub(crate) fn normalize_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(PlanError::EmptyCode);
    }
    Ok(trimmed.to_string())
}

/// 檢查數量非負
pub(crate) fn ensure_non_negative(code: &str, quantity: Decimal) -> Result<()> {
    if quantity < Decimal::ZERO {
        return Err(PlanError::NegativeQuantity {
            code: code.to_string(),
            quantity,
        });
    }
    Ok(())
}
