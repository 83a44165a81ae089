//! 原料庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ensure_non_negative, normalize_code, Result};

/// 原料庫存記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmStock {
    /// 原料代碼（區分大小寫，已去除前後空白）
    pub rm_code: String,

    /// 現有庫存（Kg）
    pub quantity: Decimal,
}

impl RmStock {
    /// 創建新的庫存記錄
    ///
    /// 代碼為空或數量為負時返回錯誤。
    pub fn new(rm_code: &str, quantity: Decimal) -> Result<Self> {
        let rm_code = normalize_code(rm_code)?;
        ensure_non_negative(&rm_code, quantity)?;
        Ok(Self { rm_code, quantity })
    }
}
