//! 分配結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 成品分配狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStatus {
    /// 至少完成一整批
    Ready,
    /// 不足一整批
    Shortage,
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationStatus::Ready => write!(f, "Ready"),
            AllocationStatus::Shortage => write!(f, "Shortage"),
        }
    }
}

/// 缺料類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortageKind {
    /// 配方用量 ≤ 0，無法計算
    InvalidRequirement,
    /// 原料完全無庫存
    OutOfStock,
    /// 庫存不足以滿足需求
    Insufficient,
}

/// 單一原料對單一成品的缺料記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortageRecord {
    /// 原料代碼
    pub rm_code: String,

    /// 缺料類型
    pub kind: ShortageKind,

    /// 需求數量（Kg）
    pub required: Decimal,

    /// 可用數量（Kg）
    pub available: Decimal,

    /// 短缺數量（Kg），無效需求時為 0
    pub shortage: Decimal,

    /// 顯示用小數位數
    pub decimal_places: u32,
}

impl ShortageRecord {
    /// 無效需求（配方用量 ≤ 0）
    pub fn invalid_requirement(rm_code: &str, required: Decimal, decimal_places: u32) -> Self {
        Self {
            rm_code: rm_code.to_string(),
            kind: ShortageKind::InvalidRequirement,
            required,
            available: Decimal::ZERO,
            shortage: Decimal::ZERO,
            decimal_places,
        }
    }

    /// 完全無庫存，短缺量等於需求量
    pub fn out_of_stock(rm_code: &str, required: Decimal, decimal_places: u32) -> Self {
        Self {
            rm_code: rm_code.to_string(),
            kind: ShortageKind::OutOfStock,
            required,
            available: Decimal::ZERO,
            shortage: required,
            decimal_places,
        }
    }

    /// 庫存不足，短缺量 = 需求 - 可用
    pub fn insufficient(
        rm_code: &str,
        required: Decimal,
        available: Decimal,
        shortage: Decimal,
        decimal_places: u32,
    ) -> Self {
        Self {
            rm_code: rm_code.to_string(),
            kind: ShortageKind::Insufficient,
            required,
            available,
            shortage,
            decimal_places,
        }
    }

    /// 是否為實際缺料（排除無效需求）
    pub fn is_material_shortage(&self) -> bool {
        self.kind != ShortageKind::InvalidRequirement
    }
}

impl fmt::Display for ShortageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.decimal_places as usize;
        match self.kind {
            ShortageKind::InvalidRequirement => write!(
                f,
                "{}: Invalid requirement ({:.*} Kg)",
                self.rm_code, dp, self.required
            ),
            ShortageKind::OutOfStock | ShortageKind::Insufficient => write!(
                f,
                "{}: Required {:.*} Kg, Available {:.*} Kg, Shortage {:.*} Kg",
                self.rm_code, dp, self.required, dp, self.available, dp, self.shortage
            ),
        }
    }
}

/// 單一成品的分配結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// 成品代碼
    pub fg_code: String,

    /// 預期產能（Kg），None 表示自動（盡量生產）
    pub expected_capacity: Option<Decimal>,

    /// 由預期產能換算的目標批次數
    pub target_batches: Option<u64>,

    /// 以期初庫存計算的最大批次數
    pub max_batches: u64,

    /// 最大產能（Kg）
    pub max_capacity: Decimal,

    /// 實際分配批次數
    pub actual_batches: u64,

    /// 實際產能（Kg）
    pub actual_capacity: Decimal,

    /// 分配狀態
    pub status: AllocationStatus,

    /// 不足的原料數
    pub missing_rm_count: usize,

    /// 缺料明細（依配方順序）
    pub shortages: Vec<ShortageRecord>,
}

impl AllocationResult {
    pub fn is_ready(&self) -> bool {
        self.status == AllocationStatus::Ready
    }

    /// 人類可讀的缺料明細
    pub fn shortage_lines(&self) -> Vec<String> {
        self.shortages.iter().map(|s| s.to_string()).collect()
    }

    /// 狀態說明
    pub fn status_detail(&self, batch_size: Decimal) -> String {
        match self.status {
            AllocationStatus::Ready => "Sufficient RM".to_string(),
            AllocationStatus::Shortage if self.max_capacity >= batch_size => {
                let expected = self.expected_capacity.unwrap_or(Decimal::ZERO);
                format!("Insufficient RM for expected {}Kg", expected.normalize())
            }
            AllocationStatus::Shortage => {
                format!("Insufficient RM for minimum {}Kg batch", batch_size.normalize())
            }
        }
    }

    /// 預期產能顯示文字
    pub fn expected_display(&self) -> String {
        match self.expected_capacity {
            Some(expected) => format!("{:.1} Kg", expected),
            None => "Auto".to_string(),
        }
    }

    /// 缺料數顯示文字
    pub fn missing_display(&self) -> String {
        if self.missing_rm_count == 0 {
            "None".to_string()
        } else {
            format!("{} RM(s)", self.missing_rm_count)
        }
    }
}
