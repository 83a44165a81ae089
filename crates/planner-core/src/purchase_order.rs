//! 採購單模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{ensure_non_negative, normalize_code, Result};

/// 採購單到貨狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoStatus {
    /// 到貨日早於規劃生產日（已延誤）
    Delayed,
    /// 到貨日不早於規劃生產日
    Incoming,
}

impl fmt::Display for PoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoStatus::Delayed => write!(f, "Delayed"),
            PoStatus::Incoming => write!(f, "Incoming"),
        }
    }
}

/// 原料採購單
///
/// 採購單不會自動加入庫存，僅用於追蹤到貨延誤。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// 採購單ID
    pub id: Uuid,

    /// 原料代碼
    pub rm_code: String,

    /// 採購數量（Kg）
    pub quantity: Decimal,

    /// 預計到貨日
    pub arrival_date: NaiveDate,

    /// 來源單據
    pub source_ref: Option<String>,
}

impl PurchaseOrder {
    /// 創建新的採購單
    pub fn new(rm_code: &str, quantity: Decimal, arrival_date: NaiveDate) -> Result<Self> {
        let rm_code = normalize_code(rm_code)?;
        ensure_non_negative(&rm_code, quantity)?;
        Ok(Self {
            id: Uuid::new_v4(),
            rm_code,
            quantity,
            arrival_date,
            source_ref: None,
        })
    }

    /// 建構器模式：設置來源單據
    pub fn with_source_ref(mut self, source_ref: String) -> Self {
        self.source_ref = Some(source_ref);
        self
    }

    /// 依規劃生產日判斷到貨狀態
    pub fn status_on(&self, plan_date: NaiveDate) -> PoStatus {
        if self.arrival_date < plan_date {
            PoStatus::Delayed
        } else {
            PoStatus::Incoming
        }
    }
}
