//! # Planner Calculation Engine
//!
//! 成品批次分配引擎：庫存帳本、優先順序分配、缺料彙總與採購單追蹤

pub mod aggregation;
pub mod allocation;
pub mod ledger;
pub mod planner;
pub mod po_tracking;

// Re-export 主要類型
pub use aggregation::{RmShortageSummary, ShortageAggregator};
pub use allocation::{AllocationEngine, AllocationOutcome};
pub use ledger::{RunningLedger, StockLedger, StockSnapshot, StockView};
pub use planner::Planner;
pub use po_tracking::{PoStatusEntry, PoTracker};

use chrono::NaiveDate;
use planner_core::AllocationResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 規劃結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    /// 本次規劃ID
    pub run_id: Uuid,

    /// 規劃生產日
    pub plan_date: NaiveDate,

    /// 計算精度
    pub decimal_places: u32,

    /// 批次單位（Kg）
    pub batch_size: u32,

    /// 本次使用的優先順序
    pub priority_order: Vec<String>,

    /// 各成品分配結果（依優先順序）
    pub results: Vec<AllocationResult>,

    /// 依原料彙總的採購優先清單
    pub procurement: Vec<RmShortageSummary>,

    /// 採購單到貨狀態
    pub po_status: Vec<PoStatusEntry>,

    /// 彙總指標
    pub summary: PlanSummary,

    /// 分配後的原料餘額
    pub remaining_stock: BTreeMap<String, Decimal>,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl PlanResult {
    /// 查詢單一成品的結果
    pub fn result_for(&self, fg_code: &str) -> Option<&AllocationResult> {
        self.results.iter().find(|r| r.fg_code == fg_code)
    }

    /// 可生產（Ready）的成品結果
    pub fn ready_results(&self) -> impl Iterator<Item = &AllocationResult> {
        self.results.iter().filter(|r| r.is_ready())
    }

    /// 有缺料記錄的成品及其明細（依優先順序）
    pub fn shortage_details(&self) -> Vec<(&str, Vec<String>)> {
        self.results
            .iter()
            .filter(|r| !r.shortages.is_empty())
            .map(|r| (r.fg_code.as_str(), r.shortage_lines()))
            .collect()
    }

    pub fn has_shortages(&self) -> bool {
        self.results.iter().any(|r| !r.shortages.is_empty())
    }
}

/// 規劃彙總指標
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// 可生產成品數
    pub producible_fg_count: usize,

    /// 總產量（Kg）
    pub total_volume: Decimal,

    /// 總批次
    pub total_batches: u64,

    /// 延誤採購單數
    pub delayed_po_count: usize,
}

impl PlanSummary {
    /// 由分配結果計算彙總
    pub fn from_results(results: &[AllocationResult], delayed_po_count: usize) -> Self {
        Self {
            producible_fg_count: results.iter().filter(|r| r.is_ready()).count(),
            total_volume: results.iter().map(|r| r.actual_capacity).sum(),
            total_batches: results
                .iter()
                .fold(0u64, |acc, r| acc.saturating_add(r.actual_batches)),
            delayed_po_count,
        }
    }
}

/// 規劃警告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanWarning {
    pub fg_code: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(fg_code: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            fg_code,
            message,
            severity,
        }
    }

    pub fn info(fg_code: String, message: String) -> Self {
        Self::new(fg_code, message, WarningSeverity::Info)
    }

    pub fn warning(fg_code: String, message: String) -> Self {
        Self::new(fg_code, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
