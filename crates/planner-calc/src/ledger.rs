//! 庫存帳本
//!
//! 每次規劃開始時由原料庫存建立，提供兩個互相獨立的視圖：
//! - 期初快照：只讀，用來計算各成品的最大產能
//! - 執行帳本：可扣減，用來計算實際分配並在成品完成分配後扣料
//!
//! 所有數量在比較與扣減前都會依配置精度捨入。

use planner_core::{PlanningConfig, RmStock};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// 可查詢原料數量的庫存視圖
pub trait StockView {
    /// 查詢原料可用量，未知原料返回 0
    fn quantity(&self, rm_code: &str) -> Decimal;
}

/// 庫存帳本
#[derive(Debug, Clone)]
pub struct StockLedger {
    quantities: HashMap<String, Decimal>,
    config: PlanningConfig,
}

impl StockLedger {
    /// 由原料庫存建立帳本（數量依配置精度捨入）
    pub fn new(stock: &[RmStock], config: &PlanningConfig) -> Self {
        let quantities = stock
            .iter()
            .map(|s| (s.rm_code.clone(), config.round(s.quantity)))
            .collect();

        Self {
            quantities,
            config: config.clone(),
        }
    }

    /// 期初快照（只讀）
    pub fn snapshot(&self) -> StockSnapshot {
        StockSnapshot {
            quantities: self.quantities.clone(),
        }
    }

    /// 執行帳本（可扣減）
    pub fn running(&self) -> RunningLedger {
        RunningLedger {
            quantities: self.quantities.clone(),
            config: self.config.clone(),
        }
    }

    /// 原料種類數
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

/// 期初庫存快照
#[derive(Debug, Clone)]
pub struct StockSnapshot {
    quantities: HashMap<String, Decimal>,
}

impl StockView for StockSnapshot {
    fn quantity(&self, rm_code: &str) -> Decimal {
        self.quantities.get(rm_code).copied().unwrap_or(Decimal::ZERO)
    }
}

/// 執行中的庫存帳本
#[derive(Debug, Clone)]
pub struct RunningLedger {
    quantities: HashMap<String, Decimal>,
    config: PlanningConfig,
}

impl RunningLedger {
    /// 扣減原料，返回扣減後餘額
    ///
    /// 未在帳本中的原料不做任何處理並返回 0。
    pub fn consume(&mut self, rm_code: &str, quantity: Decimal) -> Decimal {
        let amount = self.config.round(quantity);
        let Some(current) = self.quantities.get_mut(rm_code) else {
            tracing::debug!("原料 {} 不在帳本中，略過扣料", rm_code);
            return Decimal::ZERO;
        };

        let mut remaining = self.config.round(*current - amount);
        if remaining < Decimal::ZERO {
            tracing::warn!(
                "原料 {} 扣料後為負（{} - {}），以 0 計",
                rm_code,
                current,
                amount
            );
            remaining = Decimal::ZERO;
        }

        tracing::debug!("扣料: {} {} → {}", rm_code, current, remaining);
        *current = remaining;
        remaining
    }

    /// 目前所有原料餘額（依代碼排序）
    pub fn balances(&self) -> BTreeMap<String, Decimal> {
        self.quantities
            .iter()
            .map(|(code, qty)| (code.clone(), *qty))
            .collect()
    }
}

impl StockView for RunningLedger {
    fn quantity(&self, rm_code: &str) -> Decimal {
        self.quantities.get(rm_code).copied().unwrap_or(Decimal::ZERO)
    }
}
