//! 採購單到貨追蹤

use chrono::NaiveDate;
use planner_core::{PoStatus, PurchaseOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 採購單到貨狀態記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoStatusEntry {
    pub po_id: Uuid,
    pub rm_code: String,
    pub quantity: Decimal,
    pub arrival_date: NaiveDate,
    pub status: PoStatus,
}

/// 採購單追蹤器
pub struct PoTracker;

impl PoTracker {
    /// 依規劃生產日分類所有採購單，按到貨日排序（同日保持原順序）
    pub fn classify(orders: &[PurchaseOrder], plan_date: NaiveDate) -> Vec<PoStatusEntry> {
        let mut entries: Vec<PoStatusEntry> = orders
            .iter()
            .map(|po| PoStatusEntry {
                po_id: po.id,
                rm_code: po.rm_code.clone(),
                quantity: po.quantity,
                arrival_date: po.arrival_date,
                status: po.status_on(plan_date),
            })
            .collect();

        entries.sort_by_key(|e| e.arrival_date);
        entries
    }

    /// 延誤採購單數量
    pub fn delayed_count(entries: &[PoStatusEntry]) -> usize {
        entries
            .iter()
            .filter(|e| e.status == PoStatus::Delayed)
            .count()
    }

    /// 各原料採購總量
    pub fn totals_by_rm(orders: &[PurchaseOrder]) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for po in orders {
            *totals.entry(po.rm_code.clone()).or_insert(Decimal::ZERO) += po.quantity;
        }
        totals
    }
}
