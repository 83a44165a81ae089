//! 缺料彙總
//!
//! 將各成品的缺料記錄依原料重新分組，產出依短缺量排序的採購優先清單。

use planner_core::{AllocationResult, PlanningConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// 單一原料的缺料彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmShortageSummary {
    /// 原料代碼
    pub rm_code: String,

    /// 總需求（Kg）
    pub total_required: Decimal,

    /// 總可用（Kg，各成品計算當下的可用量加總）
    pub total_available: Decimal,

    /// 總短缺（Kg）
    pub total_shortage: Decimal,

    /// 受影響的成品
    pub affected_fgs: BTreeSet<String>,
}

impl RmShortageSummary {
    fn new(rm_code: &str) -> Self {
        Self {
            rm_code: rm_code.to_string(),
            total_required: Decimal::ZERO,
            total_available: Decimal::ZERO,
            total_shortage: Decimal::ZERO,
            affected_fgs: BTreeSet::new(),
        }
    }

    /// 受影響成品數
    pub fn affected_fg_count(&self) -> usize {
        self.affected_fgs.len()
    }
}

/// 缺料彙總計算器
pub struct ShortageAggregator;

impl ShortageAggregator {
    /// 依原料彙總缺料，按總短缺量由大到小排序（相同時依原料代碼）
    ///
    /// 無效需求記錄沒有數量意義，不納入彙總。
    pub fn aggregate(results: &[AllocationResult], config: &PlanningConfig) -> Vec<RmShortageSummary> {
        let mut by_rm: HashMap<&str, RmShortageSummary> = HashMap::new();

        for result in results {
            for record in result.shortages.iter().filter(|s| s.is_material_shortage()) {
                let summary = by_rm
                    .entry(record.rm_code.as_str())
                    .or_insert_with(|| RmShortageSummary::new(&record.rm_code));

                summary.total_required += record.required;
                summary.total_available += record.available;
                summary.total_shortage += record.shortage;
                summary.affected_fgs.insert(result.fg_code.clone());
            }
        }

        let mut summaries: Vec<RmShortageSummary> = by_rm
            .into_values()
            .map(|mut s| {
                s.total_required = config.round(s.total_required);
                s.total_available = config.round(s.total_available);
                s.total_shortage = config.round(s.total_shortage);
                s
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.total_shortage
                .cmp(&a.total_shortage)
                .then_with(|| a.rm_code.cmp(&b.rm_code))
        });

        tracing::debug!("缺料彙總：{} 種原料", summaries.len());

        summaries
    }
}
