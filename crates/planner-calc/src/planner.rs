//! 規劃主流程

use chrono::NaiveDate;
use planner_core::{PlanError, PlanningContext};
use uuid::Uuid;

use crate::aggregation::ShortageAggregator;
use crate::allocation::AllocationEngine;
use crate::ledger::StockLedger;
use crate::po_tracking::PoTracker;
use crate::{PlanResult, PlanSummary};

/// 規劃器：對一份規劃上下文執行一次完整的分配
pub struct Planner<'a> {
    context: &'a PlanningContext,
}

impl<'a> Planner<'a> {
    /// 創建新的規劃器
    pub fn new(context: &'a PlanningContext) -> Self {
        Self { context }
    }

    /// 主規劃入口
    ///
    /// 輸入不完整或配置不合法時在開始前拒絕；開始後任何缺料都只反映在結果中。
    pub fn run(&self, plan_date: NaiveDate) -> planner_core::Result<PlanResult> {
        let ctx = self.context;

        let missing = ctx.missing_inputs();
        if !missing.is_empty() {
            return Err(PlanError::IncompleteInputs(missing));
        }
        ctx.config().validate()?;

        tracing::info!(
            "開始規劃：原料 {} 種，成品配方 {} 項，優先序列 {} 項，採購單 {} 筆",
            ctx.stock().len(),
            ctx.formulas().len(),
            ctx.priority_order().len(),
            ctx.purchase_orders().len()
        );

        let start_time = std::time::Instant::now();
        let config = ctx.config();

        // Step 1: 建立帳本（期初快照 + 執行帳本）
        tracing::debug!("Step 1: 建立庫存帳本（{} 位小數）", config.decimal_places());
        let ledger = StockLedger::new(ctx.stock(), config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        // Step 2: 依優先順序分配
        tracing::debug!("Step 2: 依優先順序分配");
        let engine = AllocationEngine::new(config);
        let outcome = engine.allocate_all(
            ctx.priority_order(),
            ctx.formulas(),
            ctx.expected_capacities(),
            &snapshot,
            &mut running,
        );

        // Step 3: 缺料彙總
        tracing::debug!("Step 3: 缺料彙總");
        let procurement = ShortageAggregator::aggregate(&outcome.results, config);

        // Step 4: 採購單到貨追蹤
        tracing::debug!("Step 4: 採購單追蹤");
        let po_status = PoTracker::classify(ctx.purchase_orders(), plan_date);

        let summary = PlanSummary::from_results(&outcome.results, PoTracker::delayed_count(&po_status));

        let result = PlanResult {
            run_id: Uuid::new_v4(),
            plan_date,
            decimal_places: config.decimal_places(),
            batch_size: config.batch_size(),
            priority_order: ctx.priority_order().as_slice().to_vec(),
            results: outcome.results,
            procurement,
            po_status,
            summary,
            remaining_stock: running.balances(),
            warnings: outcome.warnings,
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        };

        tracing::info!("規劃完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "可生產成品 {} 項，總產量 {} Kg，共 {} 批",
            result.summary.producible_fg_count,
            result.summary.total_volume,
            result.summary.total_batches
        );
        tracing::debug!(
            "可生產成品: {:?}",
            result.ready_results().map(|r| r.fg_code.as_str()).collect::<Vec<_>>()
        );

        Ok(result)
    }
}
