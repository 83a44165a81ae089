//! 成品分配引擎
//!
//! 依優先順序逐一處理成品：
//! 1. 以期初快照計算最大批次（僅供參考，不影響分配）
//! 2. 解析預期產能為目標批次
//! 3. 以執行帳本計算實際批次並記錄缺料
//! 4. 量化為批次產能並判定狀態
//! 5. 只有狀態為 Ready 且批次 > 0 時才扣料

use planner_core::{
    AllocationResult, AllocationStatus, FormulaLine, FormulaRegistry, PlanningConfig,
    PriorityOrder, ShortageRecord,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::ledger::{RunningLedger, StockSnapshot, StockView};
use crate::PlanWarning;

/// 單一配方明細的計算結果
struct LineOutcome {
    batches: u64,
    shortage: Option<ShortageRecord>,
}

/// 整個優先序列的分配結果
#[derive(Debug, Clone, Default)]
pub struct AllocationOutcome {
    /// 依優先順序排列的成品結果
    pub results: Vec<AllocationResult>,
    /// 被略過的成品等提示
    pub warnings: Vec<PlanWarning>,
}

/// 分配引擎
pub struct AllocationEngine<'a> {
    config: &'a PlanningConfig,
}

impl<'a> AllocationEngine<'a> {
    /// 創建新的分配引擎
    pub fn new(config: &'a PlanningConfig) -> Self {
        Self { config }
    }

    /// 依優先順序分配所有成品
    ///
    /// 沒有配方的成品會被略過（只產生提示，不是錯誤）。
    pub fn allocate_all(
        &self,
        order: &PriorityOrder,
        formulas: &FormulaRegistry,
        expected_capacity: &HashMap<String, Decimal>,
        snapshot: &StockSnapshot,
        running: &mut RunningLedger,
    ) -> AllocationOutcome {
        let mut outcome = AllocationOutcome::default();

        for fg_code in order.iter() {
            let lines = formulas.lines_for(fg_code);
            if lines.is_empty() {
                tracing::warn!("成品 {} 沒有配方，略過", fg_code);
                outcome.warnings.push(PlanWarning::info(
                    fg_code.to_string(),
                    "沒有配方明細，未納入分配".to_string(),
                ));
                continue;
            }

            let expected = expected_capacity.get(fg_code).copied();
            let result = self.allocate(fg_code, lines, expected, snapshot, running);
            if result.shortages.iter().any(|s| !s.is_material_shortage()) {
                outcome.warnings.push(PlanWarning::warning(
                    fg_code.to_string(),
                    "配方含用量 ≤ 0 的明細，無法生產".to_string(),
                ));
            }
            outcome.results.push(result);
        }

        outcome
    }

    /// 分配單一成品並在成功時扣減執行帳本
    pub fn allocate(
        &self,
        fg_code: &str,
        lines: &[FormulaLine],
        expected_capacity: Option<Decimal>,
        snapshot: &StockSnapshot,
        running: &mut RunningLedger,
    ) -> AllocationResult {
        let expected_capacity = expected_capacity.filter(|q| *q > Decimal::ZERO);

        // Step 1: 最大產能（期初快照）
        let max_batches = self.max_batches(lines, snapshot);
        let max_capacity = self.config.capacity_of(max_batches);

        // Step 2: 目標批次
        let target_batches = self.resolve_target_batches(expected_capacity);

        // Step 3: 實際批次（執行帳本）
        let line_outcomes: Vec<LineOutcome> = lines
            .iter()
            .map(|line| match target_batches {
                Some(target) => self.line_for_target(line, target, running),
                None => self.line_for_max(line, running),
            })
            .collect();

        let mut actual_batches = line_outcomes.iter().map(|o| o.batches).min().unwrap_or(0);
        if let Some(target) = target_batches {
            actual_batches = actual_batches.min(target);
        }

        let shortages: Vec<ShortageRecord> =
            line_outcomes.into_iter().filter_map(|o| o.shortage).collect();
        let missing_rm_count = shortages.iter().filter(|s| s.is_material_shortage()).count();

        // Step 4: 量化與狀態
        let actual_capacity = self.config.capacity_of(actual_batches);
        let status = if actual_capacity >= self.config.batch_size_decimal() {
            AllocationStatus::Ready
        } else {
            AllocationStatus::Shortage
        };

        tracing::debug!(
            "成品 {}: 最大 {} Kg，實際 {} Kg（{} 批），狀態 {}",
            fg_code,
            max_capacity,
            actual_capacity,
            actual_batches,
            status
        );

        // Step 5: 扣料（只有完整批次才佔用庫存）
        if status == AllocationStatus::Ready && actual_batches > 0 {
            self.deplete(lines, actual_batches, running);
        }

        AllocationResult {
            fg_code: fg_code.to_string(),
            expected_capacity,
            target_batches,
            max_batches,
            max_capacity,
            actual_batches,
            actual_capacity,
            status,
            missing_rm_count,
            shortages,
        }
    }

    /// 以指定庫存視圖計算最大批次數
    ///
    /// 任一明細用量 ≤ 0 或庫存 ≤ 0 時該明細貢獻 0 批；空配方為 0 批。
    pub fn max_batches<V: StockView>(&self, lines: &[FormulaLine], stock: &V) -> u64 {
        lines
            .iter()
            .map(|line| {
                let qty = self.config.round(line.qty_per_batch);
                let available = stock.quantity(&line.rm_code);
                if qty <= Decimal::ZERO || available <= Decimal::ZERO {
                    0
                } else {
                    floor_batches(available, qty)
                }
            })
            .min()
            .unwrap_or(0)
    }

    /// 預期產能換算目標批次
    ///
    /// 0 < 預期 < 一批時仍以 1 批計（最小訂購量）。
    pub fn resolve_target_batches(&self, expected_capacity: Option<Decimal>) -> Option<u64> {
        let expected = expected_capacity.filter(|q| *q > Decimal::ZERO)?;
        let batches = floor_batches(expected, self.config.batch_size_decimal());
        Some(batches.max(1))
    }

    /// 有目標批次時的單一明細計算
    fn line_for_target(&self, line: &FormulaLine, target: u64, running: &RunningLedger) -> LineOutcome {
        let dp = self.config.decimal_places();
        let qty = self.config.round(line.qty_per_batch);
        let required = self
            .config
            .round(qty.checked_mul(Decimal::from(target)).unwrap_or(Decimal::MAX));
        let available = running.quantity(&line.rm_code);

        if required <= Decimal::ZERO {
            return LineOutcome {
                batches: 0,
                shortage: Some(ShortageRecord::invalid_requirement(&line.rm_code, qty, dp)),
            };
        }

        if available <= Decimal::ZERO {
            return LineOutcome {
                batches: 0,
                shortage: Some(ShortageRecord::out_of_stock(&line.rm_code, required, dp)),
            };
        }

        if available >= required {
            return LineOutcome {
                batches: target,
                shortage: None,
            };
        }

        let shortage = self.config.round(required - available);
        LineOutcome {
            batches: floor_batches(available, qty).min(target),
            shortage: Some(ShortageRecord::insufficient(
                &line.rm_code,
                required,
                available,
                shortage,
                dp,
            )),
        }
    }

    /// 無目標時的單一明細計算（盡量生產）
    fn line_for_max(&self, line: &FormulaLine, running: &RunningLedger) -> LineOutcome {
        let dp = self.config.decimal_places();
        let qty = self.config.round(line.qty_per_batch);
        let available = running.quantity(&line.rm_code);

        if qty <= Decimal::ZERO {
            return LineOutcome {
                batches: 0,
                shortage: Some(ShortageRecord::invalid_requirement(&line.rm_code, qty, dp)),
            };
        }

        if available <= Decimal::ZERO {
            return LineOutcome {
                batches: 0,
                shortage: Some(ShortageRecord::out_of_stock(&line.rm_code, qty, dp)),
            };
        }

        let batches = floor_batches(available, qty);
        let shortage = (batches == 0).then(|| {
            ShortageRecord::insufficient(
                &line.rm_code,
                qty,
                available,
                self.config.round(qty - available),
                dp,
            )
        });

        LineOutcome { batches, shortage }
    }

    /// 依實際批次扣減執行帳本
    fn deplete(&self, lines: &[FormulaLine], batches: u64, running: &mut RunningLedger) {
        for line in lines {
            let qty = self.config.round(line.qty_per_batch);
            let total = qty.checked_mul(Decimal::from(batches)).unwrap_or(Decimal::MAX);
            running.consume(&line.rm_code, total);
        }
    }
}

/// floor(available / per_unit)
///
/// 批次數超出 u64 時以 u64 上限計並記錄警告（對應產能已超過任何實際庫存）。
fn floor_batches(available: Decimal, per_unit: Decimal) -> u64 {
    match available
        .checked_div(per_unit)
        .and_then(|ratio| ratio.floor().to_u64())
    {
        Some(batches) => batches,
        None => {
            tracing::warn!(
                "批次數溢位（{} / {}），以 {} 批計",
                available,
                per_unit,
                u64::MAX
            );
            u64::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::StockLedger;
    use planner_core::{RmStock, ShortageKind};
    use rstest::rstest;

    fn stock(items: &[(&str, i64)]) -> Vec<RmStock> {
        items
            .iter()
            .map(|(rm, qty)| RmStock::new(rm, Decimal::from(*qty)).unwrap())
            .collect()
    }

    fn formula(fg: &str, items: &[(&str, i64)]) -> Vec<FormulaLine> {
        items
            .iter()
            .map(|(rm, qty)| FormulaLine::new(fg, rm, Decimal::from(*qty)).unwrap())
            .collect()
    }

    #[test]
    fn test_auto_allocation_uses_all_stock() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let ledger = StockLedger::new(&stock(&[("RM1", 100)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        let result = engine.allocate("FG-A", &formula("FG-A", &[("RM1", 25)]), None, &snapshot, &mut running);

        assert_eq!(result.max_capacity, Decimal::from(100));
        assert_eq!(result.actual_capacity, Decimal::from(100));
        assert_eq!(result.actual_batches, 4);
        assert_eq!(result.status, AllocationStatus::Ready);
        assert!(result.shortages.is_empty());
        assert_eq!(running.quantity("RM1"), Decimal::ZERO);
    }

    #[test]
    fn test_target_limits_allocation() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let ledger = StockLedger::new(&stock(&[("RM1", 100)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        let result = engine.allocate(
            "FG-A",
            &formula("FG-A", &[("RM1", 25)]),
            Some(Decimal::from(30)),
            &snapshot,
            &mut running,
        );

        assert_eq!(result.target_batches, Some(1));
        assert_eq!(result.max_capacity, Decimal::from(100));
        assert_eq!(result.actual_capacity, Decimal::from(25));
        assert_eq!(result.status, AllocationStatus::Ready);
        assert!(result.shortages.is_empty());
        assert_eq!(running.quantity("RM1"), Decimal::from(75));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(0), None)]
    #[case(Some(10), Some(1))]
    #[case(Some(24), Some(1))]
    #[case(Some(25), Some(1))]
    #[case(Some(49), Some(1))]
    #[case(Some(50), Some(2))]
    #[case(Some(130), Some(5))]
    fn test_resolve_target_batches(#[case] expected: Option<i64>, #[case] batches: Option<u64>) {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        assert_eq!(engine.resolve_target_batches(expected.map(Decimal::from)), batches);
    }

    #[test]
    fn test_batches_beyond_u32_are_not_truncated() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let stock = vec![RmStock::new("RM1", Decimal::from(1_000_000_000_000i64)).unwrap()];
        let ledger = StockLedger::new(&stock, &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();
        let lines = vec![FormulaLine::new("FG-A", "RM1", Decimal::new(1, 3)).unwrap()];

        let result = engine.allocate("FG-A", &lines, None, &snapshot, &mut running);

        assert_eq!(result.max_batches, 1_000_000_000_000_000);
        assert_eq!(result.actual_batches, 1_000_000_000_000_000);
        assert_eq!(result.actual_capacity, Decimal::from(25_000_000_000_000_000i64));
        assert_eq!(result.status, AllocationStatus::Ready);
        assert_eq!(running.quantity("RM1"), Decimal::ZERO);
    }

    #[test]
    fn test_floor_batches_clamps_on_overflow() {
        assert_eq!(floor_batches(Decimal::from(100), Decimal::from(25)), 4);
        assert_eq!(floor_batches(Decimal::MAX, Decimal::new(1, 6)), u64::MAX);
    }

    #[test]
    fn test_target_shortfall_is_reported_not_substituted() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let ledger = StockLedger::new(&stock(&[("RM1", 60), ("RM2", 1000)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        // 目標 4 批：RM1 需要 80，只有 60 → 只能 3 批
        let result = engine.allocate(
            "FG-A",
            &formula("FG-A", &[("RM1", 20), ("RM2", 10)]),
            Some(Decimal::from(100)),
            &snapshot,
            &mut running,
        );

        assert_eq!(result.target_batches, Some(4));
        assert_eq!(result.actual_batches, 3);
        assert_eq!(result.actual_capacity, Decimal::from(75));
        assert_eq!(result.status, AllocationStatus::Ready);
        assert_eq!(result.missing_rm_count, 1);
        assert_eq!(result.shortages.len(), 1);

        let shortage = &result.shortages[0];
        assert_eq!(shortage.rm_code, "RM1");
        assert_eq!(shortage.kind, ShortageKind::Insufficient);
        assert_eq!(shortage.required, Decimal::from(80));
        assert_eq!(shortage.available, Decimal::from(60));
        assert_eq!(shortage.shortage, Decimal::from(20));

        // 扣料以實際批次計
        assert_eq!(running.quantity("RM1"), Decimal::ZERO);
        assert_eq!(running.quantity("RM2"), Decimal::from(970));
    }

    #[test]
    fn test_shortage_consumes_nothing() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let ledger = StockLedger::new(&stock(&[("RM1", 100), ("RM2", 5)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        let result = engine.allocate(
            "FG-A",
            &formula("FG-A", &[("RM1", 25), ("RM2", 10)]),
            None,
            &snapshot,
            &mut running,
        );

        assert_eq!(result.status, AllocationStatus::Shortage);
        assert_eq!(result.actual_batches, 0);
        assert_eq!(result.missing_rm_count, 1);
        assert_eq!(
            result.shortage_lines(),
            vec!["RM2: Required 10.000 Kg, Available 5.000 Kg, Shortage 5.000 Kg"]
        );
        assert_eq!(running.quantity("RM1"), Decimal::from(100));
        assert_eq!(running.quantity("RM2"), Decimal::from(5));
    }

    #[test]
    fn test_missing_rm_is_out_of_stock() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let ledger = StockLedger::new(&stock(&[("RM1", 100)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        let result = engine.allocate(
            "FG-A",
            &formula("FG-A", &[("RM1", 25), ("RM-NEW", 5)]),
            Some(Decimal::from(50)),
            &snapshot,
            &mut running,
        );

        assert_eq!(result.max_batches, 0);
        assert_eq!(result.status, AllocationStatus::Shortage);
        assert_eq!(result.shortages[0].kind, ShortageKind::OutOfStock);
        assert_eq!(result.shortages[0].required, Decimal::from(10));
        assert_eq!(result.shortages[0].shortage, Decimal::from(10));
    }

    #[test]
    fn test_zero_quantity_is_invalid_requirement() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let ledger = StockLedger::new(&stock(&[("RM1", 100), ("RM2", 100)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        let result = engine.allocate(
            "FG-A",
            &formula("FG-A", &[("RM1", 25), ("RM2", 0)]),
            None,
            &snapshot,
            &mut running,
        );

        assert_eq!(result.actual_batches, 0);
        assert_eq!(result.status, AllocationStatus::Shortage);
        assert_eq!(result.missing_rm_count, 0);
        assert_eq!(result.shortage_lines(), vec!["RM2: Invalid requirement (0.000 Kg)"]);
    }

    #[test]
    fn test_invalid_formula_raises_warning() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let mut formulas = FormulaRegistry::new();
        for line in formula("A", &[("X", 0)]) {
            formulas.insert(line);
        }
        let ledger = StockLedger::new(&stock(&[("X", 30)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        let outcome = engine.allocate_all(
            &PriorityOrder::new(["A"]),
            &formulas,
            &HashMap::new(),
            &snapshot,
            &mut running,
        );

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.warnings[0].severity, crate::WarningSeverity::Warning);
        assert_eq!(running.quantity("X"), Decimal::from(30));
    }

    #[test]
    fn test_small_target_rounds_up_to_one_batch() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let ledger = StockLedger::new(&stock(&[("RM1", 20)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        let result = engine.allocate(
            "FG-A",
            &formula("FG-A", &[("RM1", 25)]),
            Some(Decimal::from(10)),
            &snapshot,
            &mut running,
        );

        assert_eq!(result.target_batches, Some(1));
        assert_eq!(result.actual_capacity, Decimal::ZERO);
        assert_eq!(result.status, AllocationStatus::Shortage);
        assert_eq!(result.shortages[0].shortage, Decimal::from(5));
    }

    #[test]
    fn test_fifo_priority_decides_winner() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let mut formulas = FormulaRegistry::new();
        for line in formula("A", &[("X", 25)]).into_iter().chain(formula("B", &[("X", 25)])) {
            formulas.insert(line);
        }
        let ledger = StockLedger::new(&stock(&[("X", 30)]), &config);

        for (order, winner, loser) in [(["A", "B"], "A", "B"), (["B", "A"], "B", "A")] {
            let snapshot = ledger.snapshot();
            let mut running = ledger.running();
            let outcome = engine.allocate_all(
                &PriorityOrder::new(order),
                &formulas,
                &HashMap::new(),
                &snapshot,
                &mut running,
            );

            let first = &outcome.results[0];
            let second = &outcome.results[1];
            assert_eq!(first.fg_code, winner);
            assert_eq!(first.actual_capacity, Decimal::from(25));
            assert_eq!(first.status, AllocationStatus::Ready);
            assert_eq!(second.fg_code, loser);
            assert_eq!(second.actual_capacity, Decimal::ZERO);
            assert_eq!(second.max_capacity, Decimal::from(25));
            assert_eq!(second.status, AllocationStatus::Shortage);
            assert_eq!(running.quantity("X"), Decimal::from(5));
        }
    }

    #[test]
    fn test_fg_without_formula_is_skipped() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let mut formulas = FormulaRegistry::new();
        for line in formula("A", &[("X", 25)]) {
            formulas.insert(line);
        }
        let ledger = StockLedger::new(&stock(&[("X", 30)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        let outcome = engine.allocate_all(
            &PriorityOrder::new(["GHOST", "A"]),
            &formulas,
            &HashMap::new(),
            &snapshot,
            &mut running,
        );

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].fg_code, "A");
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].fg_code, "GHOST");
    }

    #[test]
    fn test_empty_formula_has_zero_max() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let ledger = StockLedger::new(&stock(&[("X", 30)]), &config);
        assert_eq!(engine.max_batches(&[], &ledger.snapshot()), 0);
    }

    #[test]
    fn test_max_ignores_depletion_by_earlier_fgs() {
        let config = PlanningConfig::default();
        let engine = AllocationEngine::new(&config);
        let ledger = StockLedger::new(&stock(&[("X", 100)]), &config);
        let snapshot = ledger.snapshot();
        let mut running = ledger.running();

        let first = engine.allocate("A", &formula("A", &[("X", 25)]), Some(Decimal::from(75)), &snapshot, &mut running);
        let second = engine.allocate("B", &formula("B", &[("X", 25)]), None, &snapshot, &mut running);

        assert_eq!(first.actual_capacity, Decimal::from(75));
        assert_eq!(second.max_capacity, Decimal::from(100));
        assert_eq!(second.actual_capacity, Decimal::from(25));
        assert_eq!(running.quantity("X"), Decimal::ZERO);
    }
}
