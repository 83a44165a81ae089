//! 規劃上下文
//!
//! 保存呼叫端跨規劃持有的資料：原料庫存、採購單、配方、優先順序、預期產能與計算精度。
//! 每次規劃只讀取此上下文，所有暫時帳本都在規劃內建立與丟棄。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::{
    ensure_non_negative, FormulaLine, FormulaRegistry, PlanningConfig, PriorityOrder,
    PurchaseOrder, Result, RmStock,
};

/// 開始規劃前缺少的輸入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingInput {
    RmStock,
    FgFormulas,
    FgSelection,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingInput::RmStock => write!(f, "RM Stock"),
            MissingInput::FgFormulas => write!(f, "FG Formulas"),
            MissingInput::FgSelection => write!(f, "FG selection for analysis"),
        }
    }
}

/// 配方合併結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// 新增的明細數
    pub added: usize,
    /// 因 (成品, 原料) 重複而捨棄的明細數
    pub discarded: usize,
}

/// 規劃上下文
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningContext {
    config: PlanningConfig,
    stock: Vec<RmStock>,
    purchase_orders: Vec<PurchaseOrder>,
    formulas: FormulaRegistry,
    priority: PriorityOrder,
    expected_capacity: HashMap<String, Decimal>,
}

impl PlanningContext {
    /// 創建空的規劃上下文（預設配置）
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// 變更計算精度，超出範圍時拒絕
    pub fn set_decimal_places(&mut self, decimal_places: u32) -> Result<()> {
        self.config.set_decimal_places(decimal_places)
    }

    // ---------- 原料庫存 ----------

    /// 以新資料取代全部庫存
    ///
    /// 同一原料出現多次時以最後一筆為準，保留第一次出現的位置。
    pub fn replace_stock(&mut self, entries: Vec<RmStock>) {
        let mut merged: Vec<RmStock> = Vec::with_capacity(entries.len());
        let mut index: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            match index.get(&entry.rm_code) {
                Some(&i) => {
                    tracing::debug!("原料 {} 重複出現，以最後一筆為準", entry.rm_code);
                    merged[i].quantity = entry.quantity;
                }
                None => {
                    index.insert(entry.rm_code.clone(), merged.len());
                    merged.push(entry);
                }
            }
        }

        tracing::info!("載入原料庫存 {} 筆", merged.len());
        self.stock = merged;
    }

    pub fn clear_stock(&mut self) {
        self.stock.clear();
    }

    pub fn stock(&self) -> &[RmStock] {
        &self.stock
    }

    /// 查詢原料庫存，未知原料返回 None
    pub fn stock_of(&self, rm_code: &str) -> Option<Decimal> {
        self.stock
            .iter()
            .find(|s| s.rm_code == rm_code)
            .map(|s| s.quantity)
    }

    // ---------- 採購單 ----------

    /// 以新資料取代全部採購單
    pub fn replace_purchase_orders(&mut self, orders: Vec<PurchaseOrder>) {
        tracing::info!("載入採購單 {} 筆", orders.len());
        self.purchase_orders = orders;
    }

    pub fn clear_purchase_orders(&mut self) {
        self.purchase_orders.clear();
    }

    pub fn purchase_orders(&self) -> &[PurchaseOrder] {
        &self.purchase_orders
    }

    // ---------- 配方 ----------

    /// 合併配方明細（已存在的 (成品, 原料) 組合保留舊值）
    pub fn merge_formulas(&mut self, lines: Vec<FormulaLine>) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for line in lines {
            let (fg, rm) = (line.fg_code.clone(), line.rm_code.clone());
            if self.formulas.insert(line) {
                outcome.added += 1;
            } else {
                tracing::warn!("配方明細重複，捨棄: {} / {}", fg, rm);
                outcome.discarded += 1;
            }
        }

        tracing::info!(
            "合併配方：新增 {} 筆，捨棄 {} 筆，成品共 {} 項",
            outcome.added,
            outcome.discarded,
            self.formulas.len()
        );

        outcome
    }

    /// 清空配方，同時清除優先順序與預期產能
    pub fn clear_formulas(&mut self) {
        self.formulas.clear();
        self.priority.clear();
        self.expected_capacity.clear();
    }

    /// 刪除指定成品的配方、優先位置與預期產能
    pub fn delete_fgs<S: AsRef<str>>(&mut self, fg_codes: &[S]) {
        for code in fg_codes {
            let code = code.as_ref();
            let removed = self.formulas.remove(code);
            self.priority.remove(code);
            self.expected_capacity.remove(code);
            tracing::debug!("刪除成品 {}（配方明細 {} 筆）", code, removed);
        }
    }

    pub fn formulas(&self) -> &FormulaRegistry {
        &self.formulas
    }

    // ---------- 優先順序 ----------

    /// 設置成品優先順序（FIFO）
    pub fn set_priority_order<I, S>(&mut self, fg_codes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.priority = PriorityOrder::new(fg_codes);
    }

    /// 選取所有已知成品，依代碼字典序排列
    pub fn select_all_fgs(&mut self) {
        self.priority = PriorityOrder::new(self.formulas.fg_codes());
    }

    pub fn priority_order(&self) -> &PriorityOrder {
        &self.priority
    }

    // ---------- 預期產能 ----------

    /// 設置成品預期產能（Kg），0 表示自動
    pub fn set_expected_capacity(&mut self, fg_code: &str, quantity: Decimal) -> Result<()> {
        ensure_non_negative(fg_code, quantity)?;
        if quantity.is_zero() {
            self.expected_capacity.remove(fg_code);
        } else {
            self.expected_capacity.insert(fg_code.to_string(), quantity);
        }
        Ok(())
    }

    /// 查詢成品預期產能，未設置返回 None
    pub fn expected_capacity(&self, fg_code: &str) -> Option<Decimal> {
        self.expected_capacity
            .get(fg_code)
            .copied()
            .filter(|q| *q > Decimal::ZERO)
    }

    pub fn expected_capacities(&self) -> &HashMap<String, Decimal> {
        &self.expected_capacity
    }

    // ---------- 檢查 ----------

    /// 列出開始規劃前尚缺的輸入
    pub fn missing_inputs(&self) -> Vec<MissingInput> {
        let mut missing = Vec::new();
        if self.stock.is_empty() {
            missing.push(MissingInput::RmStock);
        }
        if self.formulas.is_empty() {
            missing.push(MissingInput::FgFormulas);
        }
        if self.priority.is_empty() {
            missing.push(MissingInput::FgSelection);
        }
        missing
    }

    /// 是否可以開始規劃
    pub fn is_ready(&self) -> bool {
        self.missing_inputs().is_empty()
    }
}
