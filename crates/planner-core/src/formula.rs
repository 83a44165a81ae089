//! 成品配方模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ensure_non_negative, normalize_code, Result};

/// 配方明細（每批次用量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaLine {
    /// 成品代碼
    pub fg_code: String,

    /// 原料代碼
    pub rm_code: String,

    /// 每批次所需原料數量（Kg）
    pub qty_per_batch: Decimal,
}

impl FormulaLine {
    /// 創建新的配方明細
    ///
    /// 用量為 0 是允許的（計算時視為無效需求），負數則拒絕。
    pub fn new(fg_code: &str, rm_code: &str, qty_per_batch: Decimal) -> Result<Self> {
        let fg_code = normalize_code(fg_code)?;
        let rm_code = normalize_code(rm_code)?;
        ensure_non_negative(&rm_code, qty_per_batch)?;
        Ok(Self {
            fg_code,
            rm_code,
            qty_per_batch,
        })
    }
}

/// 配方登錄表：成品代碼 → 有序的配方明細
///
/// 同一 (成品, 原料) 組合只保留第一次出現的明細。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormulaRegistry {
    formulas: HashMap<String, Vec<FormulaLine>>,
}

impl FormulaRegistry {
    /// 創建空的配方登錄表
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入一筆明細，重複的 (成品, 原料) 組合會被捨棄並返回 false
    pub fn insert(&mut self, line: FormulaLine) -> bool {
        let lines = self.formulas.entry(line.fg_code.clone()).or_default();
        if lines.iter().any(|l| l.rm_code == line.rm_code) {
            return false;
        }
        lines.push(line);
        true
    }

    /// 取得成品的配方明細，未知成品返回空切片
    pub fn lines_for(&self, fg_code: &str) -> &[FormulaLine] {
        self.formulas
            .get(fg_code)
            .map(|lines| lines.as_slice())
            .unwrap_or(&[])
    }

    /// 檢查成品是否有配方
    pub fn contains(&self, fg_code: &str) -> bool {
        !self.lines_for(fg_code).is_empty()
    }

    /// 所有成品代碼（字典序）
    pub fn fg_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .formulas
            .iter()
            .filter(|(_, lines)| !lines.is_empty())
            .map(|(code, _)| code.clone())
            .collect();
        codes.sort();
        codes
    }

    /// 移除成品配方，返回被移除的明細數
    pub fn remove(&mut self, fg_code: &str) -> usize {
        self.formulas.remove(fg_code).map(|l| l.len()).unwrap_or(0)
    }

    /// 清空所有配方
    pub fn clear(&mut self) {
        self.formulas.clear();
    }

    /// 成品數量
    pub fn len(&self) -> usize {
        self.formulas.values().filter(|l| !l.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 配方明細總數
    pub fn line_count(&self) -> usize {
        self.formulas.values().map(|l| l.len()).sum()
    }
}
