//! 欄位辨識
//!
//! 依表頭關鍵字比對欄位，每種欄位取第一個符合的表頭（不分大小寫）。

use crate::error::{ImportError, ImportResult};

/// 欄位種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    RmCode,
    FgCode,
    /// 庫存 / 採購單數量（quantity / qty / amount）
    Quantity,
    /// 配方用量（僅 quantity / qty）
    FormulaQuantity,
    ArrivalDate,
    /// 採購單號（選填）
    PoReference,
}

impl ColumnKind {
    /// 缺欄訊息中使用的標準欄名
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::RmCode => "RM Code",
            ColumnKind::FgCode => "FG Code",
            ColumnKind::Quantity | ColumnKind::FormulaQuantity => "Quantity",
            ColumnKind::ArrivalDate => "Arrival Date",
            ColumnKind::PoReference => "PO Number",
        }
    }

    /// 表頭是否符合此欄位
    pub fn matches(&self, header: &str) -> bool {
        let h = header.to_lowercase();
        let is_code = h.contains("code") || h.contains("id");
        match self {
            ColumnKind::RmCode => h.contains("rm") && is_code,
            ColumnKind::FgCode => h.contains("fg") && is_code,
            ColumnKind::Quantity => {
                h.contains("quantity") || h.contains("qty") || h.contains("amount")
            }
            ColumnKind::FormulaQuantity => h.contains("quantity") || h.contains("qty"),
            ColumnKind::ArrivalDate => {
                h.contains("arrival") || h.contains("date") || h.contains("delivery")
            }
            ColumnKind::PoReference => {
                h == "po" || ["po ", "po_", "po#", "po-"].iter().any(|p| h.starts_with(p))
            }
        }
    }
}

/// 欄位對應結果（欄位種類 → 欄位索引）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: Vec<(ColumnKind, usize)>,
}

impl ColumnMapping {
    /// 依序辨識所需欄位，任何一個缺少即返回 MissingColumns
    pub fn detect(headers: &[String], required: &[ColumnKind]) -> ImportResult<Self> {
        let mut columns = Vec::with_capacity(required.len());
        let mut missing = Vec::new();

        for kind in required {
            match headers.iter().position(|h| kind.matches(h)) {
                Some(index) => columns.push((*kind, index)),
                None => missing.push(kind.label().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        tracing::debug!("欄位對應: {:?}", columns);
        Ok(Self { columns })
    }

    /// 加入選填欄位，找不到時不變
    pub fn with_optional(mut self, headers: &[String], kind: ColumnKind) -> Self {
        if let Some(index) = headers.iter().position(|h| kind.matches(h)) {
            self.columns.push((kind, index));
        }
        self
    }

    /// 取得欄位索引
    pub fn index_of(&self, kind: ColumnKind) -> Option<usize> {
        self.columns
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, index)| *index)
    }
}
