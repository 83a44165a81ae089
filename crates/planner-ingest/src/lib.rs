//! # Planner Ingest
//!
//! 從 CSV / Excel 讀取原料庫存、採購單與成品配方。
//!
//! 流程：檔案解析 → 欄位辨識 → 資料清洗 → 轉換為 `planner-core` 類型

pub mod cleaner;
pub mod columns;
pub mod error;
pub mod importer;
pub mod table;

pub use columns::{ColumnKind, ColumnMapping};
pub use error::{ImportError, ImportResult};
pub use importer::{
    import_formula_files, FormulaFileResult, FormulaImporter, PurchaseOrderImporter,
    StockImporter, TableImporter,
};
pub use table::RawTable;
