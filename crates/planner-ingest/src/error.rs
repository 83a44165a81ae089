//! 匯入模組錯誤類型

use thiserror::Error;

/// 匯入錯誤
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 檔案相關錯誤 =====
    #[error("檔案不存在: {0}")]
    FileNotFound(String),

    #[error("檔案格式不支援: {0}（僅支援 .xlsx/.csv）")]
    UnsupportedFormat(String),

    #[error("檔案讀取失敗: {0}")]
    FileReadError(String),

    #[error("Excel 解析失敗: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失敗: {0}")]
    CsvParseError(String),

    // ===== 欄位與資料錯誤 =====
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("數量不可為負 (第 {row} 行, {code}): {value}")]
    NegativeQuantity { row: usize, code: String, value: String },

    #[error("No valid data found in the uploaded file")]
    NoValidData,

    #[error(transparent)]
    Plan(#[from] planner_core::PlanError),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 類型別名
pub type ImportResult<T> = Result<T, ImportError>;
