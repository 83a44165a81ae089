//! 檔案解析：CSV / Excel → 原始表格
//!
//! 只負責讀出表頭與儲存格文字，不做任何型別轉換。

use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{ImportError, ImportResult};

/// 原始表格（表頭 + 文字儲存格）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// 表頭（已去除前後空白）
    pub headers: Vec<String>,
    /// 資料行（已去除前後空白，完全空白的行已略過）
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// 由表頭與資料行建立表格
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.trim().to_string()).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|v| !v.is_empty()))
            .collect();
        Self { headers, rows }
    }

    /// 取得儲存格文字，超出行長度返回空字串
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|v| v.as_str())
            .unwrap_or("")
    }

    /// 依副檔名選擇解析器
    pub fn from_path<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Self::from_csv_reader(File::open(path)?),
            "xlsx" => Self::from_xlsx_path(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    /// 解析 CSV
    pub fn from_csv_reader<R: Read>(reader: R) -> ImportResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允許行長度不一致
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self::new(headers, rows))
    }

    /// 解析 Excel（第一個工作表）
    pub fn from_xlsx_path(path: &Path) -> ImportResult<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 檔案沒有工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 檔案沒有資料行".to_string()))?;

        let headers = header_row.iter().map(cell_to_string).collect();
        let rows = rows
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok(Self::new(headers, rows))
    }
}

/// Excel 儲存格轉文字，日期一律輸出為 yyyy-mm-dd
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_csv_reader_trims_and_skips_blank_rows() {
        let data = " RM Code , Qty \nRM-1 , 10.5\n,\nRM-2,3\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["RM Code", "Qty"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, 0), "RM-1");
        assert_eq!(table.cell(0, 1), "10.5");
        assert_eq!(table.cell(1, 5), "");
    }

    #[test]
    fn test_from_path_csv() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "RM Code,Quantity").unwrap();
        writeln!(file, "RM-1,100").unwrap();

        let table = RawTable::from_path(file.path()).unwrap();
        assert_eq!(table.rows, vec![vec!["RM-1".to_string(), "100".to_string()]]);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = RawTable::from_path("does-not-exist.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_from_path_unsupported_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = RawTable::from_path(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_from_path_rejects_legacy_xls() {
        let file = Builder::new().suffix(".xls").tempfile().unwrap();
        let err = RawTable::from_path(file.path()).unwrap_err();
        assert!(matches!(&err, ImportError::UnsupportedFormat(ext) if ext == "xls"));
        assert!(err.to_string().contains(".xlsx/.csv"));
    }
}
