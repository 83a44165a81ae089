//! 匯入器：原始表格 → 規劃輸入
//!
//! 每種匯入器宣告所需欄位並逐行轉換；缺值行略過，負數量拒絕整份檔案。

use planner_core::{FormulaLine, PurchaseOrder, RmStock};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

use crate::cleaner::{clean_code, parse_date, parse_quantity};
use crate::columns::{ColumnKind, ColumnMapping};
use crate::error::{ImportError, ImportResult};
use crate::table::RawTable;

/// 表格匯入介面
pub trait TableImporter {
    /// 單行轉換結果
    type Record;

    /// 所需欄位（依缺欄訊息的順序）
    fn required_columns(&self) -> &'static [ColumnKind];

    /// 補上選填欄位
    fn optional_columns(&self) -> &'static [ColumnKind] {
        &[]
    }

    /// 轉換單行；返回 None 表示略過此行
    fn parse_row(
        &self,
        table: &RawTable,
        row: usize,
        mapping: &ColumnMapping,
    ) -> ImportResult<Option<Self::Record>>;

    /// 匯入整份表格
    fn import_table(&self, table: &RawTable) -> ImportResult<Vec<Self::Record>> {
        let mapping = self
            .optional_columns()
            .iter()
            .fold(ColumnMapping::detect(&table.headers, self.required_columns())?, |m, kind| {
                m.with_optional(&table.headers, *kind)
            });

        let mut records = Vec::with_capacity(table.rows.len());
        for row in 0..table.rows.len() {
            if let Some(record) = self.parse_row(table, row, &mapping)? {
                records.push(record);
            }
        }

        let skipped = table.rows.len() - records.len();
        if skipped > 0 {
            tracing::debug!("略過 {} 行無效資料", skipped);
        }

        if records.is_empty() {
            return Err(ImportError::NoValidData);
        }
        Ok(records)
    }

    /// 讀取檔案並匯入
    fn import_path<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<Self::Record>> {
        let path = path.as_ref();
        let table = RawTable::from_path(path)?;
        let records = self.import_table(&table)?;
        tracing::info!("匯入 {}：{} 筆", path.display(), records.len());
        Ok(records)
    }
}

/// 取得欄位文字
fn cell<'t>(table: &'t RawTable, row: usize, mapping: &ColumnMapping, kind: ColumnKind) -> &'t str {
    mapping
        .index_of(kind)
        .map(|column| table.cell(row, column))
        .unwrap_or("")
}

/// 解析數量並拒絕負數
fn non_negative_quantity(
    table: &RawTable,
    row: usize,
    mapping: &ColumnMapping,
    kind: ColumnKind,
    code: &str,
) -> ImportResult<Decimal> {
    let raw = cell(table, row, mapping, kind);
    let quantity = parse_quantity(raw);
    if quantity < Decimal::ZERO {
        return Err(ImportError::NegativeQuantity {
            row: row + 1,
            code: code.to_string(),
            value: raw.to_string(),
        });
    }
    Ok(quantity)
}

/// 原料庫存匯入（RM Code + Quantity）
#[derive(Debug, Default, Clone, Copy)]
pub struct StockImporter;

impl TableImporter for StockImporter {
    type Record = RmStock;

    fn required_columns(&self) -> &'static [ColumnKind] {
        &[ColumnKind::RmCode, ColumnKind::Quantity]
    }

    fn parse_row(
        &self,
        table: &RawTable,
        row: usize,
        mapping: &ColumnMapping,
    ) -> ImportResult<Option<RmStock>> {
        let Some(rm_code) = clean_code(cell(table, row, mapping, ColumnKind::RmCode)) else {
            return Ok(None);
        };
        let quantity = non_negative_quantity(table, row, mapping, ColumnKind::Quantity, &rm_code)?;
        Ok(Some(RmStock::new(&rm_code, quantity)?))
    }
}

/// 採購單匯入（RM Code + Quantity + Arrival Date，選填 PO 單號）
#[derive(Debug, Default, Clone, Copy)]
pub struct PurchaseOrderImporter;

impl TableImporter for PurchaseOrderImporter {
    type Record = PurchaseOrder;

    fn required_columns(&self) -> &'static [ColumnKind] {
        &[ColumnKind::RmCode, ColumnKind::Quantity, ColumnKind::ArrivalDate]
    }

    fn optional_columns(&self) -> &'static [ColumnKind] {
        &[ColumnKind::PoReference]
    }

    fn parse_row(
        &self,
        table: &RawTable,
        row: usize,
        mapping: &ColumnMapping,
    ) -> ImportResult<Option<PurchaseOrder>> {
        let Some(rm_code) = clean_code(cell(table, row, mapping, ColumnKind::RmCode)) else {
            return Ok(None);
        };
        let Some(arrival_date) = parse_date(cell(table, row, mapping, ColumnKind::ArrivalDate))
        else {
            tracing::debug!("第 {} 行到貨日期無法解析，略過", row + 1);
            return Ok(None);
        };
        let quantity = non_negative_quantity(table, row, mapping, ColumnKind::Quantity, &rm_code)?;

        let mut order = PurchaseOrder::new(&rm_code, quantity, arrival_date)?;
        if let Some(reference) = clean_code(cell(table, row, mapping, ColumnKind::PoReference)) {
            order = order.with_source_ref(reference);
        }
        Ok(Some(order))
    }
}

/// 成品配方匯入（FG Code + RM Code + Quantity）
#[derive(Debug, Default, Clone, Copy)]
pub struct FormulaImporter;

impl TableImporter for FormulaImporter {
    type Record = FormulaLine;

    fn required_columns(&self) -> &'static [ColumnKind] {
        &[ColumnKind::FgCode, ColumnKind::RmCode, ColumnKind::FormulaQuantity]
    }

    fn parse_row(
        &self,
        table: &RawTable,
        row: usize,
        mapping: &ColumnMapping,
    ) -> ImportResult<Option<FormulaLine>> {
        let fg_code = clean_code(cell(table, row, mapping, ColumnKind::FgCode));
        let rm_code = clean_code(cell(table, row, mapping, ColumnKind::RmCode));
        let (Some(fg_code), Some(rm_code)) = (fg_code, rm_code) else {
            return Ok(None);
        };
        let quantity =
            non_negative_quantity(table, row, mapping, ColumnKind::FormulaQuantity, &rm_code)?;
        Ok(Some(FormulaLine::new(&fg_code, &rm_code, quantity)?))
    }
}

/// 單一配方檔案的匯入結果
#[derive(Debug)]
pub struct FormulaFileResult {
    pub path: PathBuf,
    pub lines: ImportResult<Vec<FormulaLine>>,
}

/// 並行匯入多個配方檔案，結果保持輸入順序
///
/// 單一檔案失敗不影響其他檔案；合併時依此順序套用先到先贏。
pub fn import_formula_files<P>(paths: &[P]) -> Vec<FormulaFileResult>
where
    P: AsRef<Path> + Sync,
{
    tracing::info!("並行匯入 {} 個配方檔案", paths.len());

    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let lines = FormulaImporter.import_path(path);
            if let Err(e) = &lines {
                tracing::warn!("配方檔案 {} 匯入失敗: {}", path.display(), e);
            }
            FormulaFileResult {
                path: path.to_path_buf(),
                lines,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn table(csv: &str) -> RawTable {
        RawTable::from_csv_reader(csv.as_bytes()).unwrap()
    }

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_stock_import_cleans_rows() {
        let records = StockImporter
            .import_table(&table(
                "Item,RM Code,Stock Qty\n1, RM-1 ,100.5\n2,nan,5\n3,,7\n4,RM-2,n/a\n",
            ))
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rm_code, "RM-1");
        assert_eq!(records[0].quantity, Decimal::new(1005, 1));
        assert_eq!(records[1].rm_code, "RM-2");
        assert_eq!(records[1].quantity, Decimal::ZERO);
    }

    #[test]
    fn test_stock_import_rejects_negative_quantity() {
        let err = StockImporter
            .import_table(&table("RM Code,Quantity\nRM-1,10\nRM-2,-3\n"))
            .unwrap_err();

        match err {
            ImportError::NegativeQuantity { row, code, value } => {
                assert_eq!(row, 2);
                assert_eq!(code, "RM-2");
                assert_eq!(value, "-3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stock_import_missing_columns() {
        let err = StockImporter
            .import_table(&table("Material,Weight\nRM-1,10\n"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing columns: RM Code, Quantity");
    }

    #[test]
    fn test_stock_import_no_valid_rows() {
        let err = StockImporter
            .import_table(&table("RM Code,Quantity\nnan,10\n"))
            .unwrap_err();
        assert!(matches!(err, ImportError::NoValidData));
    }

    #[test]
    fn test_purchase_order_import_drops_bad_dates() {
        let records = PurchaseOrderImporter
            .import_table(&table(
                "PO No,RM ID,Amount,Delivery Date\nPO-1,RM-1,50,03/11/2025\nPO-2,RM-1,20,TBD\n,RM-2,10,2025-11-20\n",
            ))
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].arrival_date,
            NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
        );
        assert_eq!(records[0].source_ref.as_deref(), Some("PO-1"));
        assert_eq!(records[1].rm_code, "RM-2");
        assert_eq!(records[1].source_ref, None);
    }

    #[test]
    fn test_formula_import_requires_formula_quantity_header() {
        // "amount" 不被配方接受
        let err = FormulaImporter
            .import_table(&table("FG Code,RM Code,Amount\nFG-1,RM-1,5\n"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing columns: Quantity");

        let lines = FormulaImporter
            .import_table(&table("FG Code,RM Code,Qty per batch\nFG-1,RM-1,5\nFG-1,nan,3\n"))
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].qty_per_batch, Decimal::from(5));
    }

    #[test]
    fn test_import_formula_files_keeps_input_order() {
        let first = csv_file("FG Code,RM Code,Quantity\nFG-A,RM-1,10\nFG-A,RM-2,5\n");
        let broken = csv_file("FG Code,Quantity\nFG-B,1\n");
        let second = csv_file("FG Code,RM Code,Quantity\nFG-A,RM-1,99\nFG-C,RM-3,2\n");

        let results = import_formula_files(&[first.path(), broken.path(), second.path()]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].path, first.path());
        assert_eq!(results[0].lines.as_ref().unwrap().len(), 2);
        assert!(matches!(results[1].lines, Err(ImportError::MissingColumns(_))));
        assert_eq!(results[2].lines.as_ref().unwrap()[0].qty_per_batch, Decimal::from(99));
    }
}
