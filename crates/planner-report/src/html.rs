//! HTML 摘要報表
//!
//! 區段：摘要指標、產能清單、缺料明細、採購優先清單、採購單到貨狀態、系統設定。
//! 沒有資料的區段不輸出。

use planner_calc::PlanResult;
use planner_core::{AllocationStatus, PoStatus};
use rust_decimal::Decimal;
use std::fmt::Write;

use crate::format::{escape_html, format_kg, format_thousands};
use crate::palette::FgPalette;
use crate::{ReportContext, Result};

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 40px; }
.header { text-align: center; margin-bottom: 30px; }
.title { font-size: 24px; font-weight: bold; color: #333; }
.subtitle { font-size: 14px; color: #666; margin-top: 10px; }
.section { margin: 20px 0; }
.section-title { font-size: 18px; font-weight: bold; color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 5px; margin-bottom: 15px; }
table { width: 100%; border-collapse: collapse; margin: 10px 0; }
th { background-color: #3498db; color: white; padding: 10px; text-align: left; }
td { padding: 8px; border: 1px solid #ddd; }
tr:nth-child(even) { background-color: #f2f2f2; }
.metric { display: inline-block; margin: 10px 20px 10px 0; padding: 10px; background-color: #ecf0f1; border-radius: 5px; }
.metric-label { font-weight: bold; color: #7f8c8d; }
.metric-value { font-size: 18px; color: #2c3e50; }
.swatch { display: inline-block; width: 10px; height: 10px; margin-right: 6px; border-radius: 2px; }
.status-ready { color: #27ae60; font-weight: bold; }
.status-shortage { color: #e74c3c; font-weight: bold; }
.footer { margin-top: 40px; text-align: center; color: #7f8c8d; font-size: 12px; border-top: 1px solid #ddd; padding-top: 20px; }
"#;

/// 採購單數量顯示精度
const PO_QUANTITY_PLACES: u32 = 4;

/// 產能顯示精度
const CAPACITY_PLACES: u32 = 1;

/// HTML 報表產生器
pub struct HtmlReport<'a> {
    result: &'a PlanResult,
    context: &'a ReportContext,
    palette: FgPalette,
}

impl<'a> HtmlReport<'a> {
    /// 顏色依優先順序分配
    pub fn new(result: &'a PlanResult, context: &'a ReportContext) -> Self {
        Self {
            result,
            context,
            palette: FgPalette::from_codes(&result.priority_order),
        }
    }

    /// 使用呼叫端維護的顏色表
    pub fn with_palette(mut self, palette: FgPalette) -> Self {
        self.palette = palette;
        self
    }

    /// 產生完整 HTML
    pub fn render(&mut self) -> Result<String> {
        let mut out = String::with_capacity(8 * 1024);

        self.write_header(&mut out)?;
        self.write_summary(&mut out)?;
        self.write_capability(&mut out)?;
        self.write_shortage_details(&mut out)?;
        self.write_procurement(&mut out)?;
        self.write_po_status(&mut out)?;
        self.write_settings(&mut out)?;
        self.write_footer(&mut out)?;

        Ok(out)
    }

    fn write_header(&self, out: &mut String) -> std::fmt::Result {
        let title = escape_html(&self.context.title);
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{title}</title>")?;
        writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>")?;
        writeln!(out, "<div class=\"header\">")?;
        writeln!(out, "<div class=\"title\">{title}</div>")?;
        writeln!(
            out,
            "<div class=\"subtitle\">Generated on: {}</div>",
            self.context.generated_display()
        )?;
        writeln!(
            out,
            "<div class=\"subtitle\">Production Date: {}</div>",
            self.result.plan_date.format("%d/%m/%Y")
        )?;
        writeln!(out, "</div>")
    }

    fn write_summary(&self, out: &mut String) -> std::fmt::Result {
        let summary = &self.result.summary;
        writeln!(out, "<div class=\"section\">")?;
        writeln!(out, "<div class=\"section-title\">Summary Metrics</div>")?;

        let metrics = [
            (
                "Planned Production Date",
                self.result.plan_date.format("%d/%m/%Y").to_string(),
            ),
            ("Producible FG Types", summary.producible_fg_count.to_string()),
            (
                "Total Production Volume",
                format_kg(summary.total_volume, CAPACITY_PLACES),
            ),
            ("Total Batches", summary.total_batches.to_string()),
            ("Delayed Purchase Orders", summary.delayed_po_count.to_string()),
        ];
        for (label, value) in metrics {
            writeln!(
                out,
                "<div class=\"metric\"><div class=\"metric-label\">{label}</div><div class=\"metric-value\">{value}</div></div>"
            )?;
        }

        writeln!(out, "</div>")
    }

    fn write_capability(&mut self, out: &mut String) -> std::fmt::Result {
        if self.result.results.is_empty() {
            return Ok(());
        }

        let batch_size = Decimal::from(self.result.batch_size);

        writeln!(out, "<div class=\"section\">")?;
        writeln!(out, "<div class=\"section-title\">Production Capability List</div>")?;
        writeln!(out, "<table>")?;
        writeln!(
            out,
            "<tr><th>FG Code</th><th>Expected</th><th>Max (Kg)</th><th>Actual (Kg)</th><th>Status</th><th>Detail</th><th>Missing RM</th><th>Batches</th></tr>"
        )?;

        for item in &self.result.results {
            let color = self.palette.color_for(&item.fg_code);
            let status_class = match item.status {
                AllocationStatus::Ready => "status-ready",
                AllocationStatus::Shortage => "status-shortage",
            };
            let expected = match item.expected_capacity {
                Some(expected) => format_kg(expected, CAPACITY_PLACES),
                None => "Auto".to_string(),
            };

            writeln!(
                out,
                "<tr><td><span class=\"swatch\" style=\"background-color: {color};\"></span>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{status_class}\">{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&item.fg_code),
                expected,
                format_kg(item.max_capacity, CAPACITY_PLACES),
                format_kg(item.actual_capacity, CAPACITY_PLACES),
                item.status,
                escape_html(&item.status_detail(batch_size)),
                item.missing_display(),
                item.actual_batches
            )?;
        }

        writeln!(out, "</table>\n</div>")
    }

    fn write_shortage_details(&self, out: &mut String) -> std::fmt::Result {
        let details = self.result.shortage_details();
        if details.is_empty() {
            return Ok(());
        }

        writeln!(out, "<div class=\"section\">")?;
        writeln!(out, "<div class=\"section-title\">Shortage Details</div>")?;
        for (fg_code, lines) in details {
            writeln!(out, "<div style=\"margin: 15px 0;\">")?;
            writeln!(
                out,
                "<div style=\"font-weight: bold; color: #e74c3c;\">FG Code: {}</div>",
                escape_html(fg_code)
            )?;
            writeln!(out, "<ul style=\"margin: 5px 0 20px 20px;\">")?;
            for line in lines {
                writeln!(out, "<li>{}</li>", escape_html(&line))?;
            }
            writeln!(out, "</ul>\n</div>")?;
        }
        writeln!(out, "</div>")
    }

    fn write_procurement(&self, out: &mut String) -> std::fmt::Result {
        if self.result.procurement.is_empty() {
            return Ok(());
        }

        let dp = self.result.decimal_places;
        writeln!(out, "<div class=\"section\">")?;
        writeln!(out, "<div class=\"section-title\">RM Procurement Priority</div>")?;
        writeln!(out, "<table>")?;
        writeln!(
            out,
            "<tr><th>RM Code</th><th>Total Required</th><th>Total Available</th><th>Total Shortage</th><th>Affected FGs</th></tr>"
        )?;
        for summary in &self.result.procurement {
            let affected: Vec<&str> = summary.affected_fgs.iter().map(|s| s.as_str()).collect();
            writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"status-shortage\">{}</td><td>{}</td></tr>",
                escape_html(&summary.rm_code),
                format_kg(summary.total_required, dp),
                format_kg(summary.total_available, dp),
                format_kg(summary.total_shortage, dp),
                escape_html(&affected.join(", "))
            )?;
        }
        writeln!(out, "</table>\n</div>")
    }

    fn write_po_status(&self, out: &mut String) -> std::fmt::Result {
        if self.result.po_status.is_empty() {
            return Ok(());
        }

        writeln!(out, "<div class=\"section\">")?;
        writeln!(out, "<div class=\"section-title\">Purchase Order Delay Status</div>")?;
        writeln!(out, "<table>")?;
        writeln!(
            out,
            "<tr><th>RM Code</th><th>Quantity</th><th>Arrival Date</th><th>Status</th></tr>"
        )?;
        for entry in &self.result.po_status {
            let status_class = match entry.status {
                PoStatus::Delayed => "status-shortage",
                PoStatus::Incoming => "",
            };
            writeln!(
                out,
                "<tr><td>{}</td><td>{} Kg</td><td>{}</td><td class=\"{status_class}\">{}</td></tr>",
                escape_html(&entry.rm_code),
                format_thousands(entry.quantity, PO_QUANTITY_PLACES),
                entry.arrival_date.format("%d/%m/%Y"),
                entry.status
            )?;
        }
        writeln!(out, "</table>\n</div>")
    }

    fn write_settings(&self, out: &mut String) -> std::fmt::Result {
        let order = if self.result.priority_order.is_empty() {
            "Not set".to_string()
        } else {
            escape_html(&self.result.priority_order.join(", "))
        };

        writeln!(out, "<div class=\"section\">")?;
        writeln!(out, "<div class=\"section-title\">System Settings</div>")?;
        writeln!(out, "<div style=\"margin: 10px 0;\">")?;
        writeln!(
            out,
            "&bull; Decimal Precision: {} places<br>",
            self.result.decimal_places
        )?;
        writeln!(out, "&bull; Batch Size: {} Kg<br>", self.result.batch_size)?;
        writeln!(out, "&bull; FIFO Order: {order}<br>")?;
        writeln!(
            out,
            "&bull; Report Generated: {}",
            self.context.generated_display()
        )?;
        writeln!(out, "</div>\n</div>")
    }

    fn write_footer(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "<div class=\"footer\">")?;
        if let Some(organisation) = &self.context.organisation {
            writeln!(out, "{}<br>", escape_html(organisation))?;
        }
        writeln!(out, "Run {}<br>", self.result.run_id)?;
        writeln!(out, "--- End of Report ---")?;
        writeln!(out, "</div>\n</body>\n</html>")
    }
}
