//! 文字產能表（終端輸出用）

use planner_calc::PlanResult;
use std::fmt::Write;

use crate::format::format_kg;
use crate::Result;

const HEADERS: [&str; 7] = ["FG Code", "Expected", "Max", "Actual", "Status", "Missing RM", "Batches"];

/// 固定寬度的產能清單
pub fn capability_table(result: &PlanResult) -> Result<String> {
    let rows: Vec<[String; 7]> = result
        .results
        .iter()
        .map(|r| {
            [
                r.fg_code.clone(),
                r.expected_display(),
                format_kg(r.max_capacity, 1),
                format_kg(r.actual_capacity, 1),
                r.status.to_string(),
                r.missing_display(),
                r.actual_batches.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(String::from), &widths)?;
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", separator.join("-+-"))?;
    for row in &rows {
        write_row(&mut out, row, &widths)?;
    }
    Ok(out)
}

fn write_row(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) -> std::fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(out, "{}", padded.join(" | ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_result;

    #[test]
    fn test_capability_table_layout() {
        let table = capability_table(&sample_result()).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("FG Code | Expected"));
        assert!(lines[1].chars().all(|c| c == '-' || c == '+'));
        assert!(lines[2].starts_with("FG-A"));
        assert!(lines[2].contains("Auto"));
        assert!(lines[2].contains("Ready"));
        assert!(lines[2].ends_with('4'));
        assert!(lines[3].contains("Shortage"));
        assert!(lines[3].contains("2 RM(s)"));
    }

    #[test]
    fn test_empty_results_prints_header_only() {
        let mut result = sample_result();
        result.results.clear();
        let table = capability_table(&result).unwrap();
        assert_eq!(table.lines().count(), 2);
    }
}
