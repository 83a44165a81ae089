//! 從檔案規劃並輸出報表
//!
//! 用法：
//! ```text
//! cargo run --example plan_from_files -- <stock> <po|-> <plan-date dd/mm/yyyy> <formula>... [--out report.html]
//! ```

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use fg_planner::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let out_path = match args.iter().position(|a| a == "--out") {
        Some(i) if i + 1 < args.len() => {
            let path = PathBuf::from(args.remove(i + 1));
            args.remove(i);
            Some(path)
        }
        Some(_) => bail!("--out requires a path"),
        None => None,
    };

    if args.len() < 4 {
        bail!("usage: plan_from_files <stock> <po|-> <plan-date dd/mm/yyyy> <formula>... [--out report.html]");
    }

    let plan_date = NaiveDate::parse_from_str(&args[2], "%d/%m/%Y")
        .with_context(|| format!("invalid plan date: {}", args[2]))?;

    let mut ctx = PlanningContext::new();

    // 原料庫存
    let stock = StockImporter
        .import_path(&args[0])
        .with_context(|| format!("failed to import stock from {}", args[0]))?;
    ctx.replace_stock(stock);

    // 採購單（可省略）
    if args[1] != "-" {
        let orders = PurchaseOrderImporter
            .import_path(&args[1])
            .with_context(|| format!("failed to import purchase orders from {}", args[1]))?;
        ctx.replace_purchase_orders(orders);
    }

    // 配方（多檔並行解析，依輸入順序合併）
    let formula_paths: Vec<PathBuf> = args[3..].iter().map(PathBuf::from).collect();
    for file in import_formula_files(&formula_paths) {
        match file.lines {
            Ok(lines) => {
                let outcome = ctx.merge_formulas(lines);
                println!(
                    "{}: {} lines added, {} duplicates discarded",
                    file.path.display(),
                    outcome.added,
                    outcome.discarded
                );
            }
            Err(e) => eprintln!("{}: {}", file.path.display(), e),
        }
    }
    ctx.select_all_fgs();

    let result = Planner::new(&ctx).run(plan_date)?;

    println!();
    print!("{}", capability_table(&result)?);
    println!(
        "\nProducible FGs: {}, total volume: {} Kg, delayed POs: {}",
        result.summary.producible_fg_count,
        result.summary.total_volume,
        result.summary.delayed_po_count
    );
    for warning in &result.warnings {
        println!("[{:?}] {}: {}", warning.severity, warning.fg_code, warning.message);
    }

    if let Some(path) = out_path {
        let context = ReportContext::new(Local::now().naive_local());
        let html = HtmlReport::new(&result, &context).render()?;
        std::fs::write(&path, html)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    } else {
        println!("\n{}", to_json_pretty(&result)?);
    }

    Ok(())
}
