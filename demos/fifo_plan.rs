//! 優先順序（FIFO）分配示例
//!
//! 兩個成品共用同一原料，庫存只夠一批：順序決定誰能生產

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fg_planner::prelude::*;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    println!("===== FIFO Allocation Example =====\n");

    let plan_date = NaiveDate::from_ymd_opt(2025, 11, 10).context("invalid plan date")?;

    let mut ctx = PlanningContext::new();
    ctx.replace_stock(vec![
        RmStock::new("X", Decimal::from(30))?,
        RmStock::new("Y", Decimal::from(500))?,
    ]);
    let outcome = ctx.merge_formulas(vec![
        FormulaLine::new("FG-A", "X", Decimal::from(25))?,
        FormulaLine::new("FG-B", "X", Decimal::from(25))?,
        FormulaLine::new("FG-B", "Y", Decimal::from(10))?,
    ]);
    println!("Formula lines added: {}, discarded: {}\n", outcome.added, outcome.discarded);

    for order in [["FG-A", "FG-B"], ["FG-B", "FG-A"]] {
        println!("[Order] {}", order.join(" → "));
        ctx.set_priority_order(order);

        let result = Planner::new(&ctx).run(plan_date)?;
        print!("{}", capability_table(&result)?);

        for (fg, lines) in result.shortage_details() {
            println!("    {} shortages:", fg);
            for line in lines {
                println!("      - {}", line);
            }
        }
        for summary in &result.procurement {
            println!(
                "    Procure {}: {} Kg short across {} FG(s)",
                summary.rm_code,
                summary.total_shortage,
                summary.affected_fg_count()
            );
        }
        println!("    X remaining: {} Kg\n", result.remaining_stock["X"]);
    }

    Ok(())
}
