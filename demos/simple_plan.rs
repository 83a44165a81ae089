//! 單一成品批次規劃示例
//!
//! {RM1: 100 Kg}，FG-A 每批 25 Kg RM1：自動模式與指定預期產能的差異

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fg_planner::prelude::*;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    println!("===== Simple Batch Planning Example =====\n");

    let plan_date = NaiveDate::from_ymd_opt(2025, 11, 10).context("invalid plan date")?;

    // 步驟 1: 原料庫存與配方
    println!("[1] Load stock and formula");
    let mut ctx = PlanningContext::new();
    ctx.replace_stock(vec![RmStock::new("RM1", Decimal::from(100))?]);
    ctx.merge_formulas(vec![FormulaLine::new("FG-A", "RM1", Decimal::from(25))?]);
    ctx.select_all_fgs();
    println!("    RM1 = 100 Kg, FG-A = 25 Kg RM1 / batch\n");

    // 步驟 2: 自動模式（盡量生產）
    println!("[2] Auto mode");
    let result = Planner::new(&ctx).run(plan_date)?;
    print!("{}", capability_table(&result)?);
    println!("    RM1 remaining: {} Kg\n", result.remaining_stock["RM1"]);

    // 步驟 3: 預期產能 30 Kg → 1 批
    println!("[3] Expected capacity 30 Kg");
    ctx.set_expected_capacity("FG-A", Decimal::from(30))?;
    let result = Planner::new(&ctx).run(plan_date)?;
    print!("{}", capability_table(&result)?);
    println!("    RM1 remaining: {} Kg\n", result.remaining_stock["RM1"]);

    println!("===== Done =====");
    Ok(())
}
