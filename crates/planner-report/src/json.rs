//! JSON 匯出

use planner_calc::PlanResult;

use crate::Result;

/// 精簡 JSON
pub fn to_json(result: &PlanResult) -> Result<String> {
    Ok(serde_json::to_string(result)?)
}

/// 縮排 JSON
pub fn to_json_pretty(result: &PlanResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
