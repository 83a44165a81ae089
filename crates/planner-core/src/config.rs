//! 規劃參數配置

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 預設計算小數位數
pub const DEFAULT_DECIMAL_PLACES: u32 = 3;

/// 允許的最大小數位數
pub const MAX_DECIMAL_PLACES: u32 = 6;

/// 每批次生產量（Kg）
pub const DEFAULT_BATCH_SIZE: u32 = 25;

/// 規劃計算參數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// 計算精度（小數位數，0-6）
    decimal_places: u32,

    /// 批次單位（Kg），所有分配量皆為其整數倍
    batch_size: u32,
}

impl PlanningConfig {
    /// 創建預設配置（3 位小數、每批 25 Kg）
    pub fn new() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// 建構器模式：設置小數位數
    ///
    /// # 範例
    /// ```
    /// # use planner_core::PlanningConfig;
    /// let config = PlanningConfig::new().with_decimal_places(2).unwrap();
    /// assert_eq!(config.decimal_places(), 2);
    /// assert!(PlanningConfig::new().with_decimal_places(7).is_err());
    /// ```
    pub fn with_decimal_places(mut self, decimal_places: u32) -> Result<Self> {
        self.set_decimal_places(decimal_places)?;
        Ok(self)
    }

    /// 設置小數位數（超出 0-6 範圍則拒絕，原值不變）
    pub fn set_decimal_places(&mut self, decimal_places: u32) -> Result<()> {
        Self::validate_decimal_places(decimal_places)?;
        self.decimal_places = decimal_places;
        Ok(())
    }

    /// 檢查小數位數是否在允許範圍內
    pub fn validate_decimal_places(decimal_places: u32) -> Result<()> {
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(PlanError::InvalidDecimalPlaces(decimal_places));
        }
        Ok(())
    }

    /// 重新檢查整份配置（反序列化後的配置可能未經驗證）
    pub fn validate(&self) -> Result<()> {
        Self::validate_decimal_places(self.decimal_places)?;
        if self.batch_size == 0 {
            return Err(PlanError::Other("批次單位必須大於 0".to_string()));
        }
        Ok(())
    }

    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// 批次單位（Decimal）
    pub fn batch_size_decimal(&self) -> Decimal {
        Decimal::from(self.batch_size)
    }

    /// 依配置精度四捨五入（銀行家捨入）
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointNearestEven)
    }

    /// 批次數換算為產能（Kg）
    pub fn capacity_of(&self, batches: u64) -> Decimal {
        Decimal::from(batches) * self.batch_size_decimal()
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = PlanningConfig::default();

        assert_eq!(config.decimal_places(), 3);
        assert_eq!(config.batch_size(), 25);
        assert_eq!(config.capacity_of(4), Decimal::from(100));
    }

    #[rstest]
    #[case(0, true)]
    #[case(3, true)]
    #[case(6, true)]
    #[case(7, false)]
    #[case(42, false)]
    fn test_decimal_places_range(#[case] places: u32, #[case] valid: bool) {
        assert_eq!(PlanningConfig::new().with_decimal_places(places).is_ok(), valid);
    }

    #[test]
    fn test_rejected_setting_keeps_previous_value() {
        let mut config = PlanningConfig::new().with_decimal_places(2).unwrap();

        assert!(matches!(
            config.set_decimal_places(9),
            Err(PlanError::InvalidDecimalPlaces(9))
        ));
        assert_eq!(config.decimal_places(), 2);
    }

    #[test]
    fn test_round_uses_configured_precision() {
        let config = PlanningConfig::new().with_decimal_places(2).unwrap();

        assert_eq!(config.round(Decimal::new(12345, 3)), Decimal::new(1234, 2)); // 12.345 -> 12.34
        assert_eq!(config.round(Decimal::new(12355, 3)), Decimal::new(1236, 2)); // 12.355 -> 12.36
        assert_eq!(config.round(Decimal::new(10005, 3)), Decimal::new(1000, 2)); // 10.005 -> 10.00

        // 重複捨入結果不變
        let once = config.round(Decimal::new(10005, 3));
        assert_eq!(config.round(once), once);
    }

    #[test]
    fn test_validate_deserialized_config() {
        let config: PlanningConfig =
            serde_json::from_str(r#"{"decimal_places": 9, "batch_size": 25}"#).unwrap();
        assert!(config.validate().is_err());
    }
}
