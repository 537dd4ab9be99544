//! 數值範圍檢查

use rust_decimal::Decimal;

use crate::{CutError, Result};

/// 檢查數值大於 0
pub fn ensure_positive(value: Decimal, field: &'static str) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(CutError::NotPositive { field, value });
    }
    Ok(value)
}

/// 檢查數值不低於下限
pub fn ensure_at_least(value: Decimal, field: &'static str, min: Decimal) -> Result<Decimal> {
    if value < min {
        return Err(CutError::BelowMinimum { field, value, min });
    }
    Ok(value)
}

/// 檢查數值位於閉區間 [min, max]
pub fn ensure_between(
    value: Decimal,
    field: &'static str,
    min: Decimal,
    max: Decimal,
) -> Result<Decimal> {
    if value < min || value > max {
        return Err(CutError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Decimal::ONE, true)]
    #[case(Decimal::ZERO, false)]
    #[case(Decimal::NEGATIVE_ONE, false)]
    fn test_ensure_positive(#[case] value: Decimal, #[case] ok: bool) {
        assert_eq!(ensure_positive(value, "length").is_ok(), ok);
    }

    #[test]
    fn test_ensure_at_least() {
        assert_eq!(
            ensure_at_least(Decimal::ZERO, "blade_thickness", Decimal::ZERO).unwrap(),
            Decimal::ZERO
        );

        let err = ensure_at_least(Decimal::new(-5, 3), "blade_thickness", Decimal::ZERO).unwrap_err();
        assert!(matches!(
            err,
            CutError::BelowMinimum { field: "blade_thickness", .. }
        ));
        assert!(err.is_validation());
    }

    #[rstest]
    #[case(Decimal::from(0), true)]
    #[case(Decimal::from(90), true)]
    #[case(Decimal::from(180), true)]
    #[case(Decimal::from(181), false)]
    #[case(Decimal::new(-1, 1), false)]
    fn test_ensure_between(#[case] value: Decimal, #[case] ok: bool) {
        let result = ensure_between(value, "left_angle", Decimal::ZERO, Decimal::from(180));
        assert_eq!(result.is_ok(), ok);
    }
}
