//! 切割件模型（需求中的單一件）

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::validation::{ensure_between, ensure_positive};
use crate::Result;

/// 直角切
const SQUARE_CUT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);
const MAX_ANGLE: Decimal = Decimal::from_parts(180, 0, 0, false, 0);

/// 切割件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutPiece {
    /// 序號（加入需求集合時指派，從 1 開始）
    id: usize,

    /// 長度
    length: Decimal,

    /// 左端切角（度）
    left_angle: Decimal,

    /// 右端切角（度）
    right_angle: Decimal,

    /// 斷面高度（加入需求集合時由 BarInfo 帶入）
    height: Decimal,
}

impl CutPiece {
    /// 創建直角切的切割件
    pub fn new(length: Decimal) -> Result<Self> {
        Ok(Self {
            id: 0,
            length: ensure_positive(length, "length")?,
            left_angle: SQUARE_CUT,
            right_angle: SQUARE_CUT,
            height: Decimal::ZERO,
        })
    }

    /// 創建帶切角的切割件，角度必須位於 [0°, 180°]
    pub fn with_angles(length: Decimal, left_angle: Decimal, right_angle: Decimal) -> Result<Self> {
        let mut piece = Self::new(length)?;
        piece.left_angle = ensure_between(left_angle, "left_angle", Decimal::ZERO, MAX_ANGLE)?;
        piece.right_angle = ensure_between(right_angle, "right_angle", Decimal::ZERO, MAX_ANGLE)?;
        Ok(piece)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn length(&self) -> Decimal {
        self.length
    }

    pub fn left_angle(&self) -> Decimal {
        self.left_angle
    }

    pub fn right_angle(&self) -> Decimal {
        self.right_angle
    }

    pub fn height(&self) -> Decimal {
        self.height
    }

    /// 斜切造成的損耗 = round(height / tan(angle), 3)
    ///
    /// 0° 與 180° 時 tan 為 0，損耗無定義，視為 0。
    /// 結果超出 `Decimal` 範圍時取 `Decimal::MAX` / `Decimal::MIN`。
    pub fn fall_from_angle(&self, angle: Decimal) -> Decimal {
        // Decimal 轉 f64 只會損失精度，不會失敗
        let radians = angle.to_f64().unwrap_or(90.0).to_radians();
        let tan = radians.tan();
        if tan.abs() < 1e-9 {
            return Decimal::ZERO;
        }

        let ratio = self.height.to_f64().unwrap_or(0.0) / tan;
        let fall = Decimal::from_f64(ratio).unwrap_or(if ratio.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        });
        fall.round_dp(3)
    }

    pub fn left_fall(&self) -> Decimal {
        self.fall_from_angle(self.left_angle)
    }

    pub fn right_fall(&self) -> Decimal {
        self.fall_from_angle(self.right_angle)
    }

    /// 內側長度 = 長度 - 左右斜切損耗
    pub fn internal_length(&self) -> Decimal {
        self.length
            .saturating_sub(self.left_fall())
            .saturating_sub(self.right_fall())
    }

    pub(crate) fn assign_id(&mut self, id: usize) {
        self.id = id;
    }

    /// 高度來自已檢查過的 BarInfo
    pub(crate) fn assign_height(&mut self, height: Decimal) {
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn piece_with_height(height: i64, left: i64, right: i64) -> CutPiece {
        let mut piece =
            CutPiece::with_angles(Decimal::from(1000), Decimal::from(left), Decimal::from(right))
                .unwrap();
        piece.assign_height(Decimal::from(height));
        piece
    }

    #[test]
    fn test_square_cut_by_default() {
        let piece = CutPiece::new(Decimal::new(12, 1)).unwrap();
        assert_eq!(piece.left_angle(), Decimal::from(90));
        assert_eq!(piece.right_angle(), Decimal::from(90));
        assert_eq!(piece.internal_length(), Decimal::new(12, 1));
    }

    #[rstest]
    #[case(90, Decimal::ZERO)]
    #[case(45, Decimal::from(220))]
    #[case(135, Decimal::from(-220))]
    #[case(0, Decimal::ZERO)]
    #[case(180, Decimal::ZERO)]
    fn test_fall_from_angle(#[case] angle: i64, #[case] expected: Decimal) {
        let piece = piece_with_height(220, 90, 90);
        assert_eq!(piece.fall_from_angle(Decimal::from(angle)), expected);
    }

    #[test]
    fn test_internal_length_with_miter() {
        // 左 45° 損耗 220，右 90° 損耗 0
        let piece = piece_with_height(220, 45, 90);
        assert_eq!(piece.internal_length(), Decimal::from(780));
    }

    #[test]
    fn test_fall_saturates_beyond_decimal_range() {
        // 極小角度的 tan 約 1.7e-8，height / tan 超出 Decimal 範圍
        let tiny = Decimal::new(1, 6);
        let mut piece = CutPiece::with_angles(Decimal::ONE, tiny, MAX_ANGLE - tiny).unwrap();
        piece.assign_height(Decimal::MAX);

        assert_eq!(piece.left_fall(), Decimal::MAX);
        assert_eq!(piece.right_fall(), Decimal::MIN);
        assert_eq!(piece.fall_from_angle(Decimal::from(90)), Decimal::ZERO);

        piece = CutPiece::with_angles(Decimal::ONE, tiny, tiny).unwrap();
        piece.assign_height(Decimal::MAX);
        assert_eq!(piece.internal_length(), Decimal::MIN);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(CutPiece::new(Decimal::ZERO).is_err());
        assert!(CutPiece::with_angles(Decimal::ONE, Decimal::from(181), Decimal::from(90)).is_err());
        assert!(CutPiece::with_angles(Decimal::ONE, Decimal::from(90), Decimal::from(-1)).is_err());
    }
}
