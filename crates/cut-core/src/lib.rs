//! # Cutstock Core
//!
//! 一維下料的核心資料模型與類型定義

pub mod bar;
pub mod bar_info;
pub mod config;
pub mod cut_bar;
pub mod cut_bars;
pub mod demand;
pub mod piece;
pub mod stock;
pub mod validation;

// Re-export 主要類型
pub use bar::Bar;
pub use bar_info::BarInfo;
pub use config::CutConfig;
pub use cut_bar::{CutBar, PatternKey};
pub use cut_bars::{CutBars, LayoutGroup};
pub use demand::Demand;
pub use piece::CutPiece;
pub use stock::StockBars;

use rust_decimal::Decimal;

/// 下料錯誤類型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CutError {
    #[error("'{field}' 必須大於 0（實際值 {value}）")]
    NotPositive { field: &'static str, value: Decimal },

    #[error("'{field}' 必須大於或等於 {min}（實際值 {value}）")]
    BelowMinimum {
        field: &'static str,
        value: Decimal,
        min: Decimal,
    },

    #[error("'{field}' 必須位於 [{min}..{max}]（實際值 {value}）")]
    OutOfRange {
        field: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("無法完成下料：長度 {length} 無法放入任何庫存棒材或標準棒材（剩餘 {remaining} 件）")]
    Unsatisfiable { length: Decimal, remaining: usize },

    #[error("最佳化已取消（已完成 {completed_bars} 支棒材）")]
    Cancelled { completed_bars: usize },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),
}

impl CutError {
    /// 是否為建構時的數值範圍錯誤
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CutError::NotPositive { .. } | CutError::BelowMinimum { .. } | CutError::OutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CutError>;
