//! # Cutstock
//!
//! 一維下料最佳化：以最少損耗把切割需求分配到庫存棒材與標準棒材上。
//!
//! ```
//! use std::sync::Arc;
//! use cutstock::{Bar, BarInfo, CutConfig, CutOptimizer, CutPiece, Demand, StockBars};
//! use rust_decimal::Decimal;
//!
//! let config = CutConfig::new()
//!     .with_blade_thickness(Decimal::new(5, 3))?
//!     .with_standard_bar(Bar::new(Decimal::new(65, 1))?);
//!
//! let mut demand = Demand::new(Arc::new(BarInfo::new()));
//! for _ in 0..5 {
//!     demand.insert(CutPiece::new(Decimal::new(12, 1))?);
//! }
//!
//! let cut_bars = CutOptimizer::new(config, StockBars::new(), demand)?.optimize()?;
//! assert_eq!(cut_bars.total_bar_count(), 1);
//! # Ok::<(), cutstock::CutError>(())
//! ```

pub use cutstock_calc::{
    CandidateSelection, CandidateSelector, CombinationSearch, CutOptimizer, OptimizationResult,
    PatternGenerator, SearchGuard,
};
pub use cutstock_core::{
    Bar, BarInfo, CutBar, CutBars, CutConfig, CutError, CutPiece, Demand, LayoutGroup, PatternKey,
    Result, StockBars,
};
