//! # Cutstock Calculation Engine
//!
//! 一維下料最佳化引擎

pub mod combination;
pub mod guard;
pub mod optimizer;
pub mod pattern;
pub mod selection;

// Re-export 主要類型
pub use combination::CombinationSearch;
pub use guard::SearchGuard;
pub use optimizer::CutOptimizer;
pub use pattern::PatternGenerator;
pub use selection::{CandidateSelection, CandidateSelector};

use serde::Serialize;

/// 下料最佳化結果
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    /// 切割棒材（依提交順序）
    pub cut_bars: cutstock_core::CutBars,

    /// 執行輪數
    pub rounds: usize,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl OptimizationResult {
    /// 輸出為 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
