//! 候選排樣挑選

use rust_decimal::Decimal;

use cutstock_core::{CutBar, CutConfig, PatternKey};

/// 每種需求長度挑出的候選排樣
#[derive(Debug, Clone, Default)]
pub struct CandidateSelection {
    /// 候選排樣（去重，依長度出現順序）
    pub patterns: Vec<CutBar>,

    /// 沒有任何排樣包含的長度
    pub uncovered: Vec<Decimal>,
}

impl CandidateSelection {
    /// 合併另一批候選（用於補充標準棒材排樣）
    pub fn merge(&mut self, other: CandidateSelection) {
        for pattern in other.patterns {
            let key = pattern.pattern_key();
            if !self.patterns.iter().any(|p| p.pattern_key() == key) {
                self.patterns.push(pattern);
            }
        }
        self.uncovered.retain(|length| other.uncovered.contains(length));
    }
}

/// 候選排樣挑選器
pub struct CandidateSelector;

impl CandidateSelector {
    /// 對每種長度挑出包含該長度且餘料最小的排樣
    ///
    /// 啟用餘料篩選時先在符合條件的排樣中挑選，若都不符合則回退到全部排樣。
    pub fn select(
        patterns: &[CutBar],
        required_lengths: &[Decimal],
        config: &CutConfig,
    ) -> CandidateSelection {
        let mut selection = CandidateSelection::default();
        let mut keys: Vec<PatternKey> = Vec::new();

        for &length in required_lengths {
            let containing: Vec<&CutBar> =
                patterns.iter().filter(|p| p.contains_length(length)).collect();

            let mut pool = containing.clone();
            if config.uses_fall_filter() {
                let accepted: Vec<&CutBar> = containing
                    .iter()
                    .copied()
                    .filter(|p| config.accepts_fall(p.fall()))
                    .collect();
                if !accepted.is_empty() {
                    pool = accepted;
                }
            }

            match pool.into_iter().min_by(|a, b| a.fall().cmp(&b.fall())) {
                Some(best) => {
                    let key = best.pattern_key();
                    if !keys.contains(&key) {
                        keys.push(key);
                        selection.patterns.push(best.clone());
                    }
                }
                None => selection.uncovered.push(length),
            }
        }

        selection
    }
}
