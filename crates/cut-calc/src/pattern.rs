//! 單支棒材排樣生成

use std::collections::HashSet;

use cutstock_core::{Bar, CutBar, CutConfig, CutPiece, Demand, PatternKey, Result, StockBars};

use crate::guard::SearchGuard;

/// 排樣生成器
///
/// 對每種棒材長度，列舉所有能放入單支棒材的切割件組合（去重後依餘料遞增排序）。
pub struct PatternGenerator<'a> {
    config: &'a CutConfig,
    guard: &'a SearchGuard,
}

impl<'a> PatternGenerator<'a> {
    pub fn new(config: &'a CutConfig, guard: &'a SearchGuard) -> Self {
        Self { config, guard }
    }

    /// 依庫存中不同有效長度的棒材生成排樣；庫存為空時改用標準棒材
    pub fn generate(&self, stock: &StockBars, demand: &Demand) -> Result<Vec<CutBar>> {
        let mut bars = stock.distinct_by_effective_length();
        if bars.is_empty() {
            if let Some(standard) = self.config.standard_bar() {
                bars.push(standard);
            }
        }
        self.generate_for_bars(&bars, demand)
    }

    /// 為指定棒材生成排樣
    pub fn generate_for_bars(&self, bars: &[&Bar], demand: &Demand) -> Result<Vec<CutBar>> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();

        for bar in bars {
            let candidates = self.minimise_candidates(bar, demand);
            let template = CutBar::with_dimensions_of(bar, self.config.blade_thickness());
            self.explore(&mut found, &mut seen, template, &candidates)?;

            tracing::trace!(
                "棒材 {} 候選件 {} 件，累計排樣 {} 種",
                bar.length(),
                candidates.len(),
                found.len()
            );
        }

        found.retain(|pattern| pattern.piece_count() > 0);
        found.sort_by(|a, b| a.fall().cmp(&b.fall()));
        Ok(found)
    }

    /// 每種長度只保留單支棒材放得下的數量
    fn minimise_candidates(&self, bar: &Bar, demand: &Demand) -> Vec<CutPiece> {
        let blade = self.config.blade_thickness();
        let mut candidates = Vec::new();

        for length in demand.distinct_lengths() {
            let mut sum = rust_decimal::Decimal::ZERO;
            for piece in demand.iter().filter(|p| p.length() == length) {
                sum += piece.length();
                if sum > bar.effective_length() {
                    break;
                }
                candidates.push(piece.clone());
                sum += blade;
            }
        }

        candidates
    }

    /// 深度優先列舉：同一層跳過的件不會在更深層再出現，避免排列重複
    fn explore(
        &self,
        found: &mut Vec<CutBar>,
        seen: &mut HashSet<PatternKey>,
        candidate: CutBar,
        remaining: &[CutPiece],
    ) -> Result<()> {
        self.guard.check()?;

        let key = candidate.pattern_key();
        if seen.contains(&key) {
            return Ok(());
        }
        // 最後一刀不需要鋸片損耗
        if candidate.fall() < -self.config.blade_thickness() {
            return Ok(());
        }

        seen.insert(key);
        found.push(candidate.clone());

        for (index, piece) in remaining.iter().enumerate() {
            let next = candidate.with_piece(piece.clone());
            self.explore(found, seen, next, &remaining[index + 1..])?;
        }

        Ok(())
    }
}
