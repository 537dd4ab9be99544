//! 下料最佳化主流程

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cutstock_core::{CutBars, CutConfig, CutError, Demand, Result, StockBars};

use crate::combination::CombinationSearch;
use crate::guard::SearchGuard;
use crate::pattern::PatternGenerator;
use crate::selection::CandidateSelector;
use crate::OptimizationResult;

/// 下料最佳化器
///
/// 每一輪：生成排樣、為每種長度挑選候選、搜尋候選組合、提交最佳結果，
/// 直到所有需求都已分配。
pub struct CutOptimizer {
    config: CutConfig,
    stock: StockBars,
    demand: Demand,
    cancelled: Arc<AtomicBool>,
}

impl CutOptimizer {
    /// 創建新的最佳化器（配置會重新檢查）
    pub fn new(config: CutConfig, stock: StockBars, demand: Demand) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stock,
            demand,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &CutConfig {
        &self.config
    }

    pub fn stock(&self) -> &StockBars {
        &self.stock
    }

    pub fn demand(&self) -> &Demand {
        &self.demand
    }

    /// 請求取消（可從其他執行緒呼叫）
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// 取消旗標，供其他執行緒持有
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// 執行最佳化，只返回切割結果
    pub fn optimize(&self) -> Result<CutBars> {
        self.run().map(|result| result.cut_bars)
    }

    /// 執行最佳化
    ///
    /// 輸入的庫存與需求不會被修改，重複呼叫得到相同結果。
    pub fn run(&self) -> Result<OptimizationResult> {
        tracing::info!(
            "開始下料最佳化：需求 {} 件，庫存 {} 支",
            self.demand.len(),
            self.stock.len()
        );

        let start_time = std::time::Instant::now();
        let guard = SearchGuard::new(self.cancelled.clone(), self.config.time_limit_ms());

        let mut demand = self.demand.clone();
        let mut stock = self.stock.clone();
        let mut cut_bars = CutBars::new(self.config.min_recovered_fall());
        let mut rounds = 0;

        while !demand.is_empty() {
            rounds += 1;
            tracing::debug!(
                "第 {} 輪：剩餘需求 {} 件，剩餘庫存 {} 支",
                rounds,
                demand.len(),
                stock.len()
            );

            let winner = self
                .run_round(&guard, &demand, &stock)
                .map_err(|e| match e {
                    CutError::Cancelled { .. } => {
                        tracing::warn!("最佳化已取消：已完成 {} 支棒材", cut_bars.len());
                        CutError::Cancelled {
                            completed_bars: cut_bars.len(),
                        }
                    }
                    other => other,
                })?;

            Self::commit(&winner, &mut demand, &mut stock);
            tracing::debug!(
                "第 {} 輪完成：{} 支棒材，平均損耗 {}",
                rounds,
                winner.len(),
                winner.average_fall()
            );
            cut_bars.extend(winner.into_bars());
        }

        let elapsed = start_time.elapsed().as_millis();
        tracing::info!(
            "下料最佳化完成：{} 支棒材，總損耗 {}（{}%），耗時 {} ms",
            cut_bars.total_bar_count(),
            cut_bars.total_fall_length(),
            cut_bars.total_fall_percent(),
            elapsed
        );

        Ok(OptimizationResult {
            cut_bars,
            rounds,
            calculation_time_ms: Some(elapsed),
        })
    }

    fn run_round(&self, guard: &SearchGuard, demand: &Demand, stock: &StockBars) -> Result<CutBars> {
        // Step 1: 生成排樣
        let generator = PatternGenerator::new(&self.config, guard);
        let patterns = generator.generate(stock, demand)?;
        tracing::debug!("Step 1: 生成排樣 {} 種", patterns.len());

        // Step 2: 每種長度挑選候選排樣
        let required = demand.distinct_lengths();
        let mut selection = CandidateSelector::select(&patterns, &required, &self.config);

        // 庫存棒材放不下的長度改用標準棒材
        if !selection.uncovered.is_empty() && !stock.is_empty() {
            if let Some(standard) = self.config.standard_bar() {
                tracing::warn!(
                    "庫存棒材放不下長度 {:?}，改用標準棒材 {}",
                    selection.uncovered,
                    standard.length()
                );
                let fallback = generator.generate_for_bars(&[standard], demand)?;
                let extra = CandidateSelector::select(&fallback, &selection.uncovered, &self.config);
                selection.merge(extra);
            }
        }

        if let Some(&length) = selection.uncovered.first() {
            tracing::error!("長度 {} 無法放入任何棒材", length);
            return Err(CutError::Unsatisfiable {
                length,
                remaining: demand.len(),
            });
        }
        tracing::debug!("Step 2: 候選排樣 {} 種", selection.patterns.len());

        // Step 3: 組合搜尋
        let search = CombinationSearch::new(&self.config, guard);
        let alternatives = search.search(&selection.patterns, demand, stock)?;
        tracing::debug!("Step 3: 候選結果 {} 個", alternatives.len());

        CombinationSearch::select_best(alternatives).ok_or(CutError::Unsatisfiable {
            length: required.first().copied().unwrap_or_default(),
            remaining: demand.len(),
        })
    }

    /// 從工作副本中移除已分配的切割件與已使用的庫存棒材
    fn commit(winner: &CutBars, demand: &mut Demand, stock: &mut StockBars) {
        for cut_bar in winner {
            for piece in cut_bar.pieces() {
                let removed = demand.remove_by_id(piece.id());
                debug_assert!(removed.is_some(), "切割件 {} 不在剩餘需求中", piece.id());
            }
            if let Some(bar) = cut_bar.bar() {
                let removed = stock.remove_by_id(bar.id());
                debug_assert!(removed.is_some(), "棒材 {} 不在剩餘庫存中", bar.id());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutstock_core::{Bar, BarInfo, CutBar, CutPiece};
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn demand_of(lengths: &[&str]) -> Demand {
        let mut demand = Demand::new(Arc::new(BarInfo::new()));
        demand.extend(lengths.iter().map(|l| CutPiece::new(d(l)).unwrap()));
        demand
    }

    fn stock_of(lengths: &[&str]) -> StockBars {
        let mut stock = StockBars::new();
        stock.extend(lengths.iter().map(|l| Bar::new(d(l)).unwrap()));
        stock
    }

    fn sorted_lengths(cut_bars: &CutBars) -> Vec<Decimal> {
        let mut lengths: Vec<Decimal> = cut_bars
            .iter()
            .flat_map(|b| b.piece_lengths())
            .collect();
        lengths.sort();
        lengths
    }

    #[test]
    fn test_five_pieces_on_one_standard_bar() {
        let config = CutConfig::new()
            .with_blade_thickness(d("0.005"))
            .unwrap()
            .with_standard_bar(Bar::new(d("6.5")).unwrap());
        let optimizer =
            CutOptimizer::new(config, StockBars::new(), demand_of(&["1.2"; 5])).unwrap();

        let result = optimizer.run().unwrap();

        assert_eq!(result.rounds, 1);
        assert_eq!(result.cut_bars.total_bar_count(), 1);
        assert_eq!(result.cut_bars.bars()[0].fall(), d("0.475"));
        assert_eq!(result.cut_bars.bars_not_stocked(), 1);
        assert!(result.calculation_time_ms.is_some());
    }

    #[test]
    fn test_empty_demand() {
        let optimizer =
            CutOptimizer::new(CutConfig::new(), stock_of(&["6"]), demand_of(&[])).unwrap();

        let result = optimizer.run().unwrap();
        assert!(result.cut_bars.is_empty());
        assert_eq!(result.rounds, 0);
    }

    #[rstest]
    #[case::no_stock_no_standard(&[], None)]
    #[case::everything_too_short(&["9", "8"], Some("9"))]
    fn test_unsatisfiable(#[case] stock: &[&str], #[case] standard: Option<&str>) {
        let mut config = CutConfig::new();
        if let Some(length) = standard {
            config = config.with_standard_bar(Bar::new(d(length)).unwrap());
        }
        let optimizer = CutOptimizer::new(config, stock_of(stock), demand_of(&["10"])).unwrap();

        let err = optimizer.optimize().unwrap_err();
        assert_eq!(
            err,
            CutError::Unsatisfiable {
                length: d("10"),
                remaining: 1
            }
        );
    }

    #[test]
    fn test_standard_bar_fills_gap_left_by_stock() {
        let config = CutConfig::new().with_standard_bar(Bar::new(d("6.5")).unwrap());
        let optimizer =
            CutOptimizer::new(config, stock_of(&["4"]), demand_of(&["5", "3"])).unwrap();

        let cut_bars = optimizer.optimize().unwrap();

        assert_eq!(cut_bars.total_bar_count(), 2);
        assert_eq!(cut_bars.bars_not_stocked(), 1);
        assert_eq!(cut_bars.total_fall_length(), d("2.5"));
    }

    #[test]
    fn test_fall_filter_changes_layout() {
        let standard = Bar::new(d("10")).unwrap();
        let unfiltered = CutOptimizer::new(
            CutConfig::new().with_standard_bar(standard.clone()),
            StockBars::new(),
            demand_of(&["6", "3"]),
        )
        .unwrap()
        .optimize()
        .unwrap();

        let filtered_config = CutConfig::new()
            .with_standard_bar(standard)
            .with_min_recovered_fall(d("4"))
            .unwrap()
            .with_max_fall_non_recoverable(d("1"))
            .unwrap();
        let filtered = CutOptimizer::new(filtered_config, StockBars::new(), demand_of(&["6", "3"]))
            .unwrap()
            .optimize()
            .unwrap();

        assert_eq!(unfiltered.total_bar_count(), 1);
        assert_eq!(filtered.total_bar_count(), 2);
        assert!(unfiltered.total_fall_length() <= filtered.total_fall_length());
        assert_eq!(filtered.recovered_fall_bar_count(), 2);
    }

    #[test]
    fn test_inputs_left_untouched() {
        let config = CutConfig::new().with_standard_bar(Bar::new(d("6")).unwrap());
        let optimizer =
            CutOptimizer::new(config, stock_of(&["4", "4"]), demand_of(&["3", "2", "2"])).unwrap();

        let first = optimizer.optimize().unwrap();
        let second = optimizer.optimize().unwrap();

        assert_eq!(first, second);
        assert_eq!(optimizer.stock().len(), 2);
        assert_eq!(optimizer.demand().len(), 3);
    }

    #[test]
    fn test_stock_bar_used_at_most_once() {
        let config = CutConfig::new().with_standard_bar(Bar::new(d("6")).unwrap());
        let optimizer = CutOptimizer::new(
            config,
            stock_of(&["4", "4", "5"]),
            demand_of(&["3", "3", "3", "3", "4", "1"]),
        )
        .unwrap();

        let cut_bars = optimizer.optimize().unwrap();
        let mut ids: Vec<usize> = cut_bars.iter().filter_map(|b| b.bar().map(|s| s.id())).collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_cancel_before_run() {
        let config = CutConfig::new().with_standard_bar(Bar::new(d("6")).unwrap());
        let optimizer = CutOptimizer::new(config, StockBars::new(), demand_of(&["1"])).unwrap();

        optimizer.cancel();
        assert!(optimizer.cancel_handle().load(Ordering::Relaxed));
        assert_eq!(
            optimizer.optimize().unwrap_err(),
            CutError::Cancelled { completed_bars: 0 }
        );
    }

    #[test]
    fn test_time_limit_expired() {
        let config = CutConfig::new()
            .with_standard_bar(Bar::new(d("6")).unwrap())
            .with_time_limit_ms(0);
        let optimizer = CutOptimizer::new(config, StockBars::new(), demand_of(&["1"])).unwrap();

        assert!(matches!(optimizer.run(), Err(CutError::Cancelled { .. })));
    }

    #[test]
    fn test_commit_removes_materialized_pieces_and_stock() {
        let config = CutConfig::new();
        let guard = SearchGuard::unbounded();
        let search = CombinationSearch::new(&config, &guard);

        let mut demand = demand_of(&["3", "3", "1"]);
        let mut stock = stock_of(&["4", "4", "6"]);

        let mut branch_demand = demand.clone();
        let mut branch_stock = stock.clone();
        let mut winner = CutBars::new(Decimal::ZERO);
        winner.extend(search.materialize(
            &CutBar::new(d("4"), Decimal::ZERO, Decimal::ZERO)
                .unwrap()
                .with_piece(CutPiece::new(d("3")).unwrap()),
            &mut branch_demand,
            &mut branch_stock,
        ));

        CutOptimizer::commit(&winner, &mut demand, &mut stock);

        assert_eq!(demand.len(), 1);
        assert_eq!(demand.pieces()[0].length(), d("1"));
        assert_eq!(stock.len(), 1);
        assert_eq!(stock.bars()[0].length(), d("6"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_commit_rejects_unknown_piece() {
        let mut demand = demand_of(&["3"]);
        let mut stock = stock_of(&["4"]);

        // 序號 99 不在需求中
        let mut foreign = demand_of(&["2"; 99]);
        let piece = foreign.remove_by_id(99).unwrap();
        let mut winner = CutBars::new(Decimal::ZERO);
        winner.push(
            CutBar::new(d("4"), Decimal::ZERO, Decimal::ZERO)
                .unwrap()
                .with_piece(piece),
        );

        CutOptimizer::commit(&winner, &mut demand, &mut stock);
    }

    fn generated_optimizer(pieces: &[u32], stock: &[u32], blade: u32) -> CutOptimizer {
        let config = CutConfig::new()
            .with_blade_thickness(Decimal::from(blade))
            .unwrap()
            .with_standard_bar(Bar::new(Decimal::from(15)).unwrap());

        let mut demand = Demand::new(Arc::new(BarInfo::new()));
        demand.extend(pieces.iter().map(|&l| CutPiece::new(Decimal::from(l)).unwrap()));
        let mut stock_bars = StockBars::new();
        stock_bars.extend(stock.iter().map(|&l| Bar::new(Decimal::from(l)).unwrap()));

        CutOptimizer::new(config, stock_bars, demand).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_repeated_runs_match(
            pieces in prop::collection::vec(1u32..=9, 1..7),
            stock in prop::collection::vec(5u32..=15, 0..4),
            blade in 0u32..=1,
        ) {
            let optimizer = generated_optimizer(&pieces, &stock, blade);

            let first = optimizer.optimize().unwrap();
            let second = optimizer.optimize().unwrap();

            prop_assert_eq!(first.total_fall_length(), second.total_fall_length());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_every_piece_cut_exactly_once(
            pieces in prop::collection::vec(1u32..=5, 1..6),
            stock in prop::collection::vec(6u32..=10, 0..3),
            blade in 0u32..=1,
        ) {
            let config = CutConfig::new()
                .with_blade_thickness(Decimal::from(blade))
                .unwrap()
                .with_standard_bar(Bar::new(Decimal::from(10)).unwrap());

            let mut demand = Demand::new(Arc::new(BarInfo::new()));
            demand.extend(pieces.iter().map(|&l| CutPiece::new(Decimal::from(l)).unwrap()));
            let mut stock_bars = StockBars::new();
            stock_bars.extend(stock.iter().map(|&l| Bar::new(Decimal::from(l)).unwrap()));

            let cut_bars = CutOptimizer::new(config, stock_bars, demand)
                .unwrap()
                .optimize()
                .unwrap();

            let mut expected: Vec<Decimal> = pieces.iter().map(|&l| Decimal::from(l)).collect();
            expected.sort();
            prop_assert_eq!(sorted_lengths(&cut_bars), expected);

            for cut_bar in &cut_bars {
                prop_assert!(cut_bar.fall() >= -Decimal::from(blade));
            }
        }
    }
}
