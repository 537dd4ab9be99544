//! 組合搜尋（排樣實體化與分支定界）

use rust_decimal::Decimal;

use cutstock_core::{CutBar, CutBars, CutConfig, Demand, Result, StockBars};

use crate::guard::SearchGuard;

/// 組合搜尋器
///
/// 在候選排樣的所有順序中，依序把排樣實體化到需求與庫存上，
/// 記錄每個終止狀態的切割結果，並以目前最小總損耗剪枝。
pub struct CombinationSearch<'a> {
    config: &'a CutConfig,
    guard: &'a SearchGuard,
}

struct SearchState {
    alternatives: Vec<CutBars>,
    best_total_fall: Option<Decimal>,
}

impl<'a> CombinationSearch<'a> {
    pub fn new(config: &'a CutConfig, guard: &'a SearchGuard) -> Self {
        Self { config, guard }
    }

    /// 將排樣重複套用到需求上，直到件數不足或棒材用完
    ///
    /// 每一支都是全有或全無：缺任何一件就把已取出的件放回需求並停止。
    pub fn materialize(
        &self,
        pattern: &CutBar,
        demand: &mut Demand,
        stock: &mut StockBars,
    ) -> Vec<CutBar> {
        let length = pattern.bar_length();
        let init_fall = pattern.init_fall();
        let is_standard = self.config.is_standard_bar(length, init_fall);
        let mut produced = Vec::new();

        loop {
            let has_stock = stock.contains_matching(length, init_fall);
            if !(has_stock || is_standard) || demand.len() < pattern.piece_count() {
                break;
            }

            let mut removed = Vec::with_capacity(pattern.piece_count());
            for piece in pattern.pieces() {
                match demand.take_length(piece.length()) {
                    Some(taken) => removed.push(taken),
                    None => {
                        demand.restore(removed.drain(..));
                        break;
                    }
                }
            }
            if removed.is_empty() {
                break;
            }

            let mut cut_bar = pattern.empty_copy();
            if has_stock {
                if let Some(bar) = stock.take_matching(length, init_fall) {
                    cut_bar.bind_bar(bar);
                }
            }
            for piece in removed {
                cut_bar.push_piece(piece);
            }
            produced.push(cut_bar);
        }

        tracing::trace!("排樣 {} 實體化 {} 支", pattern, produced.len());
        produced
    }

    /// 搜尋所有排樣順序，返回每個終止狀態的切割結果
    pub fn search(
        &self,
        patterns: &[CutBar],
        demand: &Demand,
        stock: &StockBars,
    ) -> Result<Vec<CutBars>> {
        let mut state = SearchState {
            alternatives: Vec::new(),
            best_total_fall: None,
        };
        let pool: Vec<&CutBar> = patterns.iter().collect();

        self.explore(
            &mut state,
            &pool,
            demand.clone(),
            stock.clone(),
            CutBars::new(self.config.min_recovered_fall()),
        )?;

        tracing::debug!("組合搜尋完成：{} 個候選結果", state.alternatives.len());
        Ok(state.alternatives)
    }

    fn explore(
        &self,
        state: &mut SearchState,
        pool: &[&CutBar],
        demand: Demand,
        stock: StockBars,
        current: CutBars,
    ) -> Result<()> {
        self.guard.check()?;

        let current_fall = current.total_fall_length();
        if state.best_total_fall.is_some_and(|best| best < current_fall) {
            return Ok(());
        }

        if demand.is_empty() || pool.is_empty() {
            state.best_total_fall = Some(match state.best_total_fall {
                Some(best) => best.min(current_fall),
                None => current_fall,
            });
            state.alternatives.push(current);
            return Ok(());
        }

        for (index, pattern) in pool.iter().enumerate() {
            let mut branch_demand = demand.clone();
            let mut branch_stock = stock.clone();
            let mut branch = current.clone();
            branch.extend(self.materialize(pattern, &mut branch_demand, &mut branch_stock));

            let rest: Vec<&CutBar> = pool
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, p)| *p)
                .collect();

            self.explore(state, &rest, branch_demand, branch_stock, branch)?;
        }

        Ok(())
    }

    /// 挑選平均損耗最小的結果（同值取先出現者），忽略沒有任何棒材的結果
    pub fn select_best(alternatives: Vec<CutBars>) -> Option<CutBars> {
        let mut best: Option<CutBars> = None;
        for alternative in alternatives.into_iter().filter(|a| !a.is_empty()) {
            let better = match &best {
                Some(current) => alternative.average_fall() < current.average_fall(),
                None => true,
            };
            if better {
                best = Some(alternative);
            }
        }
        best
    }
}
