//! 下料結果（切割棒材序列及統計）

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{CutBar, PatternKey};

/// 下料結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutBars {
    /// 最小可回收餘料
    min_recovered_fall: Decimal,

    /// 切割棒材（依產生順序）
    bars: Vec<CutBar>,
}

/// 相同排樣的彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutGroup {
    pub bar_length: Decimal,
    pub piece_lengths: Vec<Decimal>,
    pub fall: Decimal,
    pub fall_percent: Decimal,
    pub count: usize,
}

impl CutBars {
    pub fn new(min_recovered_fall: Decimal) -> Self {
        Self {
            min_recovered_fall,
            bars: Vec::new(),
        }
    }

    pub fn push(&mut self, cut_bar: CutBar) {
        self.bars.push(cut_bar);
    }

    pub fn extend(&mut self, cut_bars: impl IntoIterator<Item = CutBar>) {
        self.bars.extend(cut_bars);
    }

    pub fn min_recovered_fall(&self) -> Decimal {
        self.min_recovered_fall
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CutBar> {
        self.bars.iter()
    }

    pub fn bars(&self) -> &[CutBar] {
        &self.bars
    }

    pub fn into_bars(self) -> Vec<CutBar> {
        self.bars
    }

    /// 所有切割件總長
    pub fn total_piece_length(&self) -> Decimal {
        self.bars.iter().map(|b| b.total_piece_length()).sum()
    }

    /// 所有切割件數量
    pub fn total_piece_count(&self) -> usize {
        self.bars.iter().map(|b| b.piece_count()).sum()
    }

    /// 使用棒材總長
    pub fn total_bar_length(&self) -> Decimal {
        self.bars.iter().map(|b| b.bar_length()).sum()
    }

    /// 使用棒材數量
    pub fn total_bar_count(&self) -> usize {
        self.bars.len()
    }

    /// 使用但未對應庫存的棒材數量（標準棒材）
    pub fn bars_not_stocked(&self) -> usize {
        self.bars.iter().filter(|b| !b.is_stocked()).count()
    }

    /// 總損耗長度
    pub fn total_fall_length(&self) -> Decimal {
        self.bars.iter().map(|b| b.total_fall()).sum()
    }

    /// 總損耗百分比
    pub fn total_fall_percent(&self) -> Decimal {
        self.percent_of_bar_length(self.total_fall_length())
    }

    /// 平均每支棒材損耗（組合選擇的依據）
    pub fn average_fall(&self) -> Decimal {
        if self.bars.is_empty() {
            return Decimal::ZERO;
        }
        self.total_fall_length() / Decimal::from(self.bars.len())
    }

    /// 餘料達到可回收門檻的棒材
    pub fn recovered_fall_bars(&self) -> impl Iterator<Item = &CutBar> + '_ {
        self.bars
            .iter()
            .filter(move |b| b.fall() >= self.min_recovered_fall)
    }

    /// 可回收餘料總長
    pub fn total_recovered_fall_length(&self) -> Decimal {
        self.recovered_fall_bars().map(|b| b.fall()).sum()
    }

    /// 可回收餘料棒材數量
    pub fn recovered_fall_bar_count(&self) -> usize {
        self.recovered_fall_bars().count()
    }

    /// 不可回收損耗總長（低於門檻的餘料視為廢料）
    pub fn total_non_recovered_length(&self) -> Decimal {
        self.bars
            .iter()
            .map(|b| {
                let recovered = if b.fall() < self.min_recovered_fall {
                    Decimal::ZERO
                } else {
                    b.fall()
                };
                b.total_fall() - recovered
            })
            .sum()
    }

    /// 不可回收損耗百分比
    pub fn non_recovered_percent(&self) -> Decimal {
        self.percent_of_bar_length(self.total_non_recovered_length())
    }

    /// 依排樣彙總（棒材長度與切割件長度相同者合併），依首次出現順序
    pub fn group_by_layout(&self) -> Vec<LayoutGroup> {
        let mut keys: Vec<PatternKey> = Vec::new();
        let mut groups: Vec<LayoutGroup> = Vec::new();

        for bar in &self.bars {
            let key = bar.pattern_key();
            match keys.iter().position(|k| *k == key) {
                Some(index) => groups[index].count += 1,
                None => {
                    keys.push(key);
                    groups.push(LayoutGroup {
                        bar_length: bar.bar_length(),
                        piece_lengths: bar.piece_lengths(),
                        fall: bar.fall(),
                        fall_percent: bar.fall_percent(),
                        count: 1,
                    });
                }
            }
        }

        groups
    }

    fn percent_of_bar_length(&self, value: Decimal) -> Decimal {
        let total = self.total_bar_length();
        if total == Decimal::ZERO {
            return Decimal::ZERO;
        }
        (value / total * Decimal::ONE_HUNDRED).round_dp(3)
    }
}

impl<'a> IntoIterator for &'a CutBars {
    type Item = &'a CutBar;
    type IntoIter = std::slice::Iter<'a, CutBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
