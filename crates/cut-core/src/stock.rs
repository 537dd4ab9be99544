//! 庫存棒材集合

use rust_decimal::Decimal;
use serde::Serialize;

use crate::Bar;

/// 庫存棒材集合
///
/// 加入時自動指派序號；最佳化過程中被指派的棒材會從工作副本中移除。
#[derive(Debug, Clone, Serialize)]
pub struct StockBars {
    bars: Vec<Bar>,

    #[serde(skip)]
    next_id: usize,
}

impl StockBars {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            next_id: 1,
        }
    }

    /// 加入棒材，返回指派的序號
    pub fn insert(&mut self, mut bar: Bar) -> usize {
        let id = self.next_id;
        self.next_id += 1;

        bar.assign_id(id);
        self.bars.push(bar);
        id
    }

    pub fn extend(&mut self, bars: impl IntoIterator<Item = Bar>) {
        for bar in bars {
            self.insert(bar);
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// 依有效長度去重（保留首次出現的棒材）
    pub fn distinct_by_effective_length(&self) -> Vec<&Bar> {
        let mut distinct: Vec<&Bar> = Vec::new();
        for bar in &self.bars {
            if !distinct
                .iter()
                .any(|b| b.effective_length() == bar.effective_length())
            {
                distinct.push(bar);
            }
        }
        distinct
    }

    /// 是否仍有指定尺寸的棒材
    pub fn contains_matching(&self, length: Decimal, initial_fall: Decimal) -> bool {
        self.bars.iter().any(|b| b.has_dimensions(length, initial_fall))
    }

    /// 指定尺寸的棒材數量
    pub fn count_matching(&self, length: Decimal, initial_fall: Decimal) -> usize {
        self.bars
            .iter()
            .filter(|b| b.has_dimensions(length, initial_fall))
            .count()
    }

    /// 取出第一支指定尺寸的棒材
    pub fn take_matching(&mut self, length: Decimal, initial_fall: Decimal) -> Option<Bar> {
        let index = self
            .bars
            .iter()
            .position(|b| b.has_dimensions(length, initial_fall))?;
        Some(self.bars.remove(index))
    }

    /// 依序號移除棒材
    pub fn remove_by_id(&mut self, id: usize) -> Option<Bar> {
        let index = self.bars.iter().position(|b| b.id() == id)?;
        Some(self.bars.remove(index))
    }
}

impl Default for StockBars {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a StockBars {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
