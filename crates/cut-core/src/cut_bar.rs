//! 切割棒材模型（一支棒材及其排樣）

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::validation::{ensure_at_least, ensure_positive};
use crate::{Bar, CutPiece, Result};

/// 一支棒材與指派到其上的切割件
///
/// 切割件始終依長度遞減排列；`bar` 在對應到實體庫存棒材後才會設置。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutBar {
    /// 棒材總長度
    bar_length: Decimal,

    /// 初始損耗
    init_fall: Decimal,

    /// 鋸片厚度（同一作業共用）
    blade_thickness: Decimal,

    /// 切割件（長度遞減）
    pieces: Vec<CutPiece>,

    /// 對應的實體庫存棒材
    bar: Option<Bar>,
}

impl CutBar {
    /// 以尺寸創建尚未對應庫存的切割棒材
    pub fn new(bar_length: Decimal, init_fall: Decimal, blade_thickness: Decimal) -> Result<Self> {
        Ok(Self {
            bar_length: ensure_positive(bar_length, "bar_length")?,
            init_fall: ensure_at_least(init_fall, "init_fall", Decimal::ZERO)?,
            blade_thickness: ensure_at_least(blade_thickness, "blade_thickness", Decimal::ZERO)?,
            pieces: Vec::new(),
            bar: None,
        })
    }

    /// 以棒材尺寸創建排樣樣板（不綁定該棒材）
    pub fn with_dimensions_of(bar: &Bar, blade_thickness: Decimal) -> Self {
        Self {
            bar_length: bar.length(),
            init_fall: bar.initial_fall(),
            blade_thickness,
            pieces: Vec::new(),
            bar: None,
        }
    }

    /// 以實體庫存棒材創建並綁定
    pub fn from_bar(bar: &Bar, blade_thickness: Decimal) -> Self {
        let mut cut_bar = Self::with_dimensions_of(bar, blade_thickness);
        cut_bar.bind_bar(bar.clone());
        cut_bar
    }

    /// 加入切割件，保持長度遞減（相同長度依加入順序）
    pub fn push_piece(&mut self, piece: CutPiece) {
        let index = self
            .pieces
            .iter()
            .position(|p| p.length() < piece.length())
            .unwrap_or(self.pieces.len());
        self.pieces.insert(index, piece);
    }

    /// 複製並加入一件
    pub fn with_piece(&self, piece: CutPiece) -> Self {
        let mut next = self.clone();
        next.push_piece(piece);
        next
    }

    /// 相同尺寸、沒有切割件的副本
    pub fn empty_copy(&self) -> Self {
        Self {
            pieces: Vec::new(),
            bar: None,
            ..self.clone()
        }
    }

    /// 綁定實體庫存棒材，並以其尺寸為準
    pub fn bind_bar(&mut self, bar: Bar) {
        self.bar_length = bar.length();
        self.init_fall = bar.initial_fall();
        self.bar = Some(bar);
    }

    pub fn bar_length(&self) -> Decimal {
        self.bar_length
    }

    pub fn init_fall(&self) -> Decimal {
        self.init_fall
    }

    pub fn blade_thickness(&self) -> Decimal {
        self.blade_thickness
    }

    pub fn pieces(&self) -> &[CutPiece] {
        &self.pieces
    }

    pub fn bar(&self) -> Option<&Bar> {
        self.bar.as_ref()
    }

    /// 是否已對應實體庫存棒材
    pub fn is_stocked(&self) -> bool {
        self.bar.is_some()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece_lengths(&self) -> Vec<Decimal> {
        self.pieces.iter().map(|p| p.length()).collect()
    }

    pub fn contains_length(&self, length: Decimal) -> bool {
        self.pieces.iter().any(|p| p.length() == length)
    }

    /// 有效長度 = 總長度 - 初始損耗
    pub fn bar_effective_length(&self) -> Decimal {
        self.bar_length - self.init_fall
    }

    /// 鋸片損耗 = 件數 × 鋸片厚度
    pub fn blade_fall(&self) -> Decimal {
        Decimal::from(self.pieces.len()) * self.blade_thickness
    }

    pub fn total_piece_length(&self) -> Decimal {
        self.pieces.iter().map(|p| p.length()).sum()
    }

    /// 切割後剩餘的餘料（建構過程中可能為負，代表放不下）
    pub fn fall(&self) -> Decimal {
        self.bar_effective_length() - self.total_piece_length() - self.blade_fall()
    }

    /// 總損耗 = 總長度 - 切割件總長
    pub fn total_fall(&self) -> Decimal {
        self.bar_length - self.total_piece_length()
    }

    /// 損耗百分比
    pub fn fall_percent(&self) -> Decimal {
        ((Decimal::ONE - self.total_piece_length() / self.bar_length) * Decimal::ONE_HUNDRED)
            .round_dp(3)
    }

    /// 排樣去重用的標準鍵
    pub fn pattern_key(&self) -> PatternKey {
        let mut lengths: Vec<Decimal> = self.pieces.iter().map(|p| p.length().normalize()).collect();
        lengths.sort_unstable_by(|a, b| b.cmp(a));
        PatternKey {
            bar_length: self.bar_length.normalize(),
            init_fall: self.init_fall.normalize(),
            lengths,
        }
    }
}

impl fmt::Display for CutBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lengths: Vec<String> = self.pieces.iter().map(|p| p.length().to_string()).collect();
        write!(
            f,
            "bar({}) : ({}) fall({})",
            self.bar_length,
            lengths.join(", "),
            self.fall()
        )
    }
}

/// 排樣的標準鍵：棒材尺寸 + 遞減排序的切割件長度
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternKey {
    bar_length: Decimal,
    init_fall: Decimal,
    lengths: Vec<Decimal>,
}
