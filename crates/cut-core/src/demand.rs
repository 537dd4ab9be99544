//! 需求集合（待切割件的多重集合）

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{BarInfo, CutPiece};

/// 需求集合
///
/// 加入時自動指派序號，並由共用的 [`BarInfo`] 帶入斷面高度，
/// 因此集合內每一件都具有本次作業的高度。相同長度重複出現即代表數量。
#[derive(Debug, Clone)]
pub struct Demand {
    bar_info: Arc<BarInfo>,
    pieces: Vec<CutPiece>,
    next_id: usize,
}

impl Demand {
    /// 創建空的需求集合
    pub fn new(bar_info: Arc<BarInfo>) -> Self {
        Self {
            bar_info,
            pieces: Vec::new(),
            next_id: 1,
        }
    }

    /// 加入切割件，返回指派的序號
    pub fn insert(&mut self, mut piece: CutPiece) -> usize {
        let id = self.next_id;
        self.next_id += 1;

        piece.assign_id(id);
        piece.assign_height(self.bar_info.height());
        self.pieces.push(piece);
        id
    }

    /// 加入多個切割件
    pub fn extend(&mut self, pieces: impl IntoIterator<Item = CutPiece>) {
        for piece in pieces {
            self.insert(piece);
        }
    }

    pub fn bar_info(&self) -> &Arc<BarInfo> {
        &self.bar_info
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CutPiece> {
        self.pieces.iter()
    }

    pub fn pieces(&self) -> &[CutPiece] {
        &self.pieces
    }

    /// 所有不同長度（依首次出現順序）
    pub fn distinct_lengths(&self) -> Vec<Decimal> {
        let mut lengths: Vec<Decimal> = Vec::new();
        for piece in &self.pieces {
            if !lengths.contains(&piece.length()) {
                lengths.push(piece.length());
            }
        }
        lengths
    }

    /// 指定長度的數量
    pub fn count_of(&self, length: Decimal) -> usize {
        self.pieces.iter().filter(|p| p.length() == length).count()
    }

    /// 取出第一個指定長度的切割件
    pub fn take_length(&mut self, length: Decimal) -> Option<CutPiece> {
        let index = self.pieces.iter().position(|p| p.length() == length)?;
        Some(self.pieces.remove(index))
    }

    /// 依序號移除切割件
    pub fn remove_by_id(&mut self, id: usize) -> Option<CutPiece> {
        let index = self.pieces.iter().position(|p| p.id() == id)?;
        Some(self.pieces.remove(index))
    }

    /// 放回先前取出的切割件（保留原序號）
    pub fn restore(&mut self, pieces: impl IntoIterator<Item = CutPiece>) {
        self.pieces.extend(pieces);
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lengths: Vec<String> = self.pieces.iter().map(|p| p.length().to_string()).collect();
        write!(f, "{}", lengths.join(", "))
    }
}

impl<'a> IntoIterator for &'a Demand {
    type Item = &'a CutPiece;
    type IntoIter = std::slice::Iter<'a, CutPiece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.iter()
    }
}
