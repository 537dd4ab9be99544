//! 庫存棒材模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{ensure_between, ensure_positive};
use crate::{CutError, Result};

/// 庫存棒材
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// 序號（加入庫存集合時指派，從 1 開始）
    id: usize,

    /// 總長度
    length: Decimal,

    /// 初始損耗（可用長度開始前的損失）
    initial_fall: Decimal,

    /// 外部參考編號（如資料庫 ID）
    external_ref: Option<String>,
}

impl Bar {
    /// 創建新的棒材
    pub fn new(length: Decimal) -> Result<Self> {
        Ok(Self {
            id: 0,
            length: ensure_positive(length, "length")?,
            initial_fall: Decimal::ZERO,
            external_ref: None,
        })
    }

    /// 建構器模式：設置初始損耗（必須位於 [0, length]）
    pub fn with_initial_fall(mut self, initial_fall: Decimal) -> Result<Self> {
        self.initial_fall = ensure_between(initial_fall, "initial_fall", Decimal::ZERO, self.length)?;
        Ok(self)
    }

    /// 建構器模式：設置外部參考編號
    pub fn with_external_ref(mut self, external_ref: impl Into<String>) -> Self {
        self.external_ref = Some(external_ref.into());
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn length(&self) -> Decimal {
        self.length
    }

    pub fn initial_fall(&self) -> Decimal {
        self.initial_fall
    }

    pub fn external_ref(&self) -> Option<&str> {
        self.external_ref.as_deref()
    }

    /// 有效長度 = 總長度 - 初始損耗
    pub fn effective_length(&self) -> Decimal {
        self.length - self.initial_fall
    }

    /// 檢查尺寸是否相同（總長度與初始損耗）
    pub fn has_dimensions(&self, length: Decimal, initial_fall: Decimal) -> bool {
        self.length == length && self.initial_fall == initial_fall
    }

    pub(crate) fn assign_id(&mut self, id: usize) {
        self.id = id;
    }
}

/// 棒材的反序列化記錄，轉換時重新檢查範圍
#[derive(Debug, Deserialize)]
pub(crate) struct BarRecord {
    pub length: Decimal,

    #[serde(default)]
    pub initial_fall: Decimal,

    #[serde(default)]
    pub external_ref: Option<String>,
}

impl TryFrom<BarRecord> for Bar {
    type Error = CutError;

    fn try_from(record: BarRecord) -> Result<Self> {
        let bar = Bar::new(record.length)?.with_initial_fall(record.initial_fall)?;
        Ok(match record.external_ref {
            Some(external_ref) => bar.with_external_ref(external_ref),
            None => bar,
        })
    }
}
