//! 棒材斷面資訊

use rust_decimal::Decimal;
use serde::Serialize;

use crate::validation::ensure_at_least;
use crate::Result;

/// 一次下料作業共用的棒材斷面資訊
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarInfo {
    height: Decimal,
    width: Decimal,
    weight: Decimal,
    volume: Decimal,

    /// 外部參考編號
    external_ref: Option<String>,
}

impl BarInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置高度（影響斜切損耗）
    pub fn with_height(mut self, height: Decimal) -> Result<Self> {
        self.height = ensure_at_least(height, "height", Decimal::ZERO)?;
        Ok(self)
    }

    pub fn with_width(mut self, width: Decimal) -> Result<Self> {
        self.width = ensure_at_least(width, "width", Decimal::ZERO)?;
        Ok(self)
    }

    pub fn with_weight(mut self, weight: Decimal) -> Result<Self> {
        self.weight = ensure_at_least(weight, "weight", Decimal::ZERO)?;
        Ok(self)
    }

    pub fn with_volume(mut self, volume: Decimal) -> Result<Self> {
        self.volume = ensure_at_least(volume, "volume", Decimal::ZERO)?;
        Ok(self)
    }

    pub fn with_external_ref(mut self, external_ref: impl Into<String>) -> Self {
        self.external_ref = Some(external_ref.into());
        self
    }

    pub fn height(&self) -> Decimal {
        self.height
    }

    pub fn width(&self) -> Decimal {
        self.width
    }

    pub fn weight(&self) -> Decimal {
        self.weight
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn external_ref(&self) -> Option<&str> {
        self.external_ref.as_deref()
    }
}
