//! 下料作業配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bar::BarRecord;
use crate::validation::ensure_at_least;
use crate::{Bar, CutError, Result};

/// 下料作業參數配置
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CutConfig {
    /// 鋸片厚度（每刀損耗）
    blade_thickness: Decimal,

    /// 最小可回收餘料
    min_recovered_fall: Decimal,

    /// 最大不可回收餘料
    ///
    /// 與 `min_recovered_fall` 同時非 0 時，優先採用餘料小於此值
    /// 或大於等於最小可回收餘料的排樣。
    max_fall_non_recoverable: Decimal,

    /// 標準棒材（庫存用完後無限供應）
    standard_bar: Option<Bar>,

    /// 搜尋時限（毫秒）
    time_limit_ms: Option<u64>,
}

impl CutConfig {
    /// 創建新的配置（無鋸片損耗、不啟用餘料篩選）
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置鋸片厚度
    pub fn with_blade_thickness(mut self, thickness: Decimal) -> Result<Self> {
        self.blade_thickness = ensure_at_least(thickness, "blade_thickness", Decimal::ZERO)?;
        Ok(self)
    }

    /// 建構器模式：設置最小可回收餘料
    pub fn with_min_recovered_fall(mut self, fall: Decimal) -> Result<Self> {
        self.min_recovered_fall = ensure_at_least(fall, "min_recovered_fall", Decimal::ZERO)?;
        Ok(self)
    }

    /// 建構器模式：設置最大不可回收餘料（0 代表停用篩選）
    pub fn with_max_fall_non_recoverable(mut self, fall: Decimal) -> Result<Self> {
        self.max_fall_non_recoverable =
            ensure_at_least(fall, "max_fall_non_recoverable", Decimal::ZERO)?;
        Ok(self)
    }

    /// 建構器模式：設置標準棒材
    pub fn with_standard_bar(mut self, bar: Bar) -> Self {
        self.standard_bar = Some(bar);
        self
    }

    /// 建構器模式：設置搜尋時限
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// 從 JSON 文件載入配置，所有欄位重新檢查範圍
    ///
    /// # 範例
    /// ```
    /// # use cutstock_core::CutConfig;
    /// let config = CutConfig::from_json(
    ///     r#"{ "blade_thickness": "0.005", "standard_bar": { "length": "6.5", "initial_fall": "0.025" } }"#,
    /// ).unwrap();
    /// assert!(config.standard_bar().is_some());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let record: CutConfigRecord =
            serde_json::from_str(json).map_err(|e| CutError::InvalidConfig(e.to_string()))?;
        Self::try_from(record)
    }

    pub fn blade_thickness(&self) -> Decimal {
        self.blade_thickness
    }

    pub fn min_recovered_fall(&self) -> Decimal {
        self.min_recovered_fall
    }

    pub fn max_fall_non_recoverable(&self) -> Decimal {
        self.max_fall_non_recoverable
    }

    pub fn standard_bar(&self) -> Option<&Bar> {
        self.standard_bar.as_ref()
    }

    pub fn time_limit_ms(&self) -> Option<u64> {
        self.time_limit_ms
    }

    /// 是否啟用可回收/不可回收餘料篩選
    pub fn uses_fall_filter(&self) -> bool {
        self.max_fall_non_recoverable != Decimal::ZERO && self.min_recovered_fall != Decimal::ZERO
    }

    /// 餘料是否落在可接受範圍（小到可丟棄，或大到可回收）
    pub fn accepts_fall(&self, fall: Decimal) -> bool {
        fall < self.max_fall_non_recoverable || fall >= self.min_recovered_fall
    }

    /// 指定尺寸是否為標準棒材
    pub fn is_standard_bar(&self, length: Decimal, initial_fall: Decimal) -> bool {
        self.standard_bar
            .as_ref()
            .is_some_and(|bar| bar.has_dimensions(length, initial_fall))
    }

    /// 重新檢查所有欄位
    pub fn validate(&self) -> Result<()> {
        ensure_at_least(self.blade_thickness, "blade_thickness", Decimal::ZERO)?;
        ensure_at_least(self.min_recovered_fall, "min_recovered_fall", Decimal::ZERO)?;
        ensure_at_least(
            self.max_fall_non_recoverable,
            "max_fall_non_recoverable",
            Decimal::ZERO,
        )?;
        Ok(())
    }
}

/// 配置的反序列化記錄
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CutConfigRecord {
    blade_thickness: Decimal,
    min_recovered_fall: Decimal,
    max_fall_non_recoverable: Decimal,
    standard_bar: Option<BarRecord>,
    time_limit_ms: Option<u64>,
}

impl TryFrom<CutConfigRecord> for CutConfig {
    type Error = CutError;

    fn try_from(record: CutConfigRecord) -> Result<Self> {
        let mut config = CutConfig::new()
            .with_blade_thickness(record.blade_thickness)?
            .with_min_recovered_fall(record.min_recovered_fall)?
            .with_max_fall_non_recoverable(record.max_fall_non_recoverable)?;

        if let Some(bar) = record.standard_bar {
            config = config.with_standard_bar(Bar::try_from(bar)?);
        }
        if let Some(ms) = record.time_limit_ms {
            config = config.with_time_limit_ms(ms);
        }
        Ok(config)
    }
}
