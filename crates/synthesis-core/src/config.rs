use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::SynthesisError;

/// Lower bound of the P/E band considered fairly valued. The upper bound
/// is per-sector (`SectorThresholds::pe_ceiling`).
pub const PE_FAIR_FLOOR: f64 = 15.0;

/// Fixed category weights for the confidence blend. These are the only
/// normative constants of the scoring design; everything else is tunable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub technical: f64,
    pub fundamental: f64,
    pub sentiment: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            technical: 0.40,
            fundamental: 0.35,
            sentiment: 0.25,
        }
    }
}

impl CategoryWeights {
    pub fn validate(&self) -> Result<(), SynthesisError> {
        for (name, w) in [
            ("technical", self.technical),
            ("fundamental", self.fundamental),
            ("sentiment", self.sentiment),
        ] {
            if !w.is_finite() || w <= 0.0 || w >= 1.0 {
                return Err(SynthesisError::InvalidConfig(format!(
                    "{name} weight {w} must lie in (0, 1)"
                )));
            }
        }
        let sum = self.technical + self.fundamental + self.sentiment;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(SynthesisError::InvalidConfig(format!(
                "category weights sum to {sum}, expected 1.0"
            )));
        }
        Ok(())
    }
}

/// Left-inclusive lower edges of the confidence tiers, checked in
/// descending order: >= strong_buy -> A, >= buy -> B+, >= hold -> B,
/// >= reduce -> C, else D.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierBands {
    pub strong_buy: f64,
    pub buy: f64,
    pub hold: f64,
    pub reduce: f64,
}

impl Default for TierBands {
    fn default() -> Self {
        Self {
            strong_buy: 8.0,
            buy: 6.0,
            hold: 5.0,
            reduce: 3.0,
        }
    }
}

impl TierBands {
    pub fn validate(&self) -> Result<(), SynthesisError> {
        let edges = [self.strong_buy, self.buy, self.hold, self.reduce];
        if edges.iter().any(|e| !e.is_finite() || *e < 1.0 || *e > 10.0) {
            return Err(SynthesisError::InvalidConfig(format!(
                "tier band edges {edges:?} must lie in [1, 10]"
            )));
        }
        if !(self.strong_buy > self.buy && self.buy > self.hold && self.hold > self.reduce) {
            return Err(SynthesisError::InvalidConfig(format!(
                "tier band edges {edges:?} must be strictly descending"
            )));
        }
        Ok(())
    }
}

/// RSI extremes and P/E ceiling for one sector. The inner 40-60 RSI band
/// is fixed; only the extremes vary per sector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SectorThresholds {
    pub overbought: f64,
    pub oversold: f64,
    pub pe_ceiling: f64,
}

impl Default for SectorThresholds {
    fn default() -> Self {
        Self {
            overbought: 75.0,
            oversold: 30.0,
            pe_ceiling: 30.0,
        }
    }
}

impl SectorThresholds {
    pub fn validate(&self) -> Result<(), SynthesisError> {
        if !self.oversold.is_finite() || self.oversold <= 0.0 || self.oversold > 40.0 {
            return Err(SynthesisError::InvalidConfig(format!(
                "oversold threshold {} must lie in (0, 40]",
                self.oversold
            )));
        }
        if !self.overbought.is_finite() || self.overbought < 60.0 || self.overbought >= 100.0 {
            return Err(SynthesisError::InvalidConfig(format!(
                "overbought threshold {} must lie in [60, 100)",
                self.overbought
            )));
        }
        if !self.pe_ceiling.is_finite() || self.pe_ceiling <= PE_FAIR_FLOOR {
            return Err(SynthesisError::InvalidConfig(format!(
                "P/E ceiling {} must exceed the fair-value floor {PE_FAIR_FLOOR}",
                self.pe_ceiling
            )));
        }
        Ok(())
    }
}

/// Tunable parameters of the scoring engine. Defaults: neutral baseline
/// 5.0, 40/35/25 weights, 8/6/5/3 tier edges, 75/30/30 thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: CategoryWeights,
    /// Offset added to the weighted raw score before clamping, so a
    /// holding with no rules fired lands at the scale midpoint.
    pub baseline: f64,
    pub bands: TierBands,
    pub thresholds: SectorThresholds,
    pub sector_overrides: HashMap<String, SectorThresholds>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            baseline: 5.0,
            bands: TierBands::default(),
            thresholds: SectorThresholds::default(),
            sector_overrides: HashMap::new(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), SynthesisError> {
        self.weights.validate()?;
        if !self.baseline.is_finite() || self.baseline < 1.0 || self.baseline > 10.0 {
            return Err(SynthesisError::InvalidConfig(format!(
                "baseline {} must lie in [1, 10]",
                self.baseline
            )));
        }
        self.bands.validate()?;
        self.thresholds.validate()?;
        for (sector, thresholds) in &self.sector_overrides {
            thresholds.validate().map_err(|e| match e {
                SynthesisError::InvalidConfig(msg) => {
                    SynthesisError::InvalidConfig(format!("sector {sector}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Thresholds for a holding, honoring a sector override when present.
    pub fn thresholds_for(&self, sector: Option<&str>) -> SectorThresholds {
        sector
            .and_then(|s| self.sector_overrides.get(s).copied())
            .unwrap_or(self.thresholds)
    }
}
