use synthesis_core::{CategoryWeights, ScoreBreakdown};

pub const CONFIDENCE_MIN: f64 = 1.0;
pub const CONFIDENCE_MAX: f64 = 10.0;

/// Round to one decimal place. `f64::round` rounds half away from zero,
/// which on the positive confidence domain is exactly round-half-up, and
/// the operation is idempotent.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Blend the three sub-scores into a single confidence value: weighted
/// raw sum, shifted by the neutral baseline, clamped to [1.0, 10.0] and
/// rounded to one decimal.
pub fn weighted_confidence(
    breakdown: &ScoreBreakdown,
    weights: &CategoryWeights,
    baseline: f64,
) -> f64 {
    let raw = breakdown.technical.sub_score * weights.technical
        + breakdown.fundamental.sub_score * weights.fundamental
        + breakdown.sentiment.sub_score * weights.sentiment;
    round_one_decimal((baseline + raw).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX))
}
