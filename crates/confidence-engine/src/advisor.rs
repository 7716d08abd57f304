use synthesis_core::{
    GuidanceDirection, HoldingSnapshot, NewsPolarity, ScoreBreakdown, SectorThresholds,
};

/// Scan a low-confidence holding's records for risk factors, in a fixed
/// evaluation order: RSI checks first, then guidance, then sentiment.
/// An absent fundamental record adds no factor of its own — unknown is
/// not negative. Returns an empty list when nothing triggers, which is a
/// valid outcome.
pub fn assess_risk(
    snapshot: &HoldingSnapshot,
    breakdown: &ScoreBreakdown,
    thresholds: &SectorThresholds,
) -> Vec<String> {
    let mut factors = Vec::new();
    let tech = &snapshot.technical;

    // A positive fundamental picture makes an oversold reading look like
    // genuine upside; without it, oversold plus weak confidence reads as
    // a value trap.
    let fundamentals_corroborate =
        snapshot.fundamental.is_some() && breakdown.fundamental.sub_score > 0.0;
    if tech.rsi < thresholds.oversold && !fundamentals_corroborate {
        factors.push("RSI oversold - potential trap".to_string());
    }
    if tech.rsi > thresholds.overbought {
        factors.push("RSI overbought".to_string());
    }

    if snapshot
        .fundamental
        .as_ref()
        .is_some_and(|f| f.eps_guidance == GuidanceDirection::Negative)
    {
        factors.push("Negative EPS guidance".to_string());
    }

    if snapshot
        .sentiment
        .as_ref()
        .is_some_and(|s| s.polarity == NewsPolarity::Negative)
    {
        factors.push("Negative news sentiment".to_string());
    }

    factors
}
