use std::collections::HashMap;

use synthesis_core::{
    CategoryScore, FundamentalRecord, HoldingSnapshot, ScoreBreakdown, ScoringConfig,
    SectorThresholds, SentimentRecord, SynthesisError, TechnicalRecord,
};

use crate::rules::{
    first_matching, sentiment_rule, FUNDAMENTAL_RULES, MOMENTUM_RULES, RSI_BANDS,
};

/// Converts raw per-holding records into the three additive sub-scores,
/// consulting sector threshold overrides before rule evaluation.
pub struct SignalNormalizer {
    thresholds: SectorThresholds,
    sector_overrides: HashMap<String, SectorThresholds>,
}

impl SignalNormalizer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            thresholds: config.thresholds,
            sector_overrides: config.sector_overrides.clone(),
        }
    }

    pub fn thresholds_for(&self, sector: Option<&str>) -> SectorThresholds {
        sector
            .and_then(|s| self.sector_overrides.get(s).copied())
            .unwrap_or(self.thresholds)
    }

    /// Normalize one holding's records into sub-scores. Fails fast on an
    /// out-of-domain value, identifying the ticker and offending field.
    pub fn normalize(&self, snapshot: &HoldingSnapshot) -> Result<ScoreBreakdown, SynthesisError> {
        validate_snapshot(snapshot)?;

        let thresholds = self.thresholds_for(snapshot.technical.sector.as_deref());
        let breakdown = ScoreBreakdown {
            technical: technical_sub(&snapshot.technical, &thresholds),
            fundamental: fundamental_sub(snapshot.fundamental.as_ref(), &thresholds),
            sentiment: sentiment_sub(snapshot.sentiment.as_ref()),
        };

        tracing::debug!(
            "Normalized {}: technical {:+}, fundamental {:+}, sentiment {:+}",
            snapshot.technical.ticker,
            breakdown.technical.sub_score,
            breakdown.fundamental.sub_score,
            breakdown.sentiment.sub_score,
        );

        Ok(breakdown)
    }
}

fn technical_sub(record: &TechnicalRecord, thresholds: &SectorThresholds) -> CategoryScore {
    let mut score = CategoryScore::default();

    if let Some(band) = first_matching(RSI_BANDS, record, thresholds) {
        if band.delta != 0.0 {
            score.add(
                format!("{} ({}): {:+}", band.label, record.rsi, band.delta),
                band.delta,
            );
        }
    }

    for rule in MOMENTUM_RULES {
        if (rule.applies)(record, thresholds) {
            score.add(format!("{}: {:+}", rule.label, rule.delta), rule.delta);
        }
    }

    score
}

fn fundamental_sub(
    record: Option<&FundamentalRecord>,
    thresholds: &SectorThresholds,
) -> CategoryScore {
    let mut score = CategoryScore::default();
    let Some(record) = record else {
        score.notes.push("No fundamentals available".to_string());
        return score;
    };

    for rule in FUNDAMENTAL_RULES {
        if (rule.applies)(record, thresholds) {
            score.add(format!("{}: {:+}", rule.label, rule.delta), rule.delta);
        }
    }

    score
}

fn sentiment_sub(record: Option<&SentimentRecord>) -> CategoryScore {
    let mut score = CategoryScore::default();
    let Some(record) = record else {
        score.notes.push("No news sentiment".to_string());
        return score;
    };

    if let Some((label, delta)) = sentiment_rule(record.polarity) {
        score.add(format!("{label}: {delta:+}"), delta);
    }

    score
}

fn validate_snapshot(snapshot: &HoldingSnapshot) -> Result<(), SynthesisError> {
    let tech = &snapshot.technical;
    let ticker = &tech.ticker;

    if !tech.rsi.is_finite() || !(0.0..=100.0).contains(&tech.rsi) {
        return Err(malformed(ticker, "rsi", format!("{} outside [0, 100]", tech.rsi)));
    }
    if !tech.price.is_finite() || tech.price <= 0.0 {
        return Err(malformed(ticker, "price", format!("{} is not a positive price", tech.price)));
    }
    if !tech.macd_histogram.is_finite() {
        return Err(malformed(ticker, "macd_histogram", "is not finite".to_string()));
    }

    if let Some(fund) = &snapshot.fundamental {
        if let Some(growth) = fund.revenue_growth_yoy {
            if !growth.is_finite() {
                return Err(malformed(ticker, "revenue_growth_yoy", "is not finite".to_string()));
            }
        }
        if let Some(margin) = fund.gross_margin_pct {
            if !margin.is_finite() {
                return Err(malformed(ticker, "gross_margin_pct", "is not finite".to_string()));
            }
        }
        if let Some(pe) = fund.pe_ratio {
            if !pe.is_finite() || pe <= 0.0 {
                return Err(malformed(ticker, "pe_ratio", format!("{pe} is not a positive ratio")));
            }
        }
    }

    Ok(())
}

fn malformed(ticker: &str, field: &'static str, detail: String) -> SynthesisError {
    SynthesisError::MalformedRecord {
        ticker: ticker.to_string(),
        field,
        detail,
    }
}
