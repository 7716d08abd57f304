//! Scoring rules as data: each entry pairs a predicate with the delta it
//! contributes, so sector-specific threshold variants stay configuration
//! instead of new branches in the evaluator.

use synthesis_core::{
    FundamentalRecord, GuidanceDirection, NewsPolarity, SectorThresholds, TechnicalRecord,
    PE_FAIR_FLOOR,
};

/// One additive scoring rule over a record type.
pub struct Rule<R> {
    pub label: &'static str,
    pub delta: f64,
    pub applies: fn(&R, &SectorThresholds) -> bool,
}

/// Disjoint RSI bands, evaluated top to bottom; the first matching band
/// is the only one that fires. The oversold/overbought extremes come from
/// the sector thresholds, the 40-60 sweet spot is fixed.
pub const RSI_BANDS: &[Rule<TechnicalRecord>] = &[
    Rule {
        label: "RSI oversold",
        delta: 3.0,
        applies: |r, t| r.rsi < t.oversold,
    },
    Rule {
        label: "RSI low",
        delta: 0.0,
        applies: |r, _| r.rsi < 40.0,
    },
    Rule {
        label: "RSI sweet spot",
        delta: 2.0,
        applies: |r, _| r.rsi <= 60.0,
    },
    Rule {
        label: "RSI high",
        delta: 0.0,
        applies: |r, t| r.rsi <= t.overbought,
    },
    Rule {
        label: "RSI overbought",
        delta: -3.0,
        applies: |_, _| true,
    },
];

/// Momentum and trend rules, independently additive.
pub const MOMENTUM_RULES: &[Rule<TechnicalRecord>] = &[
    Rule {
        label: "MACD bullish",
        delta: 1.0,
        applies: |r, _| r.macd_histogram > 0.0,
    },
    Rule {
        label: "MACD bearish",
        delta: -1.0,
        applies: |r, _| r.macd_histogram < 0.0,
    },
    Rule {
        label: "Above SMA20",
        delta: 1.0,
        applies: |r, _| r.price_above_sma20,
    },
    Rule {
        label: "Above SMA50",
        delta: 1.0,
        applies: |r, _| r.price_above_sma50,
    },
];

/// Fundamental rules. A rule only fires when its field is present; an
/// absent field contributes nothing.
pub const FUNDAMENTAL_RULES: &[Rule<FundamentalRecord>] = &[
    Rule {
        label: "Revenue growing YoY",
        delta: 2.0,
        applies: |r, _| matches!(r.revenue_growth_yoy, Some(g) if g > 0.0),
    },
    Rule {
        label: "High gross margin",
        delta: 1.0,
        applies: |r, _| matches!(r.gross_margin_pct, Some(m) if m > 50.0),
    },
    Rule {
        label: "Positive EPS guidance",
        delta: 2.0,
        applies: |r, _| r.eps_guidance == GuidanceDirection::Positive,
    },
    Rule {
        label: "Negative EPS guidance",
        delta: -3.0,
        applies: |r, _| r.eps_guidance == GuidanceDirection::Negative,
    },
    Rule {
        label: "P/E fairly valued",
        delta: 1.0,
        applies: |r, t| {
            matches!(r.pe_ratio, Some(pe) if pe >= PE_FAIR_FLOOR && pe <= t.pe_ceiling)
        },
    },
];

/// Sentiment contribution for one polarity. Neutral contributes nothing.
pub fn sentiment_rule(polarity: NewsPolarity) -> Option<(&'static str, f64)> {
    match polarity {
        NewsPolarity::Positive => Some(("Positive news sentiment", 2.0)),
        NewsPolarity::Negative => Some(("Negative news sentiment", -2.0)),
        NewsPolarity::Neutral => None,
    }
}

/// The first band whose predicate holds. Bands cover the whole RSI
/// domain, so this is total for validated records.
pub fn first_matching<'a, R>(
    bands: &'a [Rule<R>],
    record: &R,
    thresholds: &SectorThresholds,
) -> Option<&'a Rule<R>> {
    bands.iter().find(|rule| (rule.applies)(record, thresholds))
}
