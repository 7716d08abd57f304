use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall technical signal classification, produced upstream by the
/// technical-analysis collaborator. Tallied by the portfolio reducer,
/// never re-derived from the scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalPolarity {
    Bullish,
    Bearish,
    Neutral,
}

/// Direction of company-issued forward EPS guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceDirection {
    Positive,
    Negative,
    #[default]
    None,
}

/// Aggregated news sentiment polarity for one holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsPolarity {
    Positive,
    Negative,
    Neutral,
}

/// Per-holding technical snapshot, produced externally once per trading
/// day. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalRecord {
    pub ticker: String,
    #[serde(default)]
    pub company: Option<String>,
    pub price: f64,
    pub rsi: f64,
    pub macd_histogram: f64,
    pub price_above_sma20: bool,
    pub price_above_sma50: bool,
    pub signal: SignalPolarity,
    /// Selects sector-specific threshold overrides when set.
    #[serde(default)]
    pub sector: Option<String>,
}

/// Extracted fundamental-statement data for one holding. Absent fields
/// mean "unknown", which is distinct from "known and neutral" — unknown
/// contributes nothing and never reads as a negative signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalRecord {
    pub ticker: String,
    #[serde(default)]
    pub revenue_growth_yoy: Option<f64>,
    #[serde(default)]
    pub gross_margin_pct: Option<f64>,
    #[serde(default)]
    pub eps_guidance: GuidanceDirection,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
}

/// News sentiment for one holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub ticker: String,
    pub polarity: NewsPolarity,
}

/// The joined per-holding input for one synthesis run. Fundamental and
/// sentiment records may be absent if the upstream collaborators found
/// nothing for the ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingSnapshot {
    pub technical: TechnicalRecord,
    #[serde(default)]
    pub fundamental: Option<FundamentalRecord>,
    #[serde(default)]
    pub sentiment: Option<SentimentRecord>,
}

/// One category's additive sub-score before weighting, plus the
/// human-readable trail of the rules that fired.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryScore {
    pub sub_score: f64,
    pub notes: Vec<String>,
}

impl CategoryScore {
    pub fn add(&mut self, note: String, delta: f64) {
        self.sub_score += delta;
        self.notes.push(note);
    }
}

/// The three normalized sub-scores for one holding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub technical: CategoryScore,
    pub fundamental: CategoryScore,
    pub sentiment: CategoryScore,
}

/// Confidence tier assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    D,
}

impl Tier {
    pub fn letter(&self) -> &'static str {
        match self {
            Tier::A => "A",
            Tier::BPlus => "B+",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::A => "Strong Buy / Hold",
            Tier::BPlus => "Buy / Hold",
            Tier::B => "Hold",
            Tier::C => "Consider Reducing",
            Tier::D => "Strong Sell",
        }
    }
}

/// Recommended rebalance action for one holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    Hold,
    Watch,
    ConsiderReducing,
    StrongSellReview,
}

/// Per-holding synthesis output. Created once per holding per run and
/// immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub ticker: String,
    #[serde(default)]
    pub company: Option<String>,
    /// Weighted confidence, clamped to [1.0, 10.0], one decimal.
    pub confidence: f64,
    pub tier: Tier,
    pub action: RecommendedAction,
    /// Ordered risk factors; empty for tiers above the rebalance cutoff.
    pub risk_factors: Vec<String>,
    /// Upstream technical signal, carried through for the reducer.
    pub signal: SignalPolarity,
    pub breakdown: ScoreBreakdown,
}

/// One isolated per-holding evaluation failure. A malformed record is
/// reported here instead of aborting the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingFailure {
    pub ticker: String,
    pub error: String,
}

/// Result counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub a: usize,
    pub b_plus: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
}

impl TierCounts {
    pub fn bump(&mut self, tier: Tier) {
        match tier {
            Tier::A => self.a += 1,
            Tier::BPlus => self.b_plus += 1,
            Tier::B => self.b += 1,
            Tier::C => self.c += 1,
            Tier::D => self.d += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.a + self.b_plus + self.b + self.c + self.d
    }
}

/// Portfolio-level rollup, fully recomputed each run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_holdings: usize,
    /// None for an empty batch — callers must check total_holdings first.
    pub average_confidence: Option<f64>,
    pub tier_counts: TierCounts,
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
}

/// Full output of one synthesis run: every per-holding result, the
/// failures that were isolated, and the portfolio summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub generated_at: DateTime<Utc>,
    pub summary: PortfolioSummary,
    /// Sorted by confidence descending, ticker ascending on ties.
    pub results: Vec<SynthesisResult>,
    pub failures: Vec<HoldingFailure>,
}

impl SynthesisReport {
    /// Holdings with confidence >= 7, strongest first.
    pub fn top_rated(&self) -> impl Iterator<Item = &SynthesisResult> {
        self.results.iter().filter(|r| r.confidence >= 7.0)
    }

    /// Holdings in the [5, 7) confidence band.
    pub fn watch_list(&self) -> impl Iterator<Item = &SynthesisResult> {
        self.results
            .iter()
            .filter(|r| r.confidence >= 5.0 && r.confidence < 7.0)
    }

    /// Holdings below the rebalance cutoff.
    pub fn sell_candidates(&self) -> impl Iterator<Item = &SynthesisResult> {
        self.results.iter().filter(|r| r.confidence < 5.0)
    }
}
