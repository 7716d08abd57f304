use rayon::prelude::*;
use signal_normalizer::SignalNormalizer;
use synthesis_core::{
    HoldingFailure, HoldingSnapshot, ScoringConfig, SynthesisError, SynthesisResult, Tier,
};

use crate::advisor::assess_risk;
use crate::aggregator::weighted_confidence;
use crate::classifier::{action_for_tier, classify};

/// Per-run batch output: the surviving results plus the failures that
/// were isolated so one bad record never blanks the whole portfolio.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<SynthesisResult>,
    pub failures: Vec<HoldingFailure>,
}

/// The synthesis scoring engine: pure computation over already-fetched
/// records, no I/O.
pub struct SynthesisEngine {
    config: ScoringConfig,
    normalizer: SignalNormalizer,
}

impl SynthesisEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, SynthesisError> {
        config.validate()?;
        let normalizer = SignalNormalizer::new(&config);
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Evaluate one holding: normalize, aggregate, classify, and for
    /// below-cutoff tiers derive the rebalance advice.
    pub fn evaluate(&self, snapshot: &HoldingSnapshot) -> Result<SynthesisResult, SynthesisError> {
        let breakdown = self.normalizer.normalize(snapshot)?;
        let confidence =
            weighted_confidence(&breakdown, &self.config.weights, self.config.baseline);
        let tier = classify(confidence, &self.config.bands);
        let action = action_for_tier(tier);

        let risk_factors = if matches!(tier, Tier::C | Tier::D) {
            let thresholds = self
                .normalizer
                .thresholds_for(snapshot.technical.sector.as_deref());
            assess_risk(snapshot, &breakdown, &thresholds)
        } else {
            Vec::new()
        };

        tracing::debug!(
            "Evaluated {}: confidence {:.1}, tier {}, action {:?}",
            snapshot.technical.ticker,
            confidence,
            tier.letter(),
            action,
        );

        Ok(SynthesisResult {
            ticker: snapshot.technical.ticker.clone(),
            company: snapshot.technical.company.clone(),
            confidence,
            tier,
            action,
            risk_factors,
            signal: snapshot.technical.signal,
            breakdown,
        })
    }

    /// Evaluate a whole batch. Holdings are independent, so the fan-out
    /// is data-parallel; collection joins before anything is reduced.
    /// A malformed record becomes a `HoldingFailure` instead of aborting
    /// the run.
    pub fn evaluate_batch(&self, snapshots: &[HoldingSnapshot]) -> BatchOutcome {
        let evaluated: Vec<Result<SynthesisResult, HoldingFailure>> = snapshots
            .par_iter()
            .map(|snapshot| {
                self.evaluate(snapshot).map_err(|e| HoldingFailure {
                    ticker: snapshot.technical.ticker.clone(),
                    error: e.to_string(),
                })
            })
            .collect();

        let mut outcome = BatchOutcome::default();
        for item in evaluated {
            match item {
                Ok(result) => outcome.results.push(result),
                Err(failure) => {
                    tracing::warn!("Skipping {}: {}", failure.ticker, failure.error);
                    outcome.failures.push(failure);
                }
            }
        }
        outcome
    }
}
