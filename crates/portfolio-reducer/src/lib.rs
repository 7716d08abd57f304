//! Folds per-holding synthesis results into the portfolio-level summary
//! and assembles the run report. Total over its input: an empty batch
//! yields an explicit "no data" summary, never an error.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use synthesis_core::{
    HoldingFailure, PortfolioSummary, SignalPolarity, SynthesisReport, SynthesisResult,
    TierCounts,
};

/// Compute the portfolio rollup from the full set of per-holding results.
/// Recomputed from scratch every run; the average is `None` for an empty
/// batch so callers can never mistake "no data" for a score.
pub fn summarize(results: &[SynthesisResult]) -> PortfolioSummary {
    let mut tier_counts = TierCounts::default();
    let mut bullish = 0;
    let mut bearish = 0;
    let mut neutral = 0;
    let mut confidence_total = 0.0;

    for result in results {
        tier_counts.bump(result.tier);
        match result.signal {
            SignalPolarity::Bullish => bullish += 1,
            SignalPolarity::Bearish => bearish += 1,
            SignalPolarity::Neutral => neutral += 1,
        }
        confidence_total += result.confidence;
    }

    let average_confidence = if results.is_empty() {
        None
    } else {
        Some(confidence_total / results.len() as f64)
    };

    PortfolioSummary {
        total_holdings: results.len(),
        average_confidence,
        tier_counts,
        bullish,
        bearish,
        neutral,
    }
}

/// Assemble the final report: results sorted by confidence descending
/// (ticker ascending on ties, so the order is stable regardless of input
/// order), failures carried alongside, summary computed last — after the
/// whole batch has joined.
pub fn build_report(
    mut results: Vec<SynthesisResult>,
    failures: Vec<HoldingFailure>,
    generated_at: DateTime<Utc>,
) -> SynthesisReport {
    results.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });

    let summary = summarize(&results);
    tracing::debug!(
        "Report assembled: {} holdings, {} failures, average {:?}",
        summary.total_holdings,
        failures.len(),
        summary.average_confidence,
    );

    SynthesisReport {
        generated_at,
        summary,
        results,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confidence_engine::SynthesisEngine;
    use synthesis_core::{
        HoldingSnapshot, RecommendedAction, ScoreBreakdown, ScoringConfig, TechnicalRecord, Tier,
    };

    fn result(ticker: &str, confidence: f64, tier: Tier, signal: SignalPolarity) -> SynthesisResult {
        SynthesisResult {
            ticker: ticker.to_string(),
            company: None,
            confidence,
            tier,
            action: RecommendedAction::Hold,
            risk_factors: vec![],
            signal,
            breakdown: ScoreBreakdown::default(),
        }
    }

    fn snapshot(ticker: &str, rsi: f64, macd: f64, signal: SignalPolarity) -> HoldingSnapshot {
        HoldingSnapshot {
            technical: TechnicalRecord {
                ticker: ticker.to_string(),
                company: None,
                price: 100.0,
                rsi,
                macd_histogram: macd,
                price_above_sma20: false,
                price_above_sma50: false,
                signal,
                sector: None,
            },
            fundamental: None,
            sentiment: None,
        }
    }

    #[test]
    fn empty_batch_has_no_average() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_holdings, 0);
        assert_eq!(summary.average_confidence, None);
        assert_eq!(summary.tier_counts.total(), 0);
        assert_eq!(summary.bullish + summary.bearish + summary.neutral, 0);
    }

    #[test]
    fn summary_counts_tiers_and_polarities() {
        let results = vec![
            result("A1", 8.4, Tier::A, SignalPolarity::Bullish),
            result("B1", 6.2, Tier::BPlus, SignalPolarity::Bullish),
            result("B2", 5.1, Tier::B, SignalPolarity::Neutral),
            result("C1", 4.0, Tier::C, SignalPolarity::Bearish),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.total_holdings, 4);
        assert_eq!(summary.tier_counts.a, 1);
        assert_eq!(summary.tier_counts.b_plus, 1);
        assert_eq!(summary.tier_counts.b, 1);
        assert_eq!(summary.tier_counts.c, 1);
        assert_eq!(summary.bullish, 2);
        assert_eq!(summary.bearish, 1);
        assert_eq!(summary.neutral, 1);

        let avg = summary.average_confidence.unwrap();
        assert!((avg - 5.925).abs() < 1e-9);
    }

    #[test]
    fn report_sorts_by_confidence_then_ticker() {
        let results = vec![
            result("ZZ", 5.0, Tier::B, SignalPolarity::Neutral),
            result("AA", 5.0, Tier::B, SignalPolarity::Neutral),
            result("MM", 8.1, Tier::A, SignalPolarity::Bullish),
        ];
        let report = build_report(results, vec![], Utc::now());
        let order: Vec<&str> = report.results.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["MM", "AA", "ZZ"]);
    }

    #[test]
    fn report_groupings_partition_results() {
        let results = vec![
            result("HI", 8.0, Tier::A, SignalPolarity::Bullish),
            result("MID", 6.9, Tier::BPlus, SignalPolarity::Neutral),
            result("LOW", 4.9, Tier::C, SignalPolarity::Bearish),
        ];
        let report = build_report(results, vec![], Utc::now());
        assert_eq!(report.top_rated().count(), 1);
        assert_eq!(report.watch_list().count(), 1);
        assert_eq!(report.sell_candidates().count(), 1);
    }

    #[test]
    fn full_pipeline_is_order_independent() {
        let snapshots = vec![
            snapshot("AMD", 28.0, 0.4, SignalPolarity::Bullish),
            snapshot("META", 55.0, 0.1, SignalPolarity::Bullish),
            snapshot("NWG", 68.0, -0.2, SignalPolarity::Neutral),
            snapshot("BAD", 150.0, 0.0, SignalPolarity::Neutral),
            snapshot("CELH", 82.0, -0.9, SignalPolarity::Bearish),
        ];
        let engine = SynthesisEngine::new(ScoringConfig::default()).unwrap();

        let forward = engine.evaluate_batch(&snapshots);
        let reversed: Vec<HoldingSnapshot> = snapshots.into_iter().rev().collect();
        let backward = engine.evaluate_batch(&reversed);

        let stamp = Utc::now();
        let report_a = build_report(forward.results, forward.failures, stamp);
        let report_b = build_report(backward.results, backward.failures, stamp);

        // Sorted result order, summary, and failures all match
        let tickers_a: Vec<&str> = report_a.results.iter().map(|r| r.ticker.as_str()).collect();
        let tickers_b: Vec<&str> = report_b.results.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers_a, tickers_b);
        for (a, b) in report_a.results.iter().zip(&report_b.results) {
            assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
            assert_eq!(a.tier, b.tier);
        }
        assert_eq!(report_a.summary.total_holdings, report_b.summary.total_holdings);
        assert_eq!(
            report_a.summary.average_confidence.map(f64::to_bits),
            report_b.summary.average_confidence.map(f64::to_bits),
        );
        assert_eq!(report_a.summary.tier_counts, report_b.summary.tier_counts);
        assert_eq!(report_a.failures.len(), 1);
        assert_eq!(report_b.failures.len(), 1);
    }
}
