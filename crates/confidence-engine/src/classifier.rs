use synthesis_core::{RecommendedAction, Tier, TierBands};

/// Map a confidence value to its tier. Bands are checked in a single
/// descending order, so an exact edge value always lands in the higher
/// band (a confidence of exactly 5.0 is tier B, not C) and exactly one
/// tier matches for any input.
pub fn classify(confidence: f64, bands: &TierBands) -> Tier {
    if confidence >= bands.strong_buy {
        Tier::A
    } else if confidence >= bands.buy {
        Tier::BPlus
    } else if confidence >= bands.hold {
        Tier::B
    } else if confidence >= bands.reduce {
        Tier::C
    } else {
        Tier::D
    }
}

/// Pure tier-to-action lookup. A and B+ hold, B is watched, and the
/// below-cutoff tiers map to the rebalance advisor's two actions.
pub fn action_for_tier(tier: Tier) -> RecommendedAction {
    match tier {
        Tier::A | Tier::BPlus => RecommendedAction::Hold,
        Tier::B => RecommendedAction::Watch,
        Tier::C => RecommendedAction::ConsiderReducing,
        Tier::D => RecommendedAction::StrongSellReview,
    }
}
