//! Pitchmatch - startup / investor compatibility matching service
//!
//! Ranks a pool of investors for a startup (or startups for an investor).
//! A text-generation provider produces explanatory rankings when configured;
//! a deterministic heuristic scorer is always available as the fallback.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{FactorPoints, Matcher};
pub use crate::models::{
    InvestorProfile, MatchCandidate, MatchOutcome, MatchSource, RecommendationTier, StartupProfile,
};
pub use crate::services::{Matchmaker, TextGenerator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        let result = matcher.find_investors(&StartupProfile::default(), &[InvestorProfile::default()]);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].recommendation_tier, RecommendationTier::Consider);
    }
}
