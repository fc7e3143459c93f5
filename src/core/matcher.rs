use crate::models::{InvestorProfile, MatchCandidate, StartupProfile};
use crate::core::scoring::{score_pair, FactorPoints, ScoreBreakdown};

/// Default number of matches returned per invocation
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Result of a heuristic ranking run
#[derive(Debug)]
pub struct MatchResult<P> {
    pub matches: Vec<MatchCandidate<P>>,
    pub total_candidates: usize,
}

/// Deterministic heuristic matcher.
///
/// Pure function of its inputs: scores every candidate, stable-sorts by score
/// descending (ties keep input order) and keeps the top `max_results`.
#[derive(Debug, Clone)]
pub struct Matcher {
    points: FactorPoints,
    max_results: usize,
}

impl Matcher {
    pub fn new(points: FactorPoints, max_results: usize) -> Self {
        Self { points, max_results }
    }

    pub fn with_default_points() -> Self {
        Self::new(FactorPoints::default(), DEFAULT_MAX_RESULTS)
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Rank investors for a startup
    pub fn find_investors(
        &self,
        startup: &StartupProfile,
        investors: &[InvestorProfile],
    ) -> MatchResult<InvestorProfile> {
        self.find_investors_top(startup, investors, self.max_results)
    }

    /// Rank startups for an investor
    pub fn find_startups(
        &self,
        investor: &InvestorProfile,
        startups: &[StartupProfile],
    ) -> MatchResult<StartupProfile> {
        self.find_startups_top(investor, startups, self.max_results)
    }

    /// Rank investors for a startup, keeping `limit` entries
    pub fn find_investors_top(
        &self,
        startup: &StartupProfile,
        investors: &[InvestorProfile],
        limit: usize,
    ) -> MatchResult<InvestorProfile> {
        rank(investors, |investor| score_pair(startup, investor, &self.points), limit)
    }

    /// Rank startups for an investor, keeping `limit` entries
    pub fn find_startups_top(
        &self,
        investor: &InvestorProfile,
        startups: &[StartupProfile],
        limit: usize,
    ) -> MatchResult<StartupProfile> {
        rank(startups, |startup| score_pair(startup, investor, &self.points), limit)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_points()
    }
}

fn rank<P, F>(pool: &[P], score: F, limit: usize) -> MatchResult<P>
where
    P: Clone,
    F: Fn(&P) -> ScoreBreakdown,
{
    let mut matches: Vec<MatchCandidate<P>> = pool
        .iter()
        .map(|profile| {
            let breakdown = score(profile);
            MatchCandidate {
                profile: profile.clone(),
                score: breakdown.score,
                reasoning: breakdown.reasoning(),
                recommendation_tier: breakdown.tier(),
                alignment_points: breakdown.alignment_points,
                concerns: breakdown.concerns,
                next_steps: None,
            }
        })
        .collect();

    // sort_by is stable: equal scores keep pool order
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);

    MatchResult {
        matches,
        total_candidates: pool.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecommendationTier;

    fn create_investor(id: &str, industry: &str, stage: &str) -> InvestorProfile {
        InvestorProfile {
            id: id.to_string(),
            full_name: Some(format!("Investor {}", id)),
            preferred_industries: vec![industry.to_string()],
            preferred_stages: vec![stage.to_string()],
            ..InvestorProfile::default()
        }
    }

    fn create_startup() -> StartupProfile {
        StartupProfile {
            id: "s1".to_string(),
            startup_name: Some("Acme AI".to_string()),
            industry: vec!["AI".to_string()],
            startup_stage: Some("Seed".to_string()),
            ..StartupProfile::default()
        }
    }

    #[test]
    fn test_empty_pool_returns_empty() {
        let matcher = Matcher::with_default_points();
        let result = matcher.find_investors(&create_startup(), &[]);
        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 0);
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let matcher = Matcher::with_default_points();
        let investors = vec![
            create_investor("1", "Fintech", "Series B"),
            create_investor("2", "AI/ML", "Seed"),
            create_investor("3", "AI/ML", "Series A"),
        ];

        let result = matcher.find_investors(&create_startup(), &investors);

        let ids: Vec<&str> = result.matches.iter().map(|m| m.profile.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
        assert_eq!(result.matches[0].score, 95);
        assert_eq!(result.matches[1].score, 80);
        assert_eq!(result.matches[2].score, 50);
    }

    #[test]
    fn test_truncates_and_preserves_tie_order() {
        let matcher = Matcher::with_default_points();
        let investors: Vec<InvestorProfile> = (0..8)
            .map(|i| create_investor(&i.to_string(), "AI", "Seed"))
            .collect();

        let result = matcher.find_investors(&create_startup(), &investors);

        assert_eq!(result.matches.len(), 5);
        assert_eq!(result.total_candidates, 8);
        let ids: Vec<&str> = result.matches.iter().map(|m| m.profile.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_find_startups_for_investor() {
        let matcher = Matcher::with_default_points();
        let investor = create_investor("i", "ai", "seed");
        let startups = vec![
            StartupProfile {
                id: "a".to_string(),
                industry: vec!["Biotech".to_string()],
                ..StartupProfile::default()
            },
            create_startup(),
        ];

        let result = matcher.find_startups(&investor, &startups);

        assert_eq!(result.matches[0].profile.id, "s1");
        assert_eq!(result.matches[0].recommendation_tier, RecommendationTier::HighlyRecommended);
        assert_eq!(result.matches[1].recommendation_tier, RecommendationTier::Consider);
    }

    #[test]
    fn test_deterministic() {
        let matcher = Matcher::with_default_points();
        let investors: Vec<InvestorProfile> = (0..10)
            .map(|i| create_investor(&i.to_string(), if i % 2 == 0 { "AI" } else { "Biotech" }, "Seed"))
            .collect();

        let first = matcher.find_investors(&create_startup(), &investors);
        let second = matcher.find_investors(&create_startup(), &investors);

        assert_eq!(first.matches, second.matches);
    }
}
