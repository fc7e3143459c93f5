use crate::models::{InvestorProfile, StartupProfile, RecommendationTier};
use crate::core::overlap::{first_overlap, is_blank, parse_deal_count, shared_ticket_bucket};

/// Every pair starts here before factor points are added
pub const BASE_SCORE: u32 = 50;

/// Heuristic scores never claim a perfect match
pub const MAX_HEURISTIC_SCORE: u8 = 95;

/// Investors with more recorded deals than this earn the experience bonus
pub const EXPERIENCE_THRESHOLD: u32 = 5;

/// Total number of factors the heuristic checks
pub const FACTOR_COUNT: usize = 5;

/// Points awarded per satisfied factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorPoints {
    pub industry: u32,
    pub stage: u32,
    pub geography: u32,
    pub ticket_size: u32,
    pub experience: u32,
}

impl Default for FactorPoints {
    fn default() -> Self {
        Self {
            industry: 30,
            stage: 20,
            geography: 15,
            ticket_size: 10,
            experience: 5,
        }
    }
}

/// Outcome of scoring one (startup, investor) pair
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Capped score reported to callers
    pub score: u8,
    /// Uncapped sum, kept for diagnostics
    pub raw_score: u32,
    pub alignment_points: Vec<String>,
    pub concerns: Vec<String>,
    pub factors_matched: usize,
}

impl ScoreBreakdown {
    pub fn tier(&self) -> RecommendationTier {
        RecommendationTier::from_score(self.score)
    }

    pub fn reasoning(&self) -> String {
        reasoning_for(self.factors_matched)
    }
}

/// Score a startup / investor pair with the additive point system.
///
/// The pair is scored the same way whichever side asked for matches.
/// Missing attributes skip their factor; they never fail the pair.
pub fn score_pair(
    startup: &StartupProfile,
    investor: &InvestorProfile,
    points: &FactorPoints,
) -> ScoreBreakdown {
    let mut raw_score = BASE_SCORE;
    let mut alignment_points = Vec::new();
    let mut concerns = Vec::new();
    let mut factors_matched = 0;

    // Industry
    let industry = first_overlap(
        startup.industry.iter().map(String::as_str),
        investor.preferred_industries.iter().map(String::as_str),
    );
    match industry {
        Some((_, preferred)) => {
            raw_score = raw_score.saturating_add(points.industry);
            factors_matched += 1;
            alignment_points.push(format!("Industry focus aligns ({})", preferred));
        }
        None if !startup.industry.is_empty() && !investor.preferred_industries.is_empty() => {
            concerns.push("Industry is outside the investor's stated focus".to_string());
        }
        None => {}
    }

    // Stage
    let stage = first_overlap(
        startup.startup_stage.as_deref(),
        investor.preferred_stages.iter().map(String::as_str),
    );
    match stage {
        Some((stage, _)) => {
            raw_score = raw_score.saturating_add(points.stage);
            factors_matched += 1;
            alignment_points.push(format!("Invests at the {} stage", stage.trim()));
        }
        None if !is_blank(startup.startup_stage.as_deref()) && !investor.preferred_stages.is_empty() => {
            concerns.push("Startup stage differs from preferred investment stages".to_string());
        }
        None => {}
    }

    // Geography
    let geography = first_overlap(
        startup.headquarters.as_deref(),
        investor.preferred_geographies.iter().map(String::as_str),
    );
    match geography {
        Some((_, region)) => {
            raw_score = raw_score.saturating_add(points.geography);
            factors_matched += 1;
            alignment_points.push(format!("Geographic fit ({})", region.trim()));
        }
        None if !is_blank(startup.headquarters.as_deref()) && !investor.preferred_geographies.is_empty() => {
            concerns.push("Located outside the investor's preferred geographies".to_string());
        }
        None => {}
    }

    // Ticket size
    let bucket = investor
        .ticket_size
        .as_deref()
        .and_then(|ticket| shared_ticket_bucket(ticket, &startup.funding_ask()));
    if let Some(bucket) = bucket {
        raw_score = raw_score.saturating_add(points.ticket_size);
        factors_matched += 1;
        alignment_points.push(format!("Ticket size fits the funding ask ({})", bucket));
    }

    // Experience
    let deals = investor
        .number_of_investments
        .as_deref()
        .and_then(parse_deal_count);
    if let Some(deals) = deals.filter(|d| *d > EXPERIENCE_THRESHOLD) {
        raw_score = raw_score.saturating_add(points.experience);
        factors_matched += 1;
        alignment_points.push(format!("Experienced investor ({} prior investments)", deals));
    }

    let score = raw_score.min(MAX_HEURISTIC_SCORE as u32) as u8;

    ScoreBreakdown {
        score,
        raw_score,
        alignment_points,
        concerns,
        factors_matched,
    }
}

/// One-sentence justification for a heuristic score
pub fn reasoning_for(factors_matched: usize) -> String {
    match factors_matched {
        0 => "No direct overlap found on the compatibility factors; listed for broader exploration."
            .to_string(),
        1 => format!("Matched on 1 of {} compatibility factors.", FACTOR_COUNT),
        n => format!("Matched on {} of {} compatibility factors.", n, FACTOR_COUNT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_startup() -> StartupProfile {
        StartupProfile {
            id: "s1".to_string(),
            startup_name: Some("Acme AI".to_string()),
            industry: vec!["AI".to_string()],
            startup_stage: Some("Seed".to_string()),
            headquarters: Some("India".to_string()),
            ..StartupProfile::default()
        }
    }

    fn create_test_investor() -> InvestorProfile {
        InvestorProfile {
            id: "i1".to_string(),
            full_name: Some("Asha Rao".to_string()),
            preferred_industries: vec!["AI/ML".to_string()],
            preferred_stages: vec!["Seed".to_string()],
            preferred_geographies: vec!["India".to_string()],
            ticket_size: Some(String::new()),
            number_of_investments: Some("0".to_string()),
            ..InvestorProfile::default()
        }
    }

    #[test]
    fn test_full_overlap_is_capped() {
        let result = score_pair(&create_test_startup(), &create_test_investor(), &FactorPoints::default());

        assert_eq!(result.raw_score, 115);
        assert_eq!(result.score, 95);
        assert_eq!(result.factors_matched, 3);
        assert_eq!(result.tier(), RecommendationTier::HighlyRecommended);
        assert_eq!(result.alignment_points.len(), 3);
        assert!(result.concerns.is_empty());
    }

    #[test]
    fn test_disjoint_profiles_score_base() {
        let startup = StartupProfile {
            industry: vec!["Agritech".to_string()],
            startup_stage: Some("Series B".to_string()),
            headquarters: Some("Kenya".to_string()),
            ..StartupProfile::default()
        };
        let investor = InvestorProfile {
            preferred_industries: vec!["Fintech".to_string()],
            preferred_stages: vec!["Pre-seed".to_string()],
            preferred_geographies: vec!["Europe".to_string()],
            ..InvestorProfile::default()
        };

        let result = score_pair(&startup, &investor, &FactorPoints::default());

        assert_eq!(result.score, 50);
        assert_eq!(result.tier(), RecommendationTier::Consider);
        assert!(result.alignment_points.is_empty());
        assert_eq!(result.concerns.len(), 3);
        assert!(result.reasoning().starts_with("No direct overlap"));
    }

    #[test]
    fn test_missing_attributes_are_skipped() {
        let result = score_pair(
            &StartupProfile::default(),
            &InvestorProfile::default(),
            &FactorPoints::default(),
        );

        assert_eq!(result.score, 50);
        assert!(result.concerns.is_empty());
    }

    #[test]
    fn test_ticket_and_experience_bonus() {
        let startup = StartupProfile {
            funding_amount: Some("₹75L".to_string()),
            funding_round_type: Some("Seed".to_string()),
            ..StartupProfile::default()
        };
        let investor = InvestorProfile {
            ticket_size: Some("Seed: ₹25L–₹1Cr".to_string()),
            number_of_investments: Some("12".to_string()),
            ..InvestorProfile::default()
        };

        let result = score_pair(&startup, &investor, &FactorPoints::default());

        assert_eq!(result.score, 65);
        assert_eq!(result.factors_matched, 2);
        assert_eq!(result.reasoning(), "Matched on 2 of 5 compatibility factors.");
    }

    #[test]
    fn test_experience_requires_more_than_five() {
        let investor = InvestorProfile {
            number_of_investments: Some("5".to_string()),
            ..InvestorProfile::default()
        };
        let result = score_pair(&StartupProfile::default(), &investor, &FactorPoints::default());
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_custom_points() {
        let points = FactorPoints {
            industry: 10,
            ..FactorPoints::default()
        };
        let startup = StartupProfile {
            industry: vec!["ai".to_string()],
            ..StartupProfile::default()
        };
        let investor = InvestorProfile {
            preferred_industries: vec!["AI/ML".to_string()],
            ..InvestorProfile::default()
        };

        assert_eq!(score_pair(&startup, &investor, &points).score, 60);
    }

    #[test]
    fn test_oversized_points_saturate() {
        let points = FactorPoints {
            industry: u32::MAX,
            stage: u32::MAX,
            ..FactorPoints::default()
        };

        let result = score_pair(&create_test_startup(), &create_test_investor(), &points);

        assert_eq!(result.raw_score, u32::MAX);
        assert_eq!(result.score, 95);
    }
}
