use serde::{Deserialize, Serialize};

/// Startup profile as stored by the profile store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartupProfile {
    #[serde(alias = "_id")]
    pub id: String,
    pub startup_name: Option<String>,
    pub industry: Vec<String>,
    pub startup_stage: Option<String>,
    pub funding_amount: Option<String>,
    pub funding_round_type: Option<String>,
    pub headquarters: Option<String>,
    pub operating_markets: Vec<String>,
    pub business_model: Option<String>,
    pub problem_statement: Option<String>,
    pub product_description: Option<String>,
    pub tech_stack: Option<String>,
    pub team_size: Option<String>,
    pub team_skills: Vec<String>,
    pub monthly_revenue: Option<String>,
    pub growth_rate: Option<String>,
    pub use_of_funds: Vec<String>,
}

impl StartupProfile {
    /// Funding ask as free text (amount plus round type)
    pub fn funding_ask(&self) -> String {
        [self.funding_amount.as_deref(), self.funding_round_type.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Investor profile as stored by the profile store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestorProfile {
    #[serde(alias = "_id")]
    pub id: String,
    pub full_name: Option<String>,
    pub organization: Option<String>,
    pub investor_type: Option<String>,
    pub preferred_industries: Vec<String>,
    pub preferred_stages: Vec<String>,
    pub ticket_size: Option<String>,
    pub preferred_geographies: Vec<String>,
    pub investment_model: Option<String>,
    pub risk_appetite: Option<String>,
    pub investment_horizon: Option<String>,
    pub number_of_investments: Option<String>,
    pub portfolio_highlights: Option<String>,
    pub esg_interest: Option<String>,
    pub co_investment_interest: Option<String>,
}

/// Organization shown for placeholder records the parser could not resolve
pub const UNKNOWN_ORGANIZATION: &str = "Unknown";

/// Common view over both sides of the marketplace.
///
/// The parser resolves names found in generated text through this trait, and
/// builds a placeholder when no pool entry matches.
pub trait MatchProfile: Clone + Serialize + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Person or company name the generation service is expected to echo back
    fn display_name(&self) -> Option<&str>;

    fn organization(&self) -> Option<&str>;

    /// Record standing in for an entity named by the generator but absent from the pool
    fn placeholder(name: &str) -> Self;
}

impl MatchProfile for StartupProfile {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.startup_name.as_deref()
    }

    // Startups have no separate organization field; the company name doubles as one.
    fn organization(&self) -> Option<&str> {
        self.startup_name.as_deref()
    }

    fn placeholder(name: &str) -> Self {
        Self {
            startup_name: Some(name.to_string()),
            ..Self::default()
        }
    }
}

impl MatchProfile for InvestorProfile {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    fn placeholder(name: &str) -> Self {
        Self {
            full_name: Some(name.to_string()),
            organization: Some(UNKNOWN_ORGANIZATION.to_string()),
            ..Self::default()
        }
    }
}

/// Recommendation level derived from the compatibility score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationTier {
    Consider,
    Recommended,
    HighlyRecommended,
}

impl RecommendationTier {
    /// >= 80 highly recommended, >= 65 recommended, otherwise consider
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            RecommendationTier::HighlyRecommended
        } else if score >= 65 {
            RecommendationTier::Recommended
        } else {
            RecommendationTier::Consider
        }
    }

    /// Map free-text recommendation labels ("Highly Recommended", "Strong Buy", "Pass", ...)
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase().replace('\u{2019}', "'");
        let negated = label.starts_with("not ")
            || label.contains(" not ")
            || label.contains("don't")
            || label.contains("dont ")
            || label.contains("avoid");
        if negated {
            Some(RecommendationTier::Consider)
        } else if label.contains("highly recommended") || label.contains("strong buy") {
            Some(RecommendationTier::HighlyRecommended)
        } else if label.contains("recommended") || label.contains("buy") {
            Some(RecommendationTier::Recommended)
        } else if label.contains("consider") || label.contains("pass") || label.contains("explore") {
            Some(RecommendationTier::Consider)
        } else {
            None
        }
    }
}

/// Ranked match returned to the caller; never persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate<P> {
    pub profile: P,
    pub score: u8,
    pub reasoning: String,
    pub alignment_points: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendation_tier: RecommendationTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
}

/// Which path produced a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Ai,
    Heuristic,
    Synthetic,
}

/// Result of one matching run, including provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome<P> {
    pub matches: Vec<MatchCandidate<P>>,
    pub source: MatchSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Portfolio-level commentary the provider wrote after the ranked matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
    pub total_candidates: usize,
}
