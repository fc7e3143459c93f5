// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    InvestorProfile, MatchCandidate, MatchOutcome, MatchProfile, MatchSource, RecommendationTier,
    StartupProfile, UNKNOWN_ORGANIZATION,
};
pub use requests::{FindInvestorMatchesRequest, FindStartupMatchesRequest, MAX_POOL_SIZE};
pub use responses::{ErrorResponse, HealthResponse};
