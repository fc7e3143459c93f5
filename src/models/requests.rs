use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{InvestorProfile, StartupProfile};

/// Upper bound on candidate pools accepted over HTTP (mirrors the validator attribute)
pub const MAX_POOL_SIZE: usize = 1000;

/// Request to rank investors for a startup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindInvestorMatchesRequest {
    pub startup: StartupProfile,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub investors: Vec<InvestorProfile>,
}

/// Request to rank startups for an investor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindStartupMatchesRequest {
    pub investor: InvestorProfile,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub startups: Vec<StartupProfile>,
}
