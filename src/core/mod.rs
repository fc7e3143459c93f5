// Core algorithm exports
pub mod matcher;
pub mod overlap;
pub mod parser;
pub mod prompt;
pub mod scoring;

pub use matcher::{MatchResult, Matcher, DEFAULT_MAX_RESULTS};
pub use parser::{parse_response, synthetic_matches, ParsedResponse};
pub use prompt::{investor_matching_prompt, startup_matching_prompt};
pub use scoring::{score_pair, FactorPoints, ScoreBreakdown};
