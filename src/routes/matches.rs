use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::models::{
    ErrorResponse, FindInvestorMatchesRequest, FindStartupMatchesRequest, HealthResponse,
    MatchProfile, MAX_POOL_SIZE,
};
use crate::services::Matchmaker;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matchmaker: Arc<Matchmaker>,
    pub max_pool_size: usize,
}

impl AppState {
    pub fn new(matchmaker: Matchmaker) -> Self {
        Self {
            matchmaker: Arc::new(matchmaker),
            max_pool_size: MAX_POOL_SIZE,
        }
    }

    pub fn with_max_pool_size(mut self, max_pool_size: usize) -> Self {
        self.max_pool_size = max_pool_size.min(MAX_POOL_SIZE);
        self
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/startup", web::post().to(match_startup))
        .route("/matches/investor", web::post().to(match_investor));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        ai_enabled: state.matchmaker.ai_enabled(),
        cached_results: state.matchmaker.cached_results().await,
    })
}

/// Rank investors for a startup
///
/// POST /api/v1/matches/startup
///
/// Request body:
/// ```json
/// {
///   "startup": { "startupName": "string", "industry": ["string"], ... },
///   "investors": [{ "fullName": "string", "preferredIndustries": ["string"], ... }]
/// }
/// ```
async fn match_startup(
    state: web::Data<AppState>,
    req: web::Json<FindInvestorMatchesRequest>,
) -> impl Responder {
    if let Some(rejection) = reject_invalid(&*req, req.investors.len(), state.max_pool_size) {
        return rejection;
    }

    let req = req.into_inner();

    tracing::info!(
        "Finding investor matches for {} across {} investors",
        req.startup.display_name().unwrap_or(req.startup.id.as_str()),
        req.investors.len()
    );

    let outcome = state
        .matchmaker
        .find_matches_for_startup(&req.startup, &req.investors)
        .await;

    HttpResponse::Ok().json(outcome)
}

/// Rank startups for an investor
///
/// POST /api/v1/matches/investor
///
/// Request body:
/// ```json
/// {
///   "investor": { "fullName": "string", "preferredStages": ["string"], ... },
///   "startups": [{ "startupName": "string", "startupStage": "string", ... }]
/// }
/// ```
async fn match_investor(
    state: web::Data<AppState>,
    req: web::Json<FindStartupMatchesRequest>,
) -> impl Responder {
    if let Some(rejection) = reject_invalid(&*req, req.startups.len(), state.max_pool_size) {
        return rejection;
    }

    let req = req.into_inner();

    tracing::info!(
        "Finding startup matches for {} across {} startups",
        req.investor.display_name().unwrap_or(req.investor.id.as_str()),
        req.startups.len()
    );

    let outcome = state
        .matchmaker
        .find_matches_for_investor(&req.investor, &req.startups)
        .await;

    HttpResponse::Ok().json(outcome)
}

fn reject_invalid<T: Validate>(req: &T, pool_len: usize, max_pool_size: usize) -> Option<HttpResponse> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match request: {}", errors);
        return Some(bad_request(errors.to_string()));
    }

    if pool_len > max_pool_size {
        tracing::info!("Rejected pool of {} candidates (limit {})", pool_len, max_pool_size);
        return Some(bad_request(format!(
            "candidate pool has {} entries, limit is {}",
            pool_len, max_pool_size
        )));
    }

    None
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Matcher;
    use crate::models::{InvestorProfile, StartupProfile};

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            ai_enabled: false,
            cached_results: 0,
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_pool_limit_enforced() {
        let req = FindInvestorMatchesRequest {
            startup: StartupProfile::default(),
            investors: vec![InvestorProfile::default(); 3],
        };

        assert!(reject_invalid(&req, req.investors.len(), 2).is_some());
        assert!(reject_invalid(&req, req.investors.len(), 3).is_none());
    }

    #[test]
    fn test_state_caps_pool_size() {
        let state = AppState::new(Matchmaker::new(Matcher::default())).with_max_pool_size(50_000);
        assert_eq!(state.max_pool_size, MAX_POOL_SIZE);
    }
}
