use serde::Serialize;
use std::sync::Arc;

use crate::core::matcher::{MatchResult, Matcher};
use crate::core::parser::parse_response;
use crate::core::prompt::{investor_matching_prompt, startup_matching_prompt};
use crate::models::{InvestorProfile, MatchOutcome, MatchProfile, MatchSource, StartupProfile};
use crate::services::cache::{CacheKey, MatchCache};
use crate::services::text_generation::TextGenerator;

/// Default number of heuristic-ranked candidates embedded in a prompt
pub const DEFAULT_MAX_PROMPT_CANDIDATES: usize = 20;

const AI_UNAVAILABLE_NOTE: &str =
    "AI matching unavailable (no API key configured); results use heuristic scoring.";
const UNPARSABLE_NOTE: &str =
    "AI response could not be interpreted; candidates are listed in pool order.";

/// AI-assisted matching with graceful degradation.
///
/// Never fails: a missing credential or a provider error falls back to the
/// heuristic [`Matcher`], an unreadable completion to synthetic ranking. The
/// path taken is reported in [`MatchOutcome::source`].
pub struct Matchmaker {
    generator: Option<Arc<dyn TextGenerator>>,
    matcher: Matcher,
    max_prompt_candidates: usize,
    structured_output: bool,
    investor_cache: Option<MatchCache<InvestorProfile>>,
    startup_cache: Option<MatchCache<StartupProfile>>,
}

impl Matchmaker {
    /// Heuristic-only matchmaker
    pub fn new(matcher: Matcher) -> Self {
        Self {
            generator: None,
            matcher,
            max_prompt_candidates: DEFAULT_MAX_PROMPT_CANDIDATES,
            structured_output: false,
            investor_cache: None,
            startup_cache: None,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_max_prompt_candidates(mut self, max: usize) -> Self {
        self.max_prompt_candidates = max.max(1);
        self
    }

    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    pub fn with_cache(mut self, max_entries: u64, ttl_secs: u64) -> Self {
        self.investor_cache = Some(MatchCache::new(max_entries, ttl_secs));
        self.startup_cache = Some(MatchCache::new(max_entries, ttl_secs));
        self
    }

    pub fn ai_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// AI outcomes currently held across both directions
    pub async fn cached_results(&self) -> u64 {
        let mut total = 0;
        if let Some(cache) = &self.investor_cache {
            total += cache.entry_count().await;
        }
        if let Some(cache) = &self.startup_cache {
            total += cache.entry_count().await;
        }
        total
    }

    /// Rank investors for a startup
    pub async fn find_matches_for_startup(
        &self,
        startup: &StartupProfile,
        investors: &[InvestorProfile],
    ) -> MatchOutcome<InvestorProfile> {
        let structured = self.structured_output;
        self.run(
            "startup",
            startup,
            investors,
            self.investor_cache.as_ref(),
            |limit| self.matcher.find_investors_top(startup, investors, limit),
            |shortlist| startup_matching_prompt(startup, shortlist, structured),
        )
        .await
    }

    /// Rank startups for an investor
    pub async fn find_matches_for_investor(
        &self,
        investor: &InvestorProfile,
        startups: &[StartupProfile],
    ) -> MatchOutcome<StartupProfile> {
        let structured = self.structured_output;
        self.run(
            "investor",
            investor,
            startups,
            self.startup_cache.as_ref(),
            |limit| self.matcher.find_startups_top(investor, startups, limit),
            |shortlist| investor_matching_prompt(investor, shortlist, structured),
        )
        .await
    }

    async fn run<R, P, Rank, Prompt>(
        &self,
        direction: &'static str,
        requester: &R,
        pool: &[P],
        cache: Option<&MatchCache<P>>,
        rank: Rank,
        build_prompt: Prompt,
    ) -> MatchOutcome<P>
    where
        R: Serialize,
        P: MatchProfile,
        Rank: Fn(usize) -> MatchResult<P>,
        Prompt: Fn(&[P]) -> String,
    {
        if pool.is_empty() {
            return MatchOutcome {
                matches: Vec::new(),
                source: MatchSource::Heuristic,
                note: None,
                insights: None,
                total_candidates: 0,
            };
        }

        let Some(generator) = self.generator.as_ref() else {
            tracing::info!("AI matching unavailable, ranking {} candidates heuristically", pool.len());
            return heuristic(rank(self.matcher.max_results()), Some(AI_UNAVAILABLE_NOTE.to_string()));
        };

        let cache_key = cache.and_then(|_| CacheKey::matches(direction, requester, pool));
        if let (Some(cache), Some(key)) = (cache, cache_key.as_deref()) {
            if let Some(outcome) = cache.get(key).await {
                tracing::debug!("Serving cached AI ranking for {} request", direction);
                return outcome;
            }
        }

        // Bound prompt size: only the heuristic top-K reach the generator
        let shortlist: Vec<P>;
        let prompt_pool: &[P] = if pool.len() > self.max_prompt_candidates {
            shortlist = rank(self.max_prompt_candidates)
                .matches
                .into_iter()
                .map(|candidate| candidate.profile)
                .collect();
            tracing::debug!(
                "Pool of {} truncated to {} candidates before prompting",
                pool.len(),
                shortlist.len()
            );
            &shortlist
        } else {
            pool
        };

        let prompt = build_prompt(prompt_pool);

        let generation = match generator.generate(&prompt).await {
            Ok(generation) => generation,
            Err(e) => {
                tracing::warn!(
                    "AI matching via {} failed, falling back to heuristic ranking: {}",
                    generator.provider(),
                    e
                );
                return heuristic(
                    rank(self.matcher.max_results()),
                    Some(format!("AI matching failed: {}", e)),
                );
            }
        };

        tracing::debug!(
            "Received {} chars from {} ({})",
            generation.text.len(),
            generator.provider(),
            generation.model
        );

        let parsed = parse_response(&generation.text, pool, self.matcher.max_results());
        let note = match parsed.source {
            MatchSource::Synthetic => {
                tracing::warn!("AI response for {} request was not parseable", direction);
                Some(UNPARSABLE_NOTE.to_string())
            }
            _ => None,
        };

        let outcome = MatchOutcome {
            matches: parsed.matches,
            source: parsed.source,
            note,
            insights: parsed.insights,
            total_candidates: pool.len(),
        };

        if outcome.source == MatchSource::Ai {
            if let (Some(cache), Some(key)) = (cache, cache_key) {
                cache.insert(key, outcome.clone()).await;
            }
        }

        tracing::info!(
            "Returning {} {:?} matches out of {} candidates",
            outcome.matches.len(),
            outcome.source,
            outcome.total_candidates
        );

        outcome
    }
}

fn heuristic<P>(result: MatchResult<P>, note: Option<String>) -> MatchOutcome<P> {
    MatchOutcome {
        matches: result.matches,
        source: MatchSource::Heuristic,
        note,
        insights: None,
        total_candidates: result.total_candidates,
    }
}
