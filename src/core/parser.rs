//! Recovers structured matches from generated text.
//!
//! Three tiers, tried in order:
//! 1. a JSON object with a `matches` array (raw or inside a fenced block)
//! 2. the line template, in three header shapes:
//!    `Match N: <name> - Score: <X>/100` (or `- <X>/100`),
//!    `N. <name> - Score: <X>/100`, and a bare name line whose score
//!    follows on a later line
//! 3. synthetic ranking of the pool in input order
//!
//! Closing insight sections ("OVERALL MATCHING INSIGHTS", "PORTFOLIO
//! STRATEGY INSIGHTS") are collected separately from the matches.
//!
//! Parsing never fails; a non-empty pool always yields a non-empty result.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::core::overlap::contains_either_way;
use crate::models::{MatchCandidate, MatchProfile, MatchSource, RecommendationTier};

/// Scores handed out by the synthetic fallback, in pool order
pub const SYNTHETIC_SCORES: [u8; 5] = [85, 75, 65, 55, 45];

const SYNTHETIC_REASONING: &str =
    "AI analysis could not be interpreted; listed in pool order for manual review.";
const DEFAULT_AI_REASONING: &str = "Ranked by AI compatibility analysis.";

static RE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\W*match\s*#?\s*\d+\s*[:.)]?\s*(.+?)\s*(?:[-–—|]+|\(|,)\s*(?:score\s*[:=]?\s*(\d{1,3})(?:\.\d+)?|(\d{1,3})(?:\.\d+)?\s*(?:/\s*100|%))")
        .unwrap()
});

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\W*\d+\s*[.)]\s*(.+?)\s*(?:[-–—|]+|\(|,)\s*(?:score\s*[:=]?\s*(\d{1,3})(?:\.\d+)?|(\d{1,3})(?:\.\d+)?\s*(?:/\s*100|%))")
        .unwrap()
});

static RE_NAME_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\W*(?:match\s*#?\s*\d+\s*[:.)]|\d+\s*[.)])\s*([^\d\s].*?)[\s*_]*$").unwrap()
});

static RE_SCORE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[a-z ]*score\W*(\d{1,3})|(\d{1,3})(?:\.\d+)?\s*(?:/\s*100|%))").unwrap()
});

static RE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\**\s*([A-Za-z][A-Za-z /&\-]{1,40}?)\s*\**\s*:\s*\**\s*(.*?)\s*\**$").unwrap()
});

static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*•·▪◦]|\d+[.)])\s+").unwrap());

static RE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").unwrap());

/// One match as read from generated text, before resolution against the pool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMatch {
    pub name: String,
    pub score: u8,
    pub reasoning: String,
    pub alignment_points: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendation: Option<RecommendationTier>,
    pub next_steps: Option<String>,
}

/// Parser output with the tier that produced it
#[derive(Debug)]
pub struct ParsedResponse<P> {
    pub matches: Vec<MatchCandidate<P>>,
    pub source: MatchSource,
    pub insights: Option<String>,
}

/// Map generated text back onto the candidate pool.
///
/// Results are stable-sorted by score descending and truncated to `max_results`.
pub fn parse_response<P: MatchProfile>(
    text: &str,
    pool: &[P],
    max_results: usize,
) -> ParsedResponse<P> {
    let (parsed, insights) = match parse_structured(text) {
        Some(structured) => {
            tracing::debug!("Parsed {} matches from structured output", structured.0.len());
            structured
        }
        None => parse_any_template(text),
    };

    if parsed.is_empty() {
        tracing::debug!("No match headers found in generated text, using synthetic ranking");
        return ParsedResponse {
            matches: synthetic_matches(pool, max_results),
            source: MatchSource::Synthetic,
            insights: None,
        };
    }

    let mut seen_ids: Vec<&str> = Vec::new();
    let mut matches = Vec::with_capacity(parsed.len());

    for item in parsed {
        let profile = match resolve(&item.name, pool) {
            Some(profile) => {
                if seen_ids.contains(&profile.id()) {
                    tracing::debug!("Skipping repeated match for {}", item.name);
                    continue;
                }
                if !profile.id().is_empty() {
                    seen_ids.push(profile.id());
                }
                profile.clone()
            }
            None => {
                tracing::debug!("Match {} not found in pool, using placeholder", item.name);
                P::placeholder(&item.name)
            }
        };

        matches.push(into_candidate(item, profile));
    }

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(max_results);

    ParsedResponse {
        matches,
        source: MatchSource::Ai,
        insights,
    }
}

/// Wrap the first entries of the pool with descending synthetic scores
pub fn synthetic_matches<P: Clone>(pool: &[P], max_results: usize) -> Vec<MatchCandidate<P>> {
    pool.iter()
        .take(max_results.min(SYNTHETIC_SCORES.len()))
        .zip(SYNTHETIC_SCORES)
        .map(|(profile, score)| MatchCandidate {
            profile: profile.clone(),
            score,
            reasoning: SYNTHETIC_REASONING.to_string(),
            alignment_points: Vec::new(),
            concerns: vec!["Compatibility was not assessed in detail".to_string()],
            recommendation_tier: RecommendationTier::from_score(score),
            next_steps: None,
        })
        .collect()
}

fn into_candidate<P>(item: ParsedMatch, profile: P) -> MatchCandidate<P> {
    let reasoning = if !item.reasoning.is_empty() {
        item.reasoning
    } else if !item.alignment_points.is_empty() {
        item.alignment_points.join("; ")
    } else {
        DEFAULT_AI_REASONING.to_string()
    };

    MatchCandidate {
        profile,
        score: item.score,
        reasoning,
        recommendation_tier: item
            .recommendation
            .unwrap_or_else(|| RecommendationTier::from_score(item.score)),
        alignment_points: item.alignment_points,
        concerns: item.concerns,
        next_steps: item.next_steps,
    }
}

/// Find the pool entry named by the generator: exact name first, then two-way substring
fn resolve<'a, P: MatchProfile>(name: &str, pool: &'a [P]) -> Option<&'a P> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    pool.iter()
        .find(|p| profile_names(*p).any(|n| n.trim().to_lowercase() == wanted))
        .or_else(|| {
            pool.iter()
                .find(|p| profile_names(*p).any(|n| contains_either_way(n, name)))
        })
}

fn profile_names<P: MatchProfile>(profile: &P) -> impl Iterator<Item = &str> {
    [profile.display_name(), profile.organization()].into_iter().flatten()
}

#[derive(Debug, Deserialize)]
struct StructuredResponse {
    matches: Vec<StructuredMatch>,
    #[serde(default)]
    insights: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredMatch {
    name: String,
    #[serde(default)]
    score: Option<serde_json::Value>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    alignment_points: Vec<String>,
    #[serde(default)]
    concerns: Vec<String>,
    #[serde(default)]
    recommendation: Option<String>,
    #[serde(default)]
    next_steps: Option<String>,
}

fn parse_structured(text: &str) -> Option<(Vec<ParsedMatch>, Option<String>)> {
    let trimmed = text.trim();
    let fenced = RE_FENCE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    let braced = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&trimmed[start..=end]),
        _ => None,
    };

    let response = [Some(trimmed), fenced, braced]
        .into_iter()
        .flatten()
        .find_map(|candidate| serde_json::from_str::<StructuredResponse>(candidate).ok())?;

    let matches: Vec<ParsedMatch> = response
        .matches
        .into_iter()
        .filter(|m| !m.name.trim().is_empty())
        .map(|m| ParsedMatch {
            name: clean_name(&m.name),
            score: m.score.as_ref().map_or(0, coerce_score),
            reasoning: m.reasoning.unwrap_or_default().trim().to_string(),
            alignment_points: keep_meaningful(m.alignment_points),
            concerns: keep_meaningful(m.concerns),
            recommendation: m.recommendation.as_deref().and_then(RecommendationTier::from_label),
            next_steps: m.next_steps.filter(|s| !s.trim().is_empty()),
        })
        .collect();

    if matches.is_empty() {
        None
    } else {
        let insights = response
            .insights
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Some((matches, insights))
    }
}

fn coerce_score(value: &serde_json::Value) -> u8 {
    let raw = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    };
    raw.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Reasoning,
    Alignment,
    Concerns,
    NextSteps,
}

fn section_for(label: &str) -> Option<Section> {
    let label = label.trim().to_lowercase();
    let section = match label.as_str() {
        "why this match works" | "key alignment points" | "alignment points" | "alignment"
        | "investment thesis" | "key attraction points" | "strengths" => Section::Alignment,
        "potential concerns" | "concerns" | "risk assessment" | "risks" | "risk factors" => {
            Section::Concerns
        }
        "match reasoning" | "reasoning" | "why" => Section::Reasoning,
        "next steps" | "strategic value" | "due diligence focus" => Section::NextSteps,
        _ => return None,
    };
    Some(section)
}

/// Header shapes understood by the template parser, most specific first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderStyle {
    /// `Match 1: name - Score: 85/100` or `Match 1: name - 85/100`
    Match,
    /// `1. name - Score: 85/100`
    Numbered,
    /// `Match 1: name` or `1. name`, score on a following line
    SplitScore,
}

impl HeaderStyle {
    const ALL: [HeaderStyle; 3] = [HeaderStyle::Match, HeaderStyle::Numbered, HeaderStyle::SplitScore];

    /// A new match record, flagged with whether its score is already known
    fn header(self, raw_line: &str, line: &str) -> Option<(ParsedMatch, bool)> {
        let scored = |caps: regex::Captures| {
            let score = caps.get(2).or_else(|| caps.get(3)).map_or(0, |m| score_value(m.as_str()));
            let item = ParsedMatch {
                name: clean_name(&caps[1]),
                score,
                ..ParsedMatch::default()
            };
            (item, true)
        };

        match self {
            HeaderStyle::Match => RE_HEADER.captures(line).map(scored),
            HeaderStyle::Numbered => RE_NUMBERED.captures(line).map(scored),
            HeaderStyle::SplitScore => {
                // Indented numbered lines are list items, not records
                if raw_line.starts_with(char::is_whitespace) {
                    return None;
                }
                let caps = RE_NAME_ONLY.captures(line)?;
                let name = clean_name(&caps[1]);
                if name.is_empty() || name.contains(':') {
                    return None;
                }
                let item = ParsedMatch {
                    name,
                    ..ParsedMatch::default()
                };
                Some((item, false))
            }
        }
    }
}

fn score_value(digits: &str) -> u8 {
    digits.parse::<u32>().unwrap_or(0).min(100) as u8
}

fn split_score(body: &str) -> Option<u8> {
    let caps = RE_SCORE_LINE.captures(body)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| score_value(m.as_str()))
}

/// Try each header shape until one yields matches
fn parse_any_template(text: &str) -> (Vec<ParsedMatch>, Option<String>) {
    let mut insights = None;
    for style in HeaderStyle::ALL {
        let (matches, found) = parse_template(text, style);
        insights = insights.or(found);
        if !matches.is_empty() {
            tracing::debug!("Parsed {} matches with {:?} headers", matches.len(), style);
            return (matches, insights);
        }
    }
    (Vec::new(), insights)
}

fn finish(matches: &mut Vec<ParsedMatch>, current: Option<(ParsedMatch, bool)>) {
    // Records that never received a score are dropped
    if let Some((done, true)) = current {
        matches.push(done);
    }
}

/// Line-by-line template parser
fn parse_template(text: &str, style: HeaderStyle) -> (Vec<ParsedMatch>, Option<String>) {
    let mut matches = Vec::new();
    let mut current: Option<(ParsedMatch, bool)> = None;
    let mut section = Section::None;
    let mut in_insights = false;
    let mut insights: Vec<String> = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = style.header(raw_line, line) {
            finish(&mut matches, current.take());
            current = Some(header);
            section = Section::None;
            in_insights = false;
            continue;
        }

        let is_bullet = RE_BULLET.is_match(line);
        let body = strip_emphasis(RE_BULLET.replace(line, "").trim());
        let field = RE_FIELD
            .captures(&body)
            .map(|caps| (caps[1].trim().to_string(), strip_emphasis(&caps[2])));

        if let Some((item, scored)) = current.as_mut() {
            if !*scored {
                if let Some(score) = split_score(&body) {
                    item.score = score;
                    *scored = true;
                    continue;
                }
            }

            if let Some((label, value)) = &field {
                if label.to_lowercase().contains("recommendation") {
                    item.recommendation = RecommendationTier::from_label(value);
                    section = Section::None;
                    continue;
                }

                if let Some(next) = section_for(label) {
                    section = next;
                    if !value.is_empty() {
                        append(item, section, value.clone());
                    }
                    continue;
                }
            }
        }

        if is_heading(line) {
            // A new top-level heading ends the current match block
            finish(&mut matches, current.take());
            section = Section::None;
            in_insights = is_insights_heading(line);
            continue;
        }

        if in_insights {
            if is_meaningful(&body) {
                insights.push(body);
            }
            continue;
        }

        let Some((item, _)) = current.as_mut() else {
            continue;
        };

        if field.is_some() && (!is_bullet || section == Section::None) {
            // Descriptive field (organization, stage, ...)
            section = Section::None;
            continue;
        }

        if section != Section::None && (is_bullet || section != Section::Alignment) {
            append(item, section, body);
        }
    }

    finish(&mut matches, current.take());

    let insights = if insights.is_empty() {
        None
    } else {
        Some(insights.join("\n"))
    };
    (matches, insights)
}

fn append(item: &mut ParsedMatch, section: Section, value: String) {
    match section {
        Section::Alignment => {
            if is_meaningful(&value) {
                item.alignment_points.push(value);
            }
        }
        Section::Concerns => {
            if is_meaningful(&value) {
                item.concerns.push(value);
            }
        }
        Section::Reasoning => {
            if !item.reasoning.is_empty() {
                item.reasoning.push(' ');
            }
            item.reasoning.push_str(&value);
        }
        Section::NextSteps => {
            let steps = item.next_steps.get_or_insert_with(String::new);
            if !steps.is_empty() {
                steps.push(' ');
            }
            steps.push_str(&value);
        }
        Section::None => {}
    }
}

fn is_heading(line: &str) -> bool {
    if line.starts_with('#') {
        return true;
    }
    let all_caps = |text: &str| {
        let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
        letters.peek().is_some() && letters.all(|c| c.is_uppercase())
    };
    // Whole-line bold text with no label, e.g. "**📈 OVERALL MATCHING INSIGHTS:**"
    if line.starts_with("**") && line.ends_with("**") && line.len() > 4 {
        return all_caps(&line[2..line.len() - 2]);
    }
    // Plain capitalised heading, e.g. "PORTFOLIO STRATEGY INSIGHTS:"
    line.ends_with(':') && !RE_BULLET.is_match(line) && all_caps(line)
}

fn is_insights_heading(line: &str) -> bool {
    let upper = line.to_uppercase();
    upper.contains("INSIGHT") || upper.contains("STRATEGY")
}

fn strip_emphasis(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .to_string()
}

fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '*' || c == '_' || c == '[' || c == ']' || c == '"')
        .trim()
        .to_string()
}

fn is_meaningful(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    !(lower.is_empty()
        || lower == "none"
        || lower == "n/a"
        || lower == "none identified"
        || (lower.starts_with('[') && lower.ends_with(']')))
}

fn keep_meaningful(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| is_meaningful(v))
        .collect()
}
