// Unit tests for Pitchmatch

use pitchmatch::core::{
    overlap::{contains_either_way, parse_deal_count, shared_ticket_bucket},
    parse_response, score_pair, synthetic_matches, FactorPoints, Matcher,
};
use pitchmatch::models::{
    InvestorProfile, MatchSource, RecommendationTier, StartupProfile, UNKNOWN_ORGANIZATION,
};

fn create_startup(industry: &[&str], stage: &str, hq: &str) -> StartupProfile {
    StartupProfile {
        id: "startup".to_string(),
        startup_name: Some("Acme AI".to_string()),
        industry: industry.iter().map(|s| s.to_string()).collect(),
        startup_stage: Some(stage.to_string()),
        headquarters: Some(hq.to_string()),
        ..StartupProfile::default()
    }
}

fn create_investor(id: &str, industries: &[&str], stages: &[&str], geos: &[&str]) -> InvestorProfile {
    InvestorProfile {
        id: id.to_string(),
        full_name: Some(format!("Investor {}", id)),
        organization: Some(format!("Fund {}", id)),
        preferred_industries: industries.iter().map(|s| s.to_string()).collect(),
        preferred_stages: stages.iter().map(|s| s.to_string()).collect(),
        preferred_geographies: geos.iter().map(|s| s.to_string()).collect(),
        ..InvestorProfile::default()
    }
}

fn create_matching_investor(id: &str) -> InvestorProfile {
    InvestorProfile {
        ticket_size: Some(String::new()),
        number_of_investments: Some("0".to_string()),
        ..create_investor(id, &["AI/ML"], &["Seed"], &["India"])
    }
}

#[test]
fn test_full_overlap_scenario() {
    let startup = create_startup(&["AI"], "Seed", "India");
    let matcher = Matcher::default();

    let result = matcher.find_investors(&startup, &[create_matching_investor("1")]);

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].score, 95);
    assert_eq!(result.matches[0].recommendation_tier, RecommendationTier::HighlyRecommended);
    assert_eq!(result.matches[0].alignment_points.len(), 3);
}

#[test]
fn test_disjoint_scenario() {
    let startup = create_startup(&["Agritech"], "Series B", "Nairobi");
    let investor = create_investor("1", &["Fintech"], &["Pre-seed"], &["Europe"]);

    let result = Matcher::default().find_investors(&startup, &[investor]);

    assert_eq!(result.matches[0].score, 50);
    assert_eq!(result.matches[0].recommendation_tier, RecommendationTier::Consider);
}

#[test]
fn test_empty_pool_scenario() {
    let result = Matcher::default().find_investors(&create_startup(&["AI"], "Seed", "India"), &[]);
    assert!(result.matches.is_empty());
}

#[test]
fn test_eight_full_matches_truncated_in_order() {
    let startup = create_startup(&["AI"], "Seed", "India");
    let investors: Vec<InvestorProfile> = (0..8)
        .map(|i| create_matching_investor(&i.to_string()))
        .collect();

    let result = Matcher::default().find_investors(&startup, &investors);

    assert_eq!(result.matches.len(), 5);
    assert!(result.matches.iter().all(|m| m.score == 95));
    let ids: Vec<&str> = result.matches.iter().map(|m| m.profile.id.as_str()).collect();
    assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
}

#[test]
fn test_truncation_counts() {
    let startup = create_startup(&["AI"], "Seed", "India");
    let matcher = Matcher::default();

    for n in [0usize, 1, 4, 5, 6, 12] {
        let investors: Vec<InvestorProfile> = (0..n)
            .map(|i| create_investor(&i.to_string(), &["Biotech"], &[], &[]))
            .collect();
        let result = matcher.find_investors(&startup, &investors);
        assert_eq!(result.matches.len(), n.min(5), "pool of {}", n);
        assert_eq!(result.total_candidates, n);
    }
}

#[test]
fn test_scores_bounded_and_sorted() {
    let startup = StartupProfile {
        funding_amount: Some("$2M".to_string()),
        funding_round_type: Some("Seed".to_string()),
        ..create_startup(&["AI", "Health"], "Seed", "Bangalore, India")
    };
    let investors: Vec<InvestorProfile> = (0..20)
        .map(|i| InvestorProfile {
            ticket_size: (i % 2 == 0).then(|| "Seed to Series A".to_string()),
            number_of_investments: Some(format!("{} deals", i)),
            ..create_investor(
                &i.to_string(),
                if i % 3 == 0 { &["healthtech"] } else { &["Biotech"] },
                if i % 4 == 0 { &["seed"] } else { &["Growth"] },
                if i % 5 == 0 { &["india"] } else { &["Brazil"] },
            )
        })
        .collect();

    let result = Matcher::default().find_investors(&startup, &investors);

    assert!(result.matches.iter().all(|m| m.score <= 95));
    assert!(result.matches.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_deterministic_ranking() {
    let investor = create_investor("i", &["AI"], &["Seed"], &["India"]);
    let startups: Vec<StartupProfile> = (0..10)
        .map(|i| StartupProfile {
            id: i.to_string(),
            ..create_startup(if i % 2 == 0 { &["AI"] } else { &["Biotech"] }, "Seed", "Kenya")
        })
        .collect();
    let matcher = Matcher::default();

    let first = matcher.find_startups(&investor, &startups);
    let second = matcher.find_startups(&investor, &startups);

    assert_eq!(first.matches, second.matches);
}

#[test]
fn test_case_insensitive_industry() {
    let startup = StartupProfile {
        industry: vec!["ai".to_string()],
        ..StartupProfile::default()
    };
    let investor = create_investor("1", &["AI/ML"], &[], &[]);

    let breakdown = score_pair(&startup, &investor, &FactorPoints::default());

    assert_eq!(breakdown.score, 80);
    assert_eq!(breakdown.factors_matched, 1);
}

#[test]
fn test_overlap_helpers() {
    assert!(contains_either_way("AI", "ai/ml"));
    assert!(contains_either_way("Bangalore, India", "india"));
    assert!(!contains_either_way("", "India"));
    assert!(!contains_either_way("  ", "India"));
    assert_eq!(shared_ticket_bucket("Series A and B", "$5M series a"), Some("series a"));
    assert_eq!(shared_ticket_bucket("Growth", "Seed"), None);
    assert_eq!(parse_deal_count("12+ deals"), Some(12));
    assert_eq!(parse_deal_count("none"), None);
}

#[test]
fn test_parser_template_with_sections() {
    let pool = vec![
        create_investor("a", &["AI"], &[], &[]),
        create_investor("b", &["AI"], &[], &[]),
    ];
    let text = "\
**Match 1: Investor b - Score: 88/100**
• **Organization:** Fund b
• **Why This Match Works:**
  - Deep AI portfolio
  - Leads seed rounds
• **Potential Concerns:** Small fund size
• **Recommendation:** Highly Recommended
• **Next Steps:** Request an intro through the portfolio CEO

**Match 2: Investor a - Score: 61/100**
• **Recommendation:** Consider
";

    let parsed = parse_response(text, &pool, 5);

    assert_eq!(parsed.source, MatchSource::Ai);
    assert_eq!(parsed.matches.len(), 2);
    let top = &parsed.matches[0];
    assert_eq!(top.profile.id, "b");
    assert_eq!(top.score, 88);
    assert_eq!(top.recommendation_tier, RecommendationTier::HighlyRecommended);
    assert!(top.alignment_points.iter().any(|p| p.contains("Deep AI portfolio")));
    assert!(top.concerns.iter().any(|c| c.contains("Small fund size")));
    assert!(top.next_steps.as_deref().unwrap_or_default().contains("intro"));
    assert_eq!(parsed.matches[1].recommendation_tier, RecommendationTier::Consider);
}

#[test]
fn test_parser_unknown_name_uses_placeholder() {
    let pool = vec![create_investor("a", &[], &[], &[])];
    let parsed = parse_response("Match 1: Zed Ventures Partner - Score: 77/100", &pool, 5);

    assert_eq!(parsed.matches.len(), 1);
    let placeholder = &parsed.matches[0].profile;
    assert_eq!(placeholder.full_name.as_deref(), Some("Zed Ventures Partner"));
    assert_eq!(placeholder.organization.as_deref(), Some(UNKNOWN_ORGANIZATION));
    assert!(placeholder.id.is_empty());
}

#[test]
fn test_parser_no_headers_synthetic() {
    let pool: Vec<InvestorProfile> = (0..3)
        .map(|i| create_investor(&i.to_string(), &[], &[], &[]))
        .collect();

    let parsed = parse_response("Here are some thoughts about investing in general.", &pool, 5);

    assert_eq!(parsed.source, MatchSource::Synthetic);
    let scores: Vec<u8> = parsed.matches.iter().map(|m| m.score).collect();
    assert_eq!(scores, vec![85, 75, 65]);
    let ids: Vec<&str> = parsed.matches.iter().map(|m| m.profile.id.as_str()).collect();
    assert_eq!(ids, vec!["0", "1", "2"]);
}

#[test]
fn test_parser_structured_json() {
    let pool = vec![
        create_investor("a", &[], &[], &[]),
        create_investor("b", &[], &[], &[]),
    ];
    let text = r#"{"matches": [
        {"name": "Fund a", "score": 64, "reasoning": "Some overlap", "recommendation": "Recommended"},
        {"name": "Investor b", "score": "92", "alignmentPoints": ["Thesis fit"], "nextSteps": "Book a call"}
    ]}"#;

    let parsed = parse_response(text, &pool, 5);

    assert_eq!(parsed.source, MatchSource::Ai);
    assert_eq!(parsed.matches[0].profile.id, "b");
    assert_eq!(parsed.matches[0].score, 92);
    assert_eq!(parsed.matches[0].next_steps.as_deref(), Some("Book a call"));
    assert_eq!(parsed.matches[1].profile.id, "a");
    assert_eq!(parsed.matches[1].recommendation_tier, RecommendationTier::Recommended);
}

#[test]
fn test_synthetic_limited_to_five() {
    let pool: Vec<StartupProfile> = (0..9)
        .map(|i| StartupProfile {
            id: i.to_string(),
            ..StartupProfile::default()
        })
        .collect();

    let matches = synthetic_matches(&pool, 5);

    assert_eq!(matches.len(), 5);
    assert_eq!(matches[4].score, 45);
    assert_eq!(matches[4].profile.id, "4");
}
