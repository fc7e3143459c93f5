//! Prompt construction for AI-assisted matching.
//!
//! Pure string templating. The generated text is expected to follow the
//! `**Match N: <name> - Score: <X>/100**` template consumed by
//! [`crate::core::parser`], followed by a closing insights section.
//! Callers bound the pool size before building.

use std::fmt::Write;

use crate::models::{InvestorProfile, StartupProfile};

const NOT_SPECIFIED: &str = "Not specified";

/// Appended when the provider is asked for machine-readable output
const STRUCTURED_OUTPUT_INSTRUCTIONS: &str = r#"
## 🧾 MACHINE-READABLE OUTPUT:

Respond with a single JSON object and nothing else, using exactly this shape:
{"matches": [{"name": "<exact name from the list above>", "score": <1-100>, "reasoning": "<one paragraph>", "alignmentPoints": ["..."], "concerns": ["..."], "recommendation": "<level>", "nextSteps": "<advice>"}], "insights": "<overall observations>"}
List at most 5 matches, best first.
"#;

fn text(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_SPECIFIED,
    }
}

fn list(values: &[String]) -> String {
    let joined = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        joined
    }
}

/// Prompt asking for the investors best suited to a startup
pub fn startup_matching_prompt(
    startup: &StartupProfile,
    investors: &[InvestorProfile],
    structured: bool,
) -> String {
    let mut prompt = String::with_capacity(4096 + investors.len() * 768);

    prompt.push_str(
        "As an expert investment matchmaker and startup advisor, analyze this startup profile \
         and suggest the most compatible investors from the available pool.\n\n",
    );

    prompt.push_str("## 🚀 STARTUP PROFILE TO MATCH:\n");
    let _ = writeln!(prompt, "**Company:** {}", text(startup.startup_name.as_deref()));
    let _ = writeln!(prompt, "**Industry:** {}", list(&startup.industry));
    let _ = writeln!(prompt, "**Stage:** {}", text(startup.startup_stage.as_deref()));
    let _ = writeln!(prompt, "**Funding Amount:** {}", text(startup.funding_amount.as_deref()));
    let _ = writeln!(prompt, "**Funding Round:** {}", text(startup.funding_round_type.as_deref()));
    let _ = writeln!(prompt, "**Location:** {}", text(startup.headquarters.as_deref()));
    let _ = writeln!(prompt, "**Operating Markets:** {}", list(&startup.operating_markets));
    let _ = writeln!(prompt, "**Business Model:** {}", text(startup.business_model.as_deref()));
    let _ = writeln!(prompt, "**Problem Statement:** {}", text(startup.problem_statement.as_deref()));
    let _ = writeln!(prompt, "**Product Description:** {}", text(startup.product_description.as_deref()));
    let _ = writeln!(prompt, "**Tech Stack:** {}", text(startup.tech_stack.as_deref()));
    let _ = writeln!(prompt, "**Team Size:** {}", text(startup.team_size.as_deref()));
    let _ = writeln!(prompt, "**Team Skills:** {}", list(&startup.team_skills));
    let _ = writeln!(prompt, "**Monthly Revenue:** {}", text(startup.monthly_revenue.as_deref()));
    let _ = writeln!(prompt, "**Growth Rate:** {}", text(startup.growth_rate.as_deref()));
    let _ = writeln!(prompt, "**Use of Funds:** {}", list(&startup.use_of_funds));

    prompt.push_str("\n## 💼 AVAILABLE INVESTORS TO ANALYZE:\n");
    for (index, investor) in investors.iter().enumerate() {
        let _ = writeln!(prompt, "\n**Investor {}:**", index + 1);
        let _ = writeln!(prompt, "- Name: {}", text(investor.full_name.as_deref()));
        let _ = writeln!(prompt, "- Organization: {}", text(investor.organization.as_deref()));
        let _ = writeln!(prompt, "- Type: {}", text(investor.investor_type.as_deref()));
        let _ = writeln!(prompt, "- Preferred Industries: {}", list(&investor.preferred_industries));
        let _ = writeln!(prompt, "- Preferred Stages: {}", list(&investor.preferred_stages));
        let _ = writeln!(prompt, "- Ticket Size: {}", text(investor.ticket_size.as_deref()));
        let _ = writeln!(prompt, "- Preferred Geographies: {}", list(&investor.preferred_geographies));
        let _ = writeln!(prompt, "- Investment Model: {}", text(investor.investment_model.as_deref()));
        let _ = writeln!(prompt, "- Risk Appetite: {}", text(investor.risk_appetite.as_deref()));
        let _ = writeln!(prompt, "- Investment Horizon: {}", text(investor.investment_horizon.as_deref()));
        let _ = writeln!(prompt, "- Previous Investments: {}", text(investor.number_of_investments.as_deref()));
        let _ = writeln!(prompt, "- Portfolio Highlights: {}", text(investor.portfolio_highlights.as_deref()));
        let _ = writeln!(prompt, "- ESG Interest: {}", text(investor.esg_interest.as_deref()));
        let _ = writeln!(prompt, "- Co-Investment Interest: {}", text(investor.co_investment_interest.as_deref()));
    }

    prompt.push_str(
        "\n## 📊 ANALYSIS REQUIREMENTS:\n\n\
         Please analyze each investor and provide a ranked list of the TOP 5 MOST COMPATIBLE matches. \
         For each match, provide:\n\n\
         1. **Compatibility Score** (1-100)\n\
         2. **Match Reasoning** (detailed explanation)\n\
         3. **Key Alignment Points**\n\
         4. **Potential Concerns**\n\
         5. **Recommendation Level** (Highly Recommended / Recommended / Consider)\n\n\
         ## 📋 OUTPUT FORMAT:\n\n",
    );
    let _ = writeln!(
        prompt,
        "**🎯 TOP INVESTOR MATCHES FOR {}**\n",
        startup.startup_name.as_deref().unwrap_or("THIS STARTUP")
    );
    prompt.push_str(
        "**Match 1: [Investor Name] - Score: [X]/100**\n\
         - **Organization:** [Organization Name]\n\
         - **Investor Type:** [Type]\n\
         - **Recommendation:** [Level]\n\
         - **Match Reasoning:** [One paragraph]\n\
         - **Why This Match Works:**\n\
         \x20 • [Key alignment point 1]\n\
         \x20 • [Key alignment point 2]\n\
         \x20 • [Key alignment point 3]\n\
         - **Potential Concerns:**\n\
         \x20 • [Concern 1 if any]\n\
         \x20 • [Concern 2 if any]\n\
         - **Next Steps:** [Specific advice for approaching this investor]\n\n\
         [Repeat for top 5 matches]\n\n\
         **📈 OVERALL MATCHING INSIGHTS:**\n\
         [Market trends, fundraising strategy and positioning advice across these investors]\n\n\
         Use the investor names exactly as listed above.\n",
    );

    if structured {
        prompt.push_str(STRUCTURED_OUTPUT_INSTRUCTIONS);
    }

    prompt
}

/// Prompt asking for the startups best suited to an investor
pub fn investor_matching_prompt(
    investor: &InvestorProfile,
    startups: &[StartupProfile],
    structured: bool,
) -> String {
    let mut prompt = String::with_capacity(4096 + startups.len() * 768);

    prompt.push_str(
        "As an expert investment matchmaker and venture capital advisor, analyze this investor \
         profile and suggest the most compatible startups from the available pool.\n\n",
    );

    prompt.push_str("## 💼 INVESTOR PROFILE TO MATCH:\n");
    let _ = writeln!(prompt, "**Name:** {}", text(investor.full_name.as_deref()));
    let _ = writeln!(prompt, "**Organization:** {}", text(investor.organization.as_deref()));
    let _ = writeln!(prompt, "**Type:** {}", text(investor.investor_type.as_deref()));
    let _ = writeln!(prompt, "**Preferred Industries:** {}", list(&investor.preferred_industries));
    let _ = writeln!(prompt, "**Preferred Stages:** {}", list(&investor.preferred_stages));
    let _ = writeln!(prompt, "**Ticket Size:** {}", text(investor.ticket_size.as_deref()));
    let _ = writeln!(prompt, "**Preferred Geographies:** {}", list(&investor.preferred_geographies));
    let _ = writeln!(prompt, "**Investment Model:** {}", text(investor.investment_model.as_deref()));
    let _ = writeln!(prompt, "**Risk Appetite:** {}", text(investor.risk_appetite.as_deref()));
    let _ = writeln!(prompt, "**Investment Horizon:** {}", text(investor.investment_horizon.as_deref()));
    let _ = writeln!(prompt, "**Previous Investments:** {}", text(investor.number_of_investments.as_deref()));
    let _ = writeln!(prompt, "**Portfolio Highlights:** {}", text(investor.portfolio_highlights.as_deref()));
    let _ = writeln!(prompt, "**ESG Interest:** {}", text(investor.esg_interest.as_deref()));
    let _ = writeln!(prompt, "**Co-Investment Interest:** {}", text(investor.co_investment_interest.as_deref()));

    prompt.push_str("\n## 🚀 AVAILABLE STARTUPS TO ANALYZE:\n");
    for (index, startup) in startups.iter().enumerate() {
        let _ = writeln!(prompt, "\n**Startup {}:**", index + 1);
        let _ = writeln!(prompt, "- Company: {}", text(startup.startup_name.as_deref()));
        let _ = writeln!(prompt, "- Industry: {}", list(&startup.industry));
        let _ = writeln!(prompt, "- Stage: {}", text(startup.startup_stage.as_deref()));
        let _ = writeln!(prompt, "- Funding Amount: {}", text(startup.funding_amount.as_deref()));
        let _ = writeln!(prompt, "- Funding Round: {}", text(startup.funding_round_type.as_deref()));
        let _ = writeln!(prompt, "- Location: {}", text(startup.headquarters.as_deref()));
        let _ = writeln!(prompt, "- Business Model: {}", text(startup.business_model.as_deref()));
        let _ = writeln!(prompt, "- Problem: {}", text(startup.problem_statement.as_deref()));
        let _ = writeln!(prompt, "- Product: {}", text(startup.product_description.as_deref()));
        let _ = writeln!(prompt, "- Monthly Revenue: {}", text(startup.monthly_revenue.as_deref()));
        let _ = writeln!(prompt, "- Growth Rate: {}", text(startup.growth_rate.as_deref()));
        let _ = writeln!(prompt, "- Team Size: {}", text(startup.team_size.as_deref()));
        let _ = writeln!(prompt, "- Tech Stack: {}", text(startup.tech_stack.as_deref()));
    }

    prompt.push_str(
        "\n## 📊 ANALYSIS REQUIREMENTS:\n\n\
         Please analyze each startup and provide a ranked list of the TOP 5 MOST COMPATIBLE \
         investment opportunities. For each match, provide:\n\n\
         1. **Investment Score** (1-100)\n\
         2. **Investment Thesis** (detailed explanation)\n\
         3. **Key Attraction Points**\n\
         4. **Risk Assessment**\n\
         5. **Investment Recommendation** (Strong Buy / Buy / Consider / Pass)\n\n\
         ## 📋 OUTPUT FORMAT:\n\n",
    );
    let _ = writeln!(
        prompt,
        "**🎯 TOP STARTUP MATCHES FOR {}**\n",
        investor.full_name.as_deref().unwrap_or("THIS INVESTOR")
    );
    prompt.push_str(
        "**Match 1: [Startup Name] - Score: [X]/100**\n\
         - **Industry:** [Industry]\n\
         - **Stage:** [Stage]\n\
         - **Recommendation:** [Level]\n\
         - **Match Reasoning:** [One paragraph]\n\
         - **Investment Thesis:**\n\
         \x20 • [Key attraction point 1]\n\
         \x20 • [Key attraction point 2]\n\
         \x20 • [Key attraction point 3]\n\
         - **Risk Assessment:**\n\
         \x20 • [Risk factor 1 if any]\n\
         \x20 • [Risk factor 2 if any]\n\
         - **Strategic Value:** [How this fits the investor's portfolio]\n\n\
         [Repeat for top 5 matches]\n\n\
         **📊 PORTFOLIO STRATEGY INSIGHTS:**\n\
         [Portfolio balance, sector diversification and deal-flow observations]\n\n\
         Use the company names exactly as listed above.\n",
    );

    if structured {
        prompt.push_str(STRUCTURED_OUTPUT_INSTRUCTIONS);
    }

    prompt
}
