// Built-in prompt templates

/// Built-in template names
pub const IDEA_GENERATION: &str = "idea_generation";
pub const IDEA_REGENERATION: &str = "idea_regeneration";
pub const IDEA_VALIDATION: &str = "idea_validation";
pub const UNICORN_PREDICTION: &str = "unicorn_prediction";
pub const RAG_ANSWER: &str = "rag_answer";
pub const MARKET_RESEARCH_FALLBACK: &str = "market_research_fallback";
pub const FINANCIAL_ASSUMPTIONS: &str = "financial_assumptions";
pub const PROTOTYPE_UI: &str = "prototype_ui";
pub const DEBATE_REALIST: &str = "debate_realist";
pub const DEBATE_VISIONARY: &str = "debate_visionary";
pub const DEBATE_ANALYST: &str = "debate_analyst";

/// All built-in templates, name to content
pub fn builtin_templates() -> Vec<(&'static str, &'static str)> {
    vec![
        (IDEA_GENERATION, IDEA_GENERATION_TEMPLATE),
        (IDEA_REGENERATION, IDEA_REGENERATION_TEMPLATE),
        (IDEA_VALIDATION, IDEA_VALIDATION_TEMPLATE),
        (UNICORN_PREDICTION, UNICORN_PREDICTION_TEMPLATE),
        (RAG_ANSWER, RAG_ANSWER_TEMPLATE),
        (MARKET_RESEARCH_FALLBACK, MARKET_RESEARCH_FALLBACK_TEMPLATE),
        (FINANCIAL_ASSUMPTIONS, FINANCIAL_ASSUMPTIONS_TEMPLATE),
        (PROTOTYPE_UI, PROTOTYPE_UI_TEMPLATE),
        (DEBATE_REALIST, DEBATE_REALIST_TEMPLATE),
        (DEBATE_VISIONARY, DEBATE_VISIONARY_TEMPLATE),
        (DEBATE_ANALYST, DEBATE_ANALYST_TEMPLATE),
    ]
}

const IDEA_GENERATION_TEMPLATE: &str = r#"You are a world-class innovation strategist.

User topic and resources: {{ topic }}
Use the real market data: {{ context }}
Step 1: Identify 3 real-world mass problems in this domain.
Step 2: Pick the most impactful unsolved problem.
Step 3: Create a unique scalable startup solution. If possible add AI or tech to it.

Make sure:
- Useful for millions
- Practical but futuristic
- Scalable globally

Return strictly in format:

Problem:
Solution:
Target Users:
Why it's innovative:
"#;

const IDEA_REGENERATION_TEMPLATE: &str = r#"Create a highly disruptive startup idea about {{ topic }}.

Rules:
- Must be new and not common
- Solve real mass problem
- Use AI or advanced tech
- Scalable globally
- Hackathon winning level

Return:

Problem:
Solution:
Target Users:
Why it's 10x better:
"#;

const IDEA_VALIDATION_TEMPLATE: &str = r#"You are a startup market research and innovation analyst with access to real market data.

REAL MARKET DATA (from Google Search & current data):
{{ context }}

Startup idea to validate:
{{ idea }}

Based on REAL market data above:

Tasks:
1. Check if similar startups exist based on the real data.
2. Classify the idea:
   - Completely new/untapped market
   - Rare with few competitors
   - Common with multiple competitors

3. If rare, suggest specific uniqueness improvements based on market gaps.
4. If common, provide honest feedback and suggest better differentiation.

Return format:

Innovation Score: (0-10)
Market Saturation: Low/Medium/High
Verdict: ACCEPT / IMPROVE / REJECT
Real Competitors Found:
Market Gap Analysis:
Reason:
Recommendations:
"#;

const UNICORN_PREDICTION_TEMPLATE: &str = r#"You are a top venture capitalist with access to real market data and investment trends.

REAL MARKET DATA (from Google Search, Crunchbase & investment databases):
{{ context }}

Startup idea to predict:
{{ idea }}

Based on REAL market data, predict:

1. Unicorn probability (0-100%) - justify using real comparable companies
2. Timeline to unicorn status (if possible based on similar companies)
3. What must be done to reach billion dollar valuation (based on proven paths)
4. Biggest weakness compared to market leaders
5. Current investor interest level (based on funding trends in this space)
6. Key success metrics to track
7. Most critical next step

Return structured response with real data backing each point.
"#;

const RAG_ANSWER_TEMPLATE: &str = r#"You are a helpful assistant with access to real market data via Google Search.

Context from real market search:
{{ context }}

Question: {{ question }}

Provide a helpful answer based on the real market data above."#;

const MARKET_RESEARCH_FALLBACK_TEMPLATE: &str = r#"You are a startup market research expert with access to current market knowledge.

Research and provide real market data about:
Query: {{ query }}

Find and list:
1. Real existing startups or companies doing similar things
2. Current market trends and validated problems
3. Funding landscape and recent deals
4. Recent news or product launches in this space
5. Estimated market size and opportunity

For each relevant company/startup found, provide:
- Name
- What they do
- Current status/funding
- Key differentiation
- Market impact

Provide factual, specific information based on your knowledge.
"#;

const FINANCIAL_ASSUMPTIONS_TEMPLATE: &str = r#"You are a venture capital financial analyst.

Based ONLY on the market evidence below, extract conservative,
realistic assumptions for a SaaS startup.

Market Evidence:
{{ context }}

Startup idea:
{{ idea }}

Return STRICT JSON only.
No explanations.
No markdown.

Schema:
{
  "pricing_per_customer_per_year": number,
  "target_customers_year_1": number,
  "annual_growth_rate": number,
  "churn_rate": number,
  "confidence_level": "low" | "medium" | "high"
}
"#;

const PROTOTYPE_UI_TEMPLATE: &str = r#"You are a senior Flutter engineer.

Generate a demo-ready Flutter prototype UI for the following startup concept:

{{ idea }}

Requirements:
- Use Flutter with Material 3
- Single-screen application
- AppBar with product name
- Hero section with short tagline
- 2-3 feature cards
- One primary call-to-action button
- Clean spacing, modern layout
- No backend logic
- No comments or explanations

Return ONLY valid Dart code for a Flutter app (main.dart).
Do not include markdown, backticks, or explanations.
"#;

const DEBATE_REALIST_TEMPLATE: &str = r#"CONTEXT: {{ context }}
STARTUP IDEA: {{ idea }}

ROLE: You are a Brutal Realist VC Partner.
TASK: Identify the 3 most likely reasons this startup will FAIL within 12 months.
Focus on: Market saturation, technical debt, or unit economics.
Be specific, cynical, and data-driven.
"#;

const DEBATE_VISIONARY_TEMPLATE: &str = r#"STARTUP IDEA: {{ idea }}
CRITIQUE FROM REALIST:
{{ critique }}

ROLE: You are the Visionary Founder.
TASK: Defend your concept. For every flaw the Realist mentioned, provide a specific
counter-strategy or pivot. Do not just be optimistic, be strategic.
How does your technology or business model bypass these 'kill-switches'?
"#;

const DEBATE_ANALYST_TEMPLATE: &str = r#"DEBATE LOG:
Realist Critique: {{ critique }}
Visionary Defense: {{ defense }}

ROLE: Senior Market Analyst.
TASK: Synthesize the debate.
1. Did the Visionary effectively debunk the Realist's concerns?
2. What is the 'Residual Risk' that still remains?
3. FINAL VERDICT: INVEST / WATCH / PASS.
4. CONFIDENCE SCORE: (0-100%) based on the validity of the Visionary's defense.
"#;
