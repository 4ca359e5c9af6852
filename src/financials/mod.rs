//! Financial assumptions and the deterministic 3-year revenue projection
//!
//! Assumptions come from the completion service as strict JSON; a response
//! that does not parse against the schema is a terminal error with no
//! repair or retry. The projection itself is pure arithmetic.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::llm::TextCompletion;
use crate::prompts::{self, PromptEngine};

/// Model confidence in its own extracted assumptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Structured assumptions extracted from market evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAssumptions {
    pub pricing_per_customer_per_year: f64,
    pub target_customers_year_1: u64,
    pub annual_growth_rate: f64,
    pub churn_rate: f64,
    pub confidence_level: ConfidenceLevel,
}

/// One projected year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    #[serde(rename = "Customers")]
    pub customers: u64,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
}

/// Three-year customer/revenue projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueProjection {
    #[serde(rename = "Year 1")]
    pub year1: YearProjection,
    #[serde(rename = "Year 2")]
    pub year2: YearProjection,
    #[serde(rename = "Year 3")]
    pub year3: YearProjection,
}

/// Derive the 3-year projection from assumptions
///
/// `customers[y] = floor(customers[y-1] * (1 + growth) * (1 - churn))`,
/// `revenue[y] = customers[y] * price`. Deterministic, no I/O.
pub fn project(assumptions: &FinancialAssumptions) -> RevenueProjection {
    let price = assumptions.pricing_per_customer_per_year;
    let retention = (1.0 + assumptions.annual_growth_rate) * (1.0 - assumptions.churn_rate);

    let year1 = assumptions.target_customers_year_1;
    let year2 = (year1 as f64 * retention).floor() as u64;
    let year3 = (year2 as f64 * retention).floor() as u64;

    RevenueProjection {
        year1: YearProjection {
            customers: year1,
            revenue: year1 as f64 * price,
        },
        year2: YearProjection {
            customers: year2,
            revenue: year2 as f64 * price,
        },
        year3: YearProjection {
            customers: year3,
            revenue: year3 as f64 * price,
        },
    }
}

/// Parse the model's response as strict JSON assumptions
pub fn parse_assumptions(text: &str) -> Result<FinancialAssumptions, ApiError> {
    serde_json::from_str(text.trim())
        .map_err(|e| ApiError::AssumptionParse(format!("{}: {}", e, text.trim())))
}

/// Extract assumptions for an idea from market evidence
///
/// One completion call against the strict-JSON prompt; parse failures are
/// terminal (no repair, no retry).
pub async fn extract_assumptions<C: TextCompletion>(
    llm: &C,
    prompts: &PromptEngine,
    idea: &str,
    market_context: &str,
) -> Result<FinancialAssumptions, ApiError> {
    let prompt = prompts.render_idea(prompts::FINANCIAL_ASSUMPTIONS, idea, market_context)?;
    let response = llm.complete(&prompt).await.map_err(ApiError::Completion)?;
    parse_assumptions(&response)
}

/// Build the spreadsheet grid written to range A1:D4
pub fn revenue_grid(projection: &RevenueProjection) -> Vec<Vec<Value>> {
    vec![
        vec![json!("Metric"), json!("Year 1"), json!("Year 2"), json!("Year 3")],
        vec![
            json!("Customers"),
            json!(projection.year1.customers),
            json!(projection.year2.customers),
            json!(projection.year3.customers),
        ],
        vec![
            json!("Revenue ($)"),
            json!(projection.year1.revenue),
            json!(projection.year2.revenue),
            json!(projection.year3.revenue),
        ],
    ]
}
