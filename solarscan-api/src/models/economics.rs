//! Economic analysis

use serde::{Deserialize, Serialize};

/// Cost and savings estimate; money in won
///
/// `net_cost` is `installation_cost - subsidy_amount` and may go negative
/// when a subsidy exceeds the cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicAnalysis {
    pub installation_cost: i64,
    pub subsidy_amount: i64,
    pub net_cost: i64,
    pub annual_savings: i64,
    pub monthly_savings: i64,
    /// Years; 0 when there are no savings
    pub payback_period_years: f64,
    #[serde(rename = "roi20Years")]
    pub roi_20_years: i64,
    /// Won per kWh
    pub electricity_rate: i64,
}
