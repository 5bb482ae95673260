//! Multi-address comparison

use crate::error::{AnalysisError, MAX_COMPARE_ADDRESSES, MIN_COMPARE_ADDRESSES};
use crate::models::{ComparisonMetrics, ComparisonReport, LocationEstimate};

use super::AnalysisOrchestrator;

/// Reject address lists outside 2..=5
pub fn check_address_count(count: usize) -> Result<(), AnalysisError> {
    if (MIN_COMPARE_ADDRESSES..=MAX_COMPARE_ADDRESSES).contains(&count) {
        Ok(())
    } else {
        Err(AnalysisError::InvalidCompareCount(count))
    }
}

/// Estimate every address and rank them
///
/// Addresses that fail to resolve are skipped; if none resolve the request is
/// rejected as an invalid address.
pub async fn compare_addresses(
    orchestrator: &AnalysisOrchestrator,
    addresses: &[String],
) -> Result<ComparisonReport, AnalysisError> {
    check_address_count(addresses.len())?;

    let mut results = Vec::with_capacity(addresses.len());
    for address in addresses {
        if let Some(estimate) = orchestrator.quick_estimate(address).await {
            results.push(estimate);
        }
    }

    tracing::info!(
        requested = addresses.len(),
        resolved = results.len(),
        "Compared addresses"
    );

    build_report(results)
}

/// Assemble the report; `bestLocation` is the first maximum of radiation
pub fn build_report(results: Vec<LocationEstimate>) -> Result<ComparisonReport, AnalysisError> {
    let mut best: Option<&LocationEstimate> = None;
    for estimate in &results {
        match best {
            Some(current) if estimate.avg_solar_radiation <= current.avg_solar_radiation => {}
            _ => best = Some(estimate),
        }
    }
    let best_location = best
        .cloned()
        .ok_or_else(|| AnalysisError::InvalidAddress("None of the addresses could be resolved".to_string()))?;

    let comparison_metrics = ComparisonMetrics {
        solar_radiation: results.iter().map(|r| r.avg_solar_radiation).collect(),
        annual_generation: results.iter().map(|r| r.estimated_annual_generation).collect(),
        annual_savings: results.iter().map(|r| r.estimated_annual_savings).collect(),
    };

    Ok(ComparisonReport {
        results,
        best_location,
        comparison_metrics,
    })
}
