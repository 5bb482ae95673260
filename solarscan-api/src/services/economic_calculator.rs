//! Economic analysis
//!
//! Money is whole won, rounded half away from zero.

use solarscan_common::config::{EconomicsConfig, RegionalSubsidy};

use crate::models::{EconomicAnalysis, SolarPrediction};
use crate::utils::{round_to, round_to_won};

/// Years used for the cumulative return figure
pub const ROI_HORIZON_YEARS: i64 = 20;

/// Per-kW subsidy rates by region
///
/// Entries are checked in order; the first whose key is contained in the
/// region name wins, otherwise the default rate applies.
#[derive(Debug, Clone)]
pub struct SubsidyTable {
    default_per_kw: i64,
    regional: Vec<RegionalSubsidy>,
}

impl SubsidyTable {
    pub fn new(default_per_kw: i64, regional: Vec<RegionalSubsidy>) -> Self {
        Self {
            default_per_kw,
            regional,
        }
    }

    pub fn rate_for(&self, region: &str) -> i64 {
        self.regional
            .iter()
            .find(|entry| !entry.region.is_empty() && region.contains(&entry.region))
            .map(|entry| entry.per_kw)
            .unwrap_or(self.default_per_kw)
    }
}

#[derive(Debug, Clone)]
pub struct EconomicCalculator {
    installation_cost_per_kw: i64,
    electricity_rate: i64,
    subsidies: SubsidyTable,
}

impl Default for EconomicCalculator {
    fn default() -> Self {
        Self::from_config(&EconomicsConfig::default())
    }
}

impl EconomicCalculator {
    pub fn from_config(config: &EconomicsConfig) -> Self {
        Self {
            installation_cost_per_kw: config.installation_cost_per_kw,
            electricity_rate: config.electricity_rate,
            subsidies: SubsidyTable::new(
                config.default_subsidy_per_kw,
                config.regional_subsidy.clone(),
            ),
        }
    }

    pub fn compute(&self, prediction: &SolarPrediction, region: &str) -> EconomicAnalysis {
        let capacity = prediction.recommended_capacity_kw;

        let installation_cost = round_to_won(capacity * self.installation_cost_per_kw as f64);
        let subsidy_amount = round_to_won(capacity * self.subsidies.rate_for(region) as f64);
        let net_cost = installation_cost - subsidy_amount;

        let annual_savings =
            round_to_won(prediction.annual_generation_kwh * self.electricity_rate as f64);
        let monthly_savings = round_to_won(annual_savings as f64 / 12.0);

        // No savings means no payback horizon
        let payback_period_years = if annual_savings > 0 {
            round_to(net_cost as f64 / annual_savings as f64, 1)
        } else {
            0.0
        };

        EconomicAnalysis {
            installation_cost,
            subsidy_amount,
            net_cost,
            annual_savings,
            monthly_savings,
            payback_period_years,
            roi_20_years: annual_savings * ROI_HORIZON_YEARS - net_cost,
            electricity_rate: self.electricity_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn prediction(capacity: f64, annual: f64) -> SolarPrediction {
        SolarPrediction {
            recommended_capacity_kw: capacity,
            panel_count: 60,
            annual_generation_kwh: annual,
            monthly_generation_kwh: BTreeMap::new(),
            daily_average_kwh: annual / 365.0,
            confidence_score: 0.92,
        }
    }

    #[test]
    fn test_reference_economics() {
        let economics =
            EconomicCalculator::default().compute(&prediction(18.0, 22178.88), "경기도 수원시 영통구");

        assert_eq!(economics.installation_cost, 90_000_000);
        assert_eq!(economics.subsidy_amount, 18_000_000);
        assert_eq!(economics.net_cost, 72_000_000);
        assert_eq!(economics.annual_savings, 3_326_832);
        assert_eq!(economics.monthly_savings, 277_236);
        assert_eq!(economics.payback_period_years, 21.6);
        assert_eq!(economics.roi_20_years, -5_463_360);
        assert_eq!(economics.electricity_rate, 150);
    }

    #[test]
    fn test_zero_savings_guarded() {
        let economics = EconomicCalculator::default().compute(&prediction(5.0, 0.0), "경기도");
        assert_eq!(economics.annual_savings, 0);
        assert_eq!(economics.payback_period_years, 0.0);
        assert_eq!(economics.net_cost, economics.installation_cost - economics.subsidy_amount);
    }

    #[test]
    fn test_net_cost_identity_holds() {
        let calculator = EconomicCalculator::default();
        for (capacity, annual) in [(0.3, 400.0), (3.6, 4321.5), (12.9, 15000.0), (18.0, 22178.88)] {
            let economics = calculator.compute(&prediction(capacity, annual), "경기도 용인시");
            assert_eq!(economics.net_cost, economics.installation_cost - economics.subsidy_amount);
            assert_eq!(
                economics.roi_20_years,
                economics.annual_savings * 20 - economics.net_cost
            );
        }
    }

    #[test]
    fn test_regional_subsidy_first_match_wins() {
        let config = EconomicsConfig {
            regional_subsidy: vec![
                RegionalSubsidy {
                    region: "수원시".to_string(),
                    per_kw: 1_500_000,
                },
                RegionalSubsidy {
                    region: "경기도".to_string(),
                    per_kw: 1_200_000,
                },
            ],
            ..EconomicsConfig::default()
        };
        let calculator = EconomicCalculator::from_config(&config);

        let suwon = calculator.compute(&prediction(10.0, 12000.0), "경기도 수원시 영통구");
        assert_eq!(suwon.subsidy_amount, 15_000_000);

        let goyang = calculator.compute(&prediction(10.0, 12000.0), "경기도 고양시");
        assert_eq!(goyang.subsidy_amount, 12_000_000);

        let elsewhere = calculator.compute(&prediction(10.0, 12000.0), "강원도 춘천시");
        assert_eq!(elsewhere.subsidy_amount, 10_000_000);
    }

    #[test]
    fn test_subsidy_above_cost_gives_negative_net() {
        let config = EconomicsConfig {
            default_subsidy_per_kw: 6_000_000,
            ..EconomicsConfig::default()
        };
        let economics = EconomicCalculator::from_config(&config).compute(&prediction(2.0, 2400.0), "경기도");
        assert_eq!(economics.net_cost, -2_000_000);
        assert!(economics.payback_period_years < 0.0);
    }
}
