//! Environmental impact equivalents

use crate::models::EnvironmentalImpact;
use crate::utils::round_to;

/// kg CO2 avoided per kWh generated
pub const CO2_KG_PER_KWH: f64 = 0.424;
/// kg CO2 absorbed by one tree per year
pub const CO2_KG_PER_TREE_YEAR: f64 = 6.6;
/// Litres of oil displaced per kWh
pub const OIL_LITERS_PER_KWH: f64 = 0.22;

/// Convert annual generation (kWh) into CO2, tree and oil equivalents
pub fn compute_environmental(annual_generation_kwh: f64) -> EnvironmentalImpact {
    let co2_reduction_tons = round_to(annual_generation_kwh * CO2_KG_PER_KWH / 1000.0, 2);
    let trees = (co2_reduction_tons * 1000.0 / CO2_KG_PER_TREE_YEAR).floor();

    EnvironmentalImpact {
        co2_reduction_tons,
        tree_equivalent_count: trees.max(0.0) as u64,
        oil_savings_liters: round_to(annual_generation_kwh * OIL_LITERS_PER_KWH, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_generation() {
        let impact = compute_environmental(22178.88);
        assert_eq!(impact.co2_reduction_tons, 9.4);
        assert_eq!(impact.tree_equivalent_count, 1424);
        assert_eq!(impact.oil_savings_liters, 4879.35);
    }

    #[test]
    fn test_zero_generation() {
        let impact = compute_environmental(0.0);
        assert_eq!(impact.co2_reduction_tons, 0.0);
        assert_eq!(impact.tree_equivalent_count, 0);
        assert_eq!(impact.oil_savings_liters, 0.0);
    }

    #[test]
    fn test_co2_monotonic_and_trees_floor() {
        let mut previous = compute_environmental(0.0);
        let mut generation = 0.0;
        while generation < 60_000.0 {
            generation += 137.7;
            let impact = compute_environmental(generation);
            assert!(impact.co2_reduction_tons >= previous.co2_reduction_tons);
            assert_eq!(
                impact.tree_equivalent_count,
                (impact.co2_reduction_tons * 1000.0 / 6.6).floor() as u64
            );
            previous = impact;
        }
    }
}
