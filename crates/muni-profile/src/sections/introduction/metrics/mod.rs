mod config;
mod rules;

pub use config::MetricsPolicy;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{DataQualityWarning, PeerSnapshot, RawFacts};

/// Pure derivation of summary statistics from raw facts. No I/O; the same
/// facts and policy always produce the same metrics.
#[derive(Debug, Clone, Default)]
pub struct MetricDeriver {
    policy: MetricsPolicy,
}

impl MetricDeriver {
    pub fn new(policy: MetricsPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MetricsPolicy {
        &self.policy
    }

    /// Derive metrics, reconciling imperfect source data where possible.
    /// Inconsistencies inside the documented tolerance are absorbed;
    /// beyond it the ward-level figures win and a warning is attached.
    /// Only structurally unusable input (duplicate ward numbers) fails.
    pub fn derive(
        &self,
        facts: &RawFacts,
        peers: &[PeerSnapshot],
    ) -> Result<Derivation, MetricError> {
        let mut warnings = Vec::new();

        let mut seen = BTreeSet::new();
        for ward in &facts.wards {
            if !seen.insert(ward.number) {
                return Err(MetricError::DuplicateWard(ward.number));
            }
        }

        let ward_sum = rules::ward_population_sum(&facts.wards);
        let population = match (facts.wards.is_empty(), facts.population_total) {
            (true, Some(declared)) => {
                warnings.push(DataQualityWarning::MissingWardData);
                declared
            }
            (true, None) => {
                warnings.push(DataQualityWarning::MissingWardData);
                warnings.push(DataQualityWarning::MissingPopulation);
                0
            }
            (false, Some(declared)) => {
                let deviation_pct = rules::deviation_pct(declared, ward_sum);
                if deviation_pct > self.policy.ward_total_tolerance_pct {
                    warnings.push(DataQualityWarning::WardTotalMismatch {
                        declared,
                        ward_sum,
                        deviation_pct: rules::round_decimals(deviation_pct, 1),
                    });
                    ward_sum
                } else {
                    declared
                }
            }
            (false, None) => ward_sum,
        };

        let density_per_sq_km = if facts.area_sq_km > 0.0 {
            (population > 0).then(|| {
                rules::round_significant(
                    population as f64 / facts.area_sq_km,
                    self.policy.density_sig_digits,
                )
            })
        } else {
            warnings.push(DataQualityWarning::MissingArea);
            None
        };

        let largest_ward = facts
            .wards
            .iter()
            .max_by(|a, b| {
                a.population
                    .cmp(&b.population)
                    .then(b.number.cmp(&a.number))
            })
            .map(|ward| WardShare {
                number: ward.number,
                population: ward.population,
                share_pct: if population > 0 {
                    rules::round_decimals(ward.population as f64 / population as f64 * 100.0, 1)
                } else {
                    0.0
                },
            });

        let mean_household_size = facts
            .wards
            .iter()
            .map(|ward| ward.households)
            .try_fold(0u64, |acc, households| households.map(|h| acc + h))
            .filter(|&households| households > 0 && population > 0)
            .map(|households| rules::round_decimals(population as f64 / households as f64, 2));

        let annual_growth_pct = facts
            .prior_census
            .as_ref()
            .and_then(|prior| rules::annual_growth_pct(prior, facts.census_year, population));

        let peer_rank =
            rules::rank_among_peers(population, peers).map(|(position, cohort_size)| PeerRank {
                position,
                cohort_size,
            });

        Ok(Derivation {
            metrics: DerivedMetrics {
                ward_count: facts.wards.len(),
                population,
                density_per_sq_km,
                largest_ward,
                mean_household_size,
                annual_growth_pct,
                peer_rank,
            },
            warnings,
        })
    }
}

/// Derivation result: the metrics plus any quality flags raised while
/// reconciling the source figures.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub metrics: DerivedMetrics,
    pub warnings: Vec<DataQualityWarning>,
}

/// Computed summary values. Created per build, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub ward_count: usize,
    pub population: u64,
    pub density_per_sq_km: Option<f64>,
    pub largest_ward: Option<WardShare>,
    pub mean_household_size: Option<f64>,
    pub annual_growth_pct: Option<f64>,
    pub peer_rank: Option<PeerRank>,
}

/// The most populous ward and its share of the municipal population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WardShare {
    pub number: u16,
    pub population: u64,
    pub share_pct: f64,
}

/// Standing among peer municipalities by population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRank {
    pub position: usize,
    pub cohort_size: usize,
}

/// Structural failure in the raw facts that no reconciliation policy can
/// absorb.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error("duplicate ward number {0} in source data")]
    DuplicateWard(u16),
}
