use serde::{Deserialize, Serialize};

/// Numeric policy applied during metric derivation. Kept as explicit
/// configuration so report behavior is auditable rather than buried in
/// the arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsPolicy {
    /// Allowed relative gap, in percent, between the declared municipal
    /// population and the sum of ward populations before the figures are
    /// considered inconsistent. Within tolerance the declared total wins;
    /// beyond it the ward sum wins and a warning is attached.
    pub ward_total_tolerance_pct: f64,
    /// Significant digits kept when rounding population density.
    pub density_sig_digits: u32,
}

impl Default for MetricsPolicy {
    fn default() -> Self {
        Self {
            ward_total_tolerance_pct: 2.0,
            density_sig_digits: 3,
        }
    }
}
