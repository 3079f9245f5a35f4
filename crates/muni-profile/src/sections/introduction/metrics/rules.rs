use crate::sections::introduction::domain::{PeerSnapshot, PriorCensus, WardFacts};

/// Round to a fixed number of significant digits. Density figures must be
/// stable across report runs, so rounding happens once, here.
pub(crate) fn round_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return 0.0;
    }
    let digits = digits.max(1) as i32;
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    (value * factor).round() / factor
}

pub(crate) fn round_decimals(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

pub(crate) fn ward_population_sum(wards: &[WardFacts]) -> u64 {
    wards.iter().map(|ward| ward.population).sum()
}

/// Relative deviation of the ward sum from the declared total, in percent.
pub(crate) fn deviation_pct(declared: u64, ward_sum: u64) -> f64 {
    if declared == 0 {
        return if ward_sum == 0 { 0.0 } else { 100.0 };
    }
    (ward_sum as f64 - declared as f64).abs() / declared as f64 * 100.0
}

/// Mean annual population growth between two censuses, in percent.
/// Compounded, not linear: census intervals in Nepal are long enough that
/// the difference matters.
pub(crate) fn annual_growth_pct(
    prior: &PriorCensus,
    census_year: u16,
    population: u64,
) -> Option<f64> {
    if census_year <= prior.year || prior.population == 0 || population == 0 {
        return None;
    }
    let years = f64::from(census_year - prior.year);
    let ratio = population as f64 / prior.population as f64;
    Some(round_decimals((ratio.powf(1.0 / years) - 1.0) * 100.0, 2))
}

/// 1-based position among peers ordered by population, larger first.
/// Peers with the same population share a rank.
pub(crate) fn rank_among_peers(population: u64, peers: &[PeerSnapshot]) -> Option<(usize, usize)> {
    if peers.is_empty() {
        return None;
    }
    let ahead = peers
        .iter()
        .filter(|peer| peer.population > population)
        .count();
    Some((ahead + 1, peers.len() + 1))
}
