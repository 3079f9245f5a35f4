use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::domain::{SectionParams, SourceVersion};

/// Deterministic version token for one (source snapshot, build parameters)
/// pair. Identical inputs always hash to the identical fingerprint, which
/// is what lets the store detect staleness without comparing full datasets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn compute(version: &SourceVersion, params: &SectionParams) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(version.dataset_revision.as_bytes());
        hasher.update(b"\0");
        hasher.update(version.updated_at.to_rfc3339().as_bytes());
        hasher.update(b"\0");
        hasher.update(params.locale.tag().as_bytes());
        hasher.update([u8::from(params.include_chart)]);
        if let Some(as_of) = params.as_of {
            hasher.update(as_of.to_string().as_bytes());
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Truncated form for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::introduction::domain::Locale;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn version(revision: &str) -> SourceVersion {
        SourceVersion {
            dataset_revision: revision.to_string(),
            updated_at: Utc.with_ymd_and_hms(2023, 6, 1, 8, 30, 0).unwrap(),
            earliest_record: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
        }
    }

    #[test]
    fn identical_inputs_hash_identically() {
        let params = SectionParams::default();
        let a = Fingerprint::compute(&version("rev-7"), &params);
        let b = Fingerprint::compute(&version("rev-7"), &params);
        assert_eq!(a, b);
    }

    #[test]
    fn revision_change_changes_fingerprint() {
        let params = SectionParams::default();
        let a = Fingerprint::compute(&version("rev-7"), &params);
        let b = Fingerprint::compute(&version("rev-8"), &params);
        assert_ne!(a, b);
    }

    #[test]
    fn params_participate_in_fingerprint() {
        let v = version("rev-7");
        let with_chart = Fingerprint::compute(&v, &SectionParams::default());
        let without_chart = Fingerprint::compute(
            &v,
            &SectionParams {
                include_chart: false,
                ..SectionParams::default()
            },
        );
        let nepali = Fingerprint::compute(
            &v,
            &SectionParams {
                locale: Locale::Nepali,
                ..SectionParams::default()
            },
        );
        assert_ne!(with_chart, without_chart);
        assert_ne!(with_chart, nepali);
    }

    #[test]
    fn short_form_is_a_prefix() {
        let fp = Fingerprint::compute(&version("rev-7"), &SectionParams::default());
        assert_eq!(fp.short().len(), 12);
        assert!(fp.as_str().starts_with(fp.short()));
    }
}
