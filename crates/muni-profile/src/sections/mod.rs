pub mod introduction;

use serde::{Deserialize, Serialize};

/// Topical parts of a municipal profile report. Every section follows the
/// same manager pattern; only the introduction is implemented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Introduction,
    Demographics,
    Economics,
    Infrastructure,
}

impl SectionKind {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Introduction,
            Self::Demographics,
            Self::Economics,
            Self::Infrastructure,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Introduction => "Introduction",
            Self::Demographics => "Demographics",
            Self::Economics => "Economics",
            Self::Infrastructure => "Infrastructure",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Introduction => "introduction",
            Self::Demographics => "demographics",
            Self::Economics => "economics",
            Self::Infrastructure => "infrastructure",
        }
    }
}
