use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::fingerprint::Fingerprint;
use crate::sections::SectionKind;

/// Identifier wrapper for one local government unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MunicipalityId(pub String);

impl fmt::Display for MunicipalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Administrative classification of a Nepali local government unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MunicipalityKind {
    RuralMunicipality,
    Municipality,
    SubMetropolitanCity,
    MetropolitanCity,
}

impl MunicipalityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RuralMunicipality => "rural municipality",
            Self::Municipality => "municipality",
            Self::SubMetropolitanCity => "sub-metropolitan city",
            Self::MetropolitanCity => "metropolitan city",
        }
    }

    pub const fn label_nepali(self) -> &'static str {
        match self {
            Self::RuralMunicipality => "गाउँपालिका",
            Self::Municipality => "नगरपालिका",
            Self::SubMetropolitanCity => "उपमहानगरपालिका",
            Self::MetropolitanCity => "महानगरपालिका",
        }
    }
}

/// Ward-level slice of a census snapshot. Wards are the granularity at
/// which raw population data is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardFacts {
    pub number: u16,
    pub population: u64,
    pub households: Option<u64>,
    pub area_sq_km: Option<f64>,
}

/// Totals from the preceding census, kept so growth can be derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorCensus {
    pub year: u16,
    pub population: u64,
}

/// Read-only snapshot of source data for one municipality. Owned by the
/// data provider; the section manager holds one copy per build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFacts {
    pub municipality: MunicipalityId,
    pub name: String,
    pub name_local: Option<String>,
    pub kind: MunicipalityKind,
    pub district: String,
    pub district_local: Option<String>,
    pub province: String,
    pub province_local: Option<String>,
    pub area_sq_km: f64,
    pub census_year: u16,
    pub population_total: Option<u64>,
    pub wards: Vec<WardFacts>,
    pub prior_census: Option<PriorCensus>,
}

/// Lightweight token describing the current state of a municipality's
/// source data, fetched without pulling the full snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceVersion {
    pub dataset_revision: String,
    pub updated_at: DateTime<Utc>,
    pub earliest_record: NaiveDate,
}

/// Population snapshot of a peer municipality, used for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSnapshot {
    pub municipality: MunicipalityId,
    pub name: String,
    pub population: u64,
}

/// Narrative language of the generated section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    English,
    Nepali,
}

impl Locale {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Some(Self::English),
            "ne" | "ne-np" | "nepali" => Some(Self::Nepali),
            _ => None,
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Nepali => "ne",
        }
    }
}

/// Build parameters recognized by the section manager. Participates in the
/// cache key, so every field must affect assembly output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionParams {
    pub locale: Locale,
    pub include_chart: bool,
    pub as_of: Option<NaiveDate>,
}

impl Default for SectionParams {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            include_chart: true,
            as_of: None,
        }
    }
}

/// Parameter violations are rejected before any work is performed.
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("unrecognized locale '{0}'")]
    UnknownLocale(String),
    #[error("as_of {requested} predates the earliest census record {earliest}")]
    AsOfBeforeRecords {
        requested: NaiveDate,
        earliest: NaiveDate,
    },
}

/// Source-data imperfection flagged on the result instead of failing the
/// build. Municipal source data is known to be imperfect; report
/// generation stays best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    WardTotalMismatch {
        declared: u64,
        ward_sum: u64,
        deviation_pct: f64,
    },
    MissingArea,
    MissingWardData,
    MissingPopulation,
}

impl DataQualityWarning {
    pub fn detail(&self) -> String {
        match self {
            Self::WardTotalMismatch {
                declared,
                ward_sum,
                deviation_pct,
            } => format!(
                "ward population sum {ward_sum} deviates {deviation_pct:.1}% from the declared municipal total {declared}; ward-level figures were used"
            ),
            Self::MissingArea => {
                "municipal area is missing or zero; density figures were omitted".to_string()
            }
            Self::MissingWardData => {
                "no ward-level records in the snapshot; ward table and chart were omitted"
                    .to_string()
            }
            Self::MissingPopulation => {
                "no population figure in the snapshot; population narrative was omitted"
                    .to_string()
            }
        }
    }
}

/// Kind of chart a renderer is asked to draw. The section emits a
/// descriptor only; layout belongs to the rendering stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
}

/// One labeled value in a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// One renderable unit of section output. Immutable once produced; any
/// renderer must handle all three variants and tolerate an empty sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph {
        text: String,
    },
    Table {
        title: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Chart {
        kind: ChartKind,
        title: String,
        series: Vec<SeriesPoint>,
    },
}

/// The assembled artifact returned to callers and held by the content
/// store. Treated as immutable by every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionContent {
    pub municipality: MunicipalityId,
    pub section: SectionKind,
    pub fingerprint: Fingerprint,
    pub generated_at: DateTime<Utc>,
    pub blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

impl SectionContent {
    /// Blocks of a given shape, in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            ContentBlock::Paragraph { text } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_chart(&self) -> bool {
        self.blocks
            .iter()
            .any(|block| matches!(block, ContentBlock::Chart { .. }))
    }
}
