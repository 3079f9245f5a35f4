use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::sections::introduction::domain::WardFacts;

pub(crate) fn parse_ward_rows<R: Read>(reader: R) -> Result<Vec<WardFacts>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut wards = Vec::new();

    for record in csv_reader.deserialize::<WardRow>() {
        let row = record?;
        wards.push(WardFacts {
            number: row.ward,
            population: row.population,
            households: row.households,
            area_sq_km: row.area_sq_km,
        });
    }

    Ok(wards)
}

/// One row of a ward-wise census export. Census office spreadsheets leave
/// households and area blank for wards that were never surveyed.
#[derive(Debug, Deserialize)]
struct WardRow {
    #[serde(rename = "Ward No")]
    ward: u16,
    #[serde(rename = "Population")]
    population: u64,
    #[serde(
        rename = "Households",
        default,
        deserialize_with = "empty_string_as_none_u64"
    )]
    households: Option<u64>,
    #[serde(
        rename = "Area (sq. km)",
        default,
        deserialize_with = "empty_string_as_none_f64"
    )]
    area_sq_km: Option<f64>,
}

fn empty_string_as_none_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| value.trim().parse().map_err(serde::de::Error::custom))
        .transpose()
}

fn empty_string_as_none_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| value.trim().parse().map_err(serde::de::Error::custom))
        .transpose()
}
