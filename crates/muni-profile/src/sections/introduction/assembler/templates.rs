//! Narrative templates for the introduction section, one rendering per
//! supported locale. Sentences are composed from whichever figures the
//! derivation produced; absent figures drop their sentence rather than
//! fabricating a value.

use super::locale::{format_count, format_decimal, localize_digits};
use crate::sections::introduction::domain::{Locale, RawFacts};
use crate::sections::introduction::metrics::DerivedMetrics;

pub(crate) fn display_name(facts: &RawFacts, locale: Locale) -> String {
    match locale {
        Locale::English => format!("{} {}", facts.name, title_case(facts.kind.label())),
        Locale::Nepali => format!(
            "{} {}",
            facts.name_local.as_deref().unwrap_or(&facts.name),
            facts.kind.label_nepali()
        ),
    }
}

pub(crate) fn overview_paragraph(
    facts: &RawFacts,
    metrics: &DerivedMetrics,
    locale: Locale,
) -> String {
    let mut sentences = vec![location_sentence(facts, locale)];
    if let Some(sentence) = extent_sentence(facts, metrics, locale) {
        sentences.push(sentence);
    }
    if let Some(sentence) = population_sentence(facts, metrics, locale) {
        sentences.push(sentence);
    }
    sentences.join(" ")
}

pub(crate) fn highlights_paragraph(
    facts: &RawFacts,
    metrics: &DerivedMetrics,
    locale: Locale,
) -> Option<String> {
    let mut sentences = Vec::new();

    if let Some(largest) = &metrics.largest_ward {
        if metrics.ward_count > 1 {
            sentences.push(match locale {
                Locale::English => format!(
                    "Ward {} is the most populous with {} residents ({}% of the total).",
                    format_count(u64::from(largest.number), locale),
                    format_count(largest.population, locale),
                    format_decimal(largest.share_pct, 1, locale),
                ),
                Locale::Nepali => format!(
                    "वडा नं. {} सबैभन्दा बढी जनसंख्या भएको वडा हो, जहाँ {} जना ({}%) बसोबास गर्छन्।",
                    format_count(u64::from(largest.number), locale),
                    format_count(largest.population, locale),
                    format_decimal(largest.share_pct, 1, locale),
                ),
            });
        }
    }

    if let Some(size) = metrics.mean_household_size {
        sentences.push(match locale {
            Locale::English => format!(
                "The average household counts {} members.",
                format_decimal(size, 2, locale)
            ),
            Locale::Nepali => format!(
                "औसत घरपरिवारमा {} जना सदस्य छन्।",
                format_decimal(size, 2, locale)
            ),
        });
    }

    if let (Some(growth), Some(prior)) = (metrics.annual_growth_pct, &facts.prior_census) {
        sentences.push(match locale {
            Locale::English => format!(
                "Between the {} and {} censuses the population changed by an average of {}% per year.",
                localize_digits(&prior.year.to_string(), locale),
                localize_digits(&facts.census_year.to_string(), locale),
                format_decimal(growth, 2, locale),
            ),
            Locale::Nepali => format!(
                "{} देखि {} सम्मको जनगणना अवधिमा जनसंख्या वार्षिक औसत {}% ले परिवर्तन भएको छ।",
                localize_digits(&prior.year.to_string(), locale),
                localize_digits(&facts.census_year.to_string(), locale),
                format_decimal(growth, 2, locale),
            ),
        });
    }

    if let Some(rank) = &metrics.peer_rank {
        sentences.push(match locale {
            Locale::English => format!(
                "By population it ranks {} among the {} local units of {}.",
                ordinal_en(rank.position),
                format_count(rank.cohort_size as u64, locale),
                district_name(facts, locale),
            ),
            Locale::Nepali => format!(
                "जनसंख्याका आधारमा यो {} का {} स्थानीय तहहरूमध्ये {} औं स्थानमा पर्छ।",
                district_name(facts, locale),
                format_count(rank.cohort_size as u64, locale),
                format_count(rank.position as u64, locale),
            ),
        });
    }

    if sentences.is_empty() {
        None
    } else {
        Some(sentences.join(" "))
    }
}

pub(crate) fn table_title(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Ward-wise population distribution",
        Locale::Nepali => "वडागत जनसंख्या वितरण",
    }
}

pub(crate) fn table_headers(locale: Locale) -> Vec<String> {
    let headers: [&str; 3] = match locale {
        Locale::English => ["Ward", "Population", "Households"],
        Locale::Nepali => ["वडा", "जनसंख्या", "घरधुरी"],
    };
    headers.iter().map(|h| h.to_string()).collect()
}

pub(crate) fn chart_title(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Population by ward",
        Locale::Nepali => "वडा अनुसार जनसंख्या",
    }
}

pub(crate) fn ward_label(number: u16, locale: Locale) -> String {
    match locale {
        Locale::English => format!("Ward {}", number),
        Locale::Nepali => format!("वडा {}", localize_digits(&number.to_string(), locale)),
    }
}

fn location_sentence(facts: &RawFacts, locale: Locale) -> String {
    match locale {
        Locale::English => format!(
            "{} is a {} in {} District of {} Province.",
            display_name(facts, locale),
            facts.kind.label(),
            facts.district,
            facts.province,
        ),
        Locale::Nepali => format!(
            "{} {} प्रदेशको {} जिल्लामा अवस्थित एक {} हो।",
            display_name(facts, locale),
            province_name(facts, locale),
            district_name(facts, locale),
            facts.kind.label_nepali(),
        ),
    }
}

fn extent_sentence(facts: &RawFacts, metrics: &DerivedMetrics, locale: Locale) -> Option<String> {
    let area = (facts.area_sq_km > 0.0).then(|| format_decimal(facts.area_sq_km, 2, locale));
    let wards = (metrics.ward_count > 0)
        .then(|| format_count(metrics.ward_count as u64, locale));

    match (area, wards, locale) {
        (Some(area), Some(wards), Locale::English) => Some(format!(
            "It spans {} square kilometres and is divided into {} wards.",
            area, wards
        )),
        (Some(area), None, Locale::English) => {
            Some(format!("It spans {} square kilometres.", area))
        }
        (None, Some(wards), Locale::English) => {
            Some(format!("It is divided into {} wards.", wards))
        }
        (Some(area), Some(wards), Locale::Nepali) => Some(format!(
            "यसको क्षेत्रफल {} वर्ग किलोमिटर छ र यो {} वटा वडामा विभाजित छ।",
            area, wards
        )),
        (Some(area), None, Locale::Nepali) => {
            Some(format!("यसको क्षेत्रफल {} वर्ग किलोमिटर छ।", area))
        }
        (None, Some(wards), Locale::Nepali) => {
            Some(format!("यो {} वटा वडामा विभाजित छ।", wards))
        }
        (None, None, _) => None,
    }
}

fn population_sentence(
    facts: &RawFacts,
    metrics: &DerivedMetrics,
    locale: Locale,
) -> Option<String> {
    if metrics.population == 0 {
        return None;
    }
    let year = localize_digits(&facts.census_year.to_string(), locale);
    let population = format_count(metrics.population, locale);
    let density = metrics
        .density_per_sq_km
        .map(|density| format_decimal(density, 2, locale));

    Some(match (density, locale) {
        (Some(density), Locale::English) => format!(
            "The {} census recorded a total population of {}, a density of {} persons per square kilometre.",
            year, population, density
        ),
        (None, Locale::English) => format!(
            "The {} census recorded a total population of {}.",
            year, population
        ),
        (Some(density), Locale::Nepali) => format!(
            "{} को जनगणना अनुसार यहाँको कुल जनसंख्या {} र जनघनत्व प्रति वर्ग किलोमिटर {} छ।",
            year, population, density
        ),
        (None, Locale::Nepali) => format!(
            "{} को जनगणना अनुसार यहाँको कुल जनसंख्या {} छ।",
            year, population
        ),
    })
}

fn district_name(facts: &RawFacts, locale: Locale) -> &str {
    match locale {
        Locale::English => &facts.district,
        Locale::Nepali => facts.district_local.as_deref().unwrap_or(&facts.district),
    }
}

fn province_name(facts: &RawFacts, locale: Locale) -> &str {
    match locale {
        Locale::English => &facts.province,
        Locale::Nepali => facts.province_local.as_deref().unwrap_or(&facts.province),
    }
}

fn title_case(label: &str) -> String {
    label
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let rest: String = chars.collect();
                    // keep hyphenated pieces like "sub-metropolitan" readable
                    let capitalized: String = rest
                        .split('-')
                        .enumerate()
                        .map(|(i, piece)| {
                            if i == 0 {
                                piece.to_string()
                            } else {
                                capitalize(piece)
                            }
                        })
                        .collect::<Vec<_>>()
                        .join("-");
                    format!("{}{}", first.to_ascii_uppercase(), capitalized)
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn ordinal_en(position: usize) -> String {
    let suffix = match (position % 10, position % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{position}{suffix}")
}
