mod locale;
mod templates;

use super::domain::{ChartKind, ContentBlock, RawFacts, SectionParams, SeriesPoint, WardFacts};
use super::metrics::DerivedMetrics;
use locale::format_count;

/// Composes raw facts and derived metrics into the ordered block sequence
/// consumed by the rendering stage. Deterministic: identical inputs and
/// parameters always yield the identical sequence, and wards are emitted
/// in canonical ward-number order no matter how the provider returned
/// them.
pub struct ContentAssembler;

impl ContentAssembler {
    pub fn assemble(
        facts: &RawFacts,
        metrics: &DerivedMetrics,
        params: &SectionParams,
    ) -> Vec<ContentBlock> {
        let mut blocks = Vec::with_capacity(4);

        blocks.push(ContentBlock::Paragraph {
            text: templates::overview_paragraph(facts, metrics, params.locale),
        });

        if let Some(text) = templates::highlights_paragraph(facts, metrics, params.locale) {
            blocks.push(ContentBlock::Paragraph { text });
        }

        let wards = canonical_wards(facts);
        if !wards.is_empty() {
            blocks.push(ward_table(&wards, params));
            if params.include_chart {
                blocks.push(ward_chart(&wards, params));
            }
        }

        blocks
    }
}

fn canonical_wards(facts: &RawFacts) -> Vec<&WardFacts> {
    let mut wards: Vec<&WardFacts> = facts.wards.iter().collect();
    wards.sort_by_key(|ward| ward.number);
    wards
}

fn ward_table(wards: &[&WardFacts], params: &SectionParams) -> ContentBlock {
    let rows = wards
        .iter()
        .map(|ward| {
            vec![
                templates::ward_label(ward.number, params.locale),
                format_count(ward.population, params.locale),
                ward.households
                    .map(|households| format_count(households, params.locale))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    ContentBlock::Table {
        title: templates::table_title(params.locale).to_string(),
        headers: templates::table_headers(params.locale),
        rows,
    }
}

fn ward_chart(wards: &[&WardFacts], params: &SectionParams) -> ContentBlock {
    ContentBlock::Chart {
        kind: ChartKind::Bar,
        title: templates::chart_title(params.locale).to_string(),
        series: wards
            .iter()
            .map(|ward| SeriesPoint {
                label: templates::ward_label(ward.number, params.locale),
                value: ward.population as f64,
            })
            .collect(),
    }
}
