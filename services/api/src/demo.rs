use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;

use muni_profile::config::AppConfig;
use muni_profile::error::AppError;
use muni_profile::sections::introduction::{
    ContentBlock, Locale, ParamsError, SectionBuildError, SectionContent, SectionParams,
};
use muni_profile::sources::census::CensusCsvImporter;

use crate::infra::{build_introduction_manager, municipality_id, CensusDirectory};

#[derive(Args, Debug)]
pub(crate) struct IntroductionArgs {
    /// Municipality to build the section for
    #[arg(long, default_value = "duduwa")]
    pub(crate) municipality: String,
    /// Narrative language (en or ne)
    #[arg(long, default_value = "en")]
    pub(crate) locale: String,
    /// Leave the ward chart descriptor out of the section
    #[arg(long)]
    pub(crate) no_chart: bool,
    /// Historical cutoff for the source snapshot (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Ward-wise census CSV export replacing the seeded ward data
    #[arg(long)]
    pub(crate) census_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Ward-wise census CSV export replacing the seeded Duduwa ward data
    #[arg(long)]
    pub(crate) census_csv: Option<PathBuf>,
}

pub(crate) async fn run_introduction_report(args: IntroductionArgs) -> Result<(), AppError> {
    let IntroductionArgs {
        municipality,
        locale,
        no_chart,
        as_of,
        census_csv,
    } = args;

    let config = AppConfig::load()?;
    let id = municipality_id(&municipality);

    let mut directory = CensusDirectory::seeded();
    let imported = match census_csv {
        Some(path) => {
            let wards = CensusCsvImporter::wards_from_path(path)?;
            directory.replace_wards(&id, wards)
        }
        None => false,
    };

    let locale = Locale::from_tag(&locale).ok_or_else(|| {
        AppError::from(SectionBuildError::from(ParamsError::UnknownLocale(locale)))
    })?;
    let params = SectionParams {
        locale,
        include_chart: !no_chart,
        as_of,
    };

    let manager = build_introduction_manager(directory, &config.sections);
    let content = manager.get(&id, params).await?;

    if imported {
        println!("Ward data source: local census CSV import");
    }
    render_section(&content);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { census_csv } = args;

    let config = AppConfig::load()?;
    let duduwa = municipality_id("duduwa");

    let mut directory = CensusDirectory::seeded();
    if let Some(path) = census_csv {
        let wards = CensusCsvImporter::wards_from_path(path)?;
        directory.replace_wards(&duduwa, wards);
    }

    println!("Municipal profile section demo");
    println!(
        "Seeded municipalities: {}",
        directory.municipality_names().join(", ")
    );

    let manager = build_introduction_manager(directory, &config.sections);

    println!("\n=== Introduction (en) ===");
    let english = manager.get(&duduwa, SectionParams::default()).await?;
    render_section(&english);

    println!("\n=== Introduction (ne) ===");
    let nepali = manager
        .get(
            &duduwa,
            SectionParams {
                locale: Locale::Nepali,
                ..SectionParams::default()
            },
        )
        .await?;
    render_section(&nepali);

    let cached = manager.get(&duduwa, SectionParams::default()).await?;
    println!("\nCache check");
    println!("- fingerprint: {}", english.fingerprint.short());
    println!(
        "- repeated build served from store: {}",
        cached == english
    );

    Ok(())
}

pub(crate) fn render_section(content: &SectionContent) {
    println!(
        "Section: {} | municipality: {} | fingerprint: {}",
        content.section.label(),
        content.municipality,
        content.fingerprint.short()
    );

    for block in &content.blocks {
        match block {
            ContentBlock::Paragraph { text } => {
                println!("\n{text}");
            }
            ContentBlock::Table {
                title,
                headers,
                rows,
            } => {
                println!("\n{title}");
                println!("  {}", headers.join(" | "));
                for row in rows {
                    println!("  {}", row.join(" | "));
                }
            }
            ContentBlock::Chart { kind, title, series } => {
                println!("\n{title} ({kind:?} chart)");
                for point in series {
                    println!("  {}: {}", point.label, point.value);
                }
            }
        }
    }

    if !content.warnings.is_empty() {
        println!("\nData quality warnings");
        for warning in &content.warnings {
            println!("- {}", warning.detail());
        }
    }
}
