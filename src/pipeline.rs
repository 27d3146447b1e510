//! The growth and people pipelines, end to end.
//!
//! Each run opens the library once, reads it, aggregates, prints a summary
//! to `out` and writes its CSV and charts into the output directory. The
//! connection is owned by the run and released on every return path.

use std::io::Write;
use std::path::PathBuf;

use crate::aggregate::{
    date_appearances, date_assets, monthly_growth, people_timeline, rank_people, top_n,
};
use crate::anonymize::NameMasker;
use crate::chart;
use crate::config::Config;
use crate::db::{LibraryDb, Person, PersonAppearance};
use crate::error::Result;
use crate::export;
use crate::report;

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// The queries returned nothing usable; no files were written.
    NoData,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Rows that made it into aggregation.
    pub rows: usize,
    /// Rows dropped for an unusable date or size.
    pub dropped: usize,
    /// Files written, in the order they were produced.
    pub artifacts: Vec<PathBuf>,
}

/// Storage growth by month.
pub fn run_growth(config: &Config, out: &mut dyn Write) -> Result<RunOutcome> {
    let db = LibraryDb::open(&config.library.db_path)?;
    let outcome = growth_report(&db, config, out)?;
    db.close()?;
    Ok(outcome)
}

/// People ranking and appearance timeline.
pub fn run_people(config: &Config, out: &mut dyn Write) -> Result<RunOutcome> {
    let db = LibraryDb::open(&config.library.db_path)?;
    let outcome = people_report(&db, config, out)?;
    db.close()?;
    Ok(outcome)
}

pub fn growth_report(db: &LibraryDb, config: &Config, out: &mut dyn Write) -> Result<RunOutcome> {
    writeln!(out, "Fetching data from Photos Library database...")?;
    let assets = db.media_assets()?;

    let sample: Vec<String> = assets.iter().take(5).map(|a| a.added_date.to_string()).collect();
    tracing::debug!("Sample added_date values: [{}]", sample.join(", "));

    let dated = date_assets(assets);
    if dated.dropped > 0 {
        tracing::debug!("Dropped {} asset rows with an invalid date or size", dated.dropped);
    }
    if dated.is_empty() {
        writeln!(out, "No data found. Please check if the database path is correct.")?;
        return Ok(RunOutcome::NoData);
    }

    writeln!(out, "Found {} media items in the library.", dated.rows.len())?;
    if dated.dropped > 0 {
        writeln!(
            out,
            "Skipped {} items with an invalid added date or size.",
            dated.dropped
        )?;
    }

    let buckets = monthly_growth(&dated.rows);
    report::write_growth_summary(out, &buckets, config.growth.top_months)?;

    let mut summary = RunSummary {
        rows: dated.rows.len(),
        dropped: dated.dropped,
        artifacts: Vec::new(),
    };

    std::fs::create_dir_all(&config.output.dir)?;

    let csv_path = config.output.dir.join(export::GROWTH_CSV);
    export::export_growth_csv(&buckets, &csv_path)?;
    writeln!(out, "Data exported to {}", csv_path.display())?;
    summary.artifacts.push(csv_path);

    if config.output.charts {
        let png_path = config.output.dir.join(chart::GROWTH_PNG);
        chart::render_growth(&buckets, &png_path)?;
        writeln!(out, "Plot saved as {}", png_path.display())?;
        show(config, &png_path);
        summary.artifacts.push(png_path);
    }

    Ok(RunOutcome::Completed(summary))
}

pub fn people_report(db: &LibraryDb, config: &Config, out: &mut dyn Write) -> Result<RunOutcome> {
    let masker = NameMasker::new(config.people.anonymize);

    writeln!(out, "Fetching people data from Photos Library database...")?;
    let mut people = db.people()?;
    if people.is_empty() {
        writeln!(out, "No people data found. Please check if the database path is correct.")?;
        return Ok(RunOutcome::NoData);
    }

    mask_people(&mut people, masker);
    let people = rank_people(people);
    writeln!(out, "Found {} people in the library.", people.len())?;

    report::write_people_summary(out, &people, config.people.top_people)?;

    let mut summary = RunSummary {
        rows: people.len(),
        ..Default::default()
    };

    std::fs::create_dir_all(&config.output.dir)?;

    let csv_path = config.output.dir.join(export::PEOPLE_CSV);
    export::export_people_csv(&people, &csv_path)?;
    writeln!(out, "Data exported to {}", csv_path.display())?;
    summary.artifacts.push(csv_path);

    if config.output.charts {
        let png_path = config.output.dir.join(chart::PEOPLE_COUNT_PNG);
        chart::render_people_count(top_n(&people, config.people.top_people), &png_path)?;
        writeln!(out, "Plot saved as {}", png_path.display())?;
        show(config, &png_path);
        summary.artifacts.push(png_path);
    }

    writeln!(out)?;
    writeln!(out, "Fetching timeline data for people...")?;
    let mut appearances = db.person_appearances()?;
    mask_appearances(&mut appearances, masker);

    let dated = date_appearances(appearances);
    summary.dropped = dated.dropped;
    if dated.dropped > 0 {
        writeln!(
            out,
            "Skipped {} appearances with an invalid added date.",
            dated.dropped
        )?;
    }

    let timeline = people_timeline(&dated.rows, config.people.timeline_people);
    if timeline.is_empty() {
        writeln!(out, "No timeline data found.")?;
    } else if config.output.charts {
        let png_path = config.output.dir.join(chart::PEOPLE_TIMELINE_PNG);
        chart::render_people_timeline(&timeline, &png_path)?;
        writeln!(out, "Plot saved as {}", png_path.display())?;
        show(config, &png_path);
        summary.artifacts.push(png_path);
    }

    Ok(RunOutcome::Completed(summary))
}

/// Swap display names for pseudonyms, keeping the real name in memory.
fn mask_people(people: &mut [Person], masker: NameMasker) {
    if !masker.is_enabled() {
        return;
    }
    for person in people {
        let pseudonym = masker.mask(&person.display_name);
        person.original_name = Some(std::mem::replace(&mut person.display_name, pseudonym));
    }
}

fn mask_appearances(appearances: &mut [PersonAppearance], masker: NameMasker) {
    if !masker.is_enabled() {
        return;
    }
    for appearance in appearances {
        appearance.person_name = masker.mask(&appearance.person_name);
    }
}

fn show(config: &Config, path: &std::path::Path) {
    if config.output.display {
        chart::display_chart(path, config.output.viewer.as_deref());
    }
}
