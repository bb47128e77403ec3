use super::ui;
use crate::core::{
    FetchRequest, Indicator, IndicatorRow, IndicatorSource, TableStore, YearRange,
    config::AppConfig, merge::merge,
};
use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Per-country overview of a merged table.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySummary {
    pub country: String,
    pub rows: usize,
    pub first_year: i32,
    pub last_year: i32,
}

pub fn summarize(rows: &[IndicatorRow]) -> Vec<CountrySummary> {
    let mut by_country: BTreeMap<&str, CountrySummary> = BTreeMap::new();
    for row in rows {
        by_country
            .entry(row.country.as_str())
            .and_modify(|s| {
                s.rows += 1;
                s.first_year = s.first_year.min(row.year);
                s.last_year = s.last_year.max(row.year);
            })
            .or_insert_with(|| CountrySummary {
                country: row.country.clone(),
                rows: 1,
                first_year: row.year,
                last_year: row.year,
            });
    }
    by_country.into_values().collect()
}

/// Fetches, merges and persists the indicator table. Nothing is written if the fetch fails.
pub async fn run(
    config: &AppConfig,
    source: &dyn IndicatorSource,
    store: &TableStore,
) -> Result<Vec<IndicatorRow>> {
    let request = FetchRequest {
        countries: config.countries.clone(),
        indicators: Indicator::ALL.to_vec(),
        years: YearRange {
            start: config.start_year,
            end: config.end_year,
        },
    };

    let pb = ui::new_spinner(&format!(
        "Fetching {} indicators for {} ({}-{})",
        request.indicators.len(),
        request.countries.join(", "),
        request.years.start,
        request.years.end
    ));
    let fetched = source.fetch(&request).await;
    pb.finish_and_clear();
    let observations = fetched.context("Failed to fetch indicators")?;

    if observations.is_empty() {
        warn!("No observations returned, writing an empty table");
        println!(
            "{}",
            ui::style_text(
                "Warning: the API returned no data for this request",
                ui::StyleType::Warning
            )
        );
    }

    let rows = merge(observations);
    store.write(&rows)?;
    info!(rows = rows.len(), path = %store.path().display(), "Refresh complete");

    display_summary(&rows, store);
    Ok(rows)
}

fn display_summary(rows: &[IndicatorRow], store: &TableStore) {
    let summaries = summarize(rows);
    if !summaries.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Country"),
            ui::header_cell("Rows"),
            ui::header_cell("First Year"),
            ui::header_cell("Last Year"),
        ]);
        for summary in &summaries {
            table.add_row(vec![
                Cell::new(&summary.country),
                Cell::new(summary.rows).set_alignment(CellAlignment::Right),
                Cell::new(summary.first_year).set_alignment(CellAlignment::Right),
                Cell::new(summary.last_year).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }

    println!(
        "{} {} rows to {}",
        ui::style_text("Wrote", ui::StyleType::Label),
        ui::style_text(&rows.len().to_string(), ui::StyleType::Value),
        store.path().display()
    );
}
