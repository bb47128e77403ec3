//! Single-country dashboard model built from enriched rows.
use super::enrich::average_growth;
use super::row::EnrichedRow;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("The indicator table is empty; run a refresh first")]
    EmptyTable,
    #[error("No data for country '{country}'. Available: {}", .available.join(", "))]
    UnknownCountry {
        country: String,
        available: Vec<String>,
    },
}

/// Headline figures for the most recent year.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestKpis {
    pub year: i32,
    pub pop_abs_var: Option<f64>,
    pub pop_pct_var: Option<f64>,
    pub gdp_pc_abs_var: Option<f64>,
    pub gdp_pc_pct_var: Option<f64>,
    pub unemployment_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrowthPoint {
    pub year: i32,
    pub gdp_growth_pct: Option<f64>,
    pub gdp_pc_pct_var: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnemploymentPoint {
    pub year: i32,
    pub unemployment_pct: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CountryDashboard {
    pub country: String,
    pub latest: LatestKpis,
    pub average_growth: Option<f64>,
    pub growth_window: usize,
    pub growth_series: Vec<GrowthPoint>,
    pub unemployment_series: Vec<UnemploymentPoint>,
    /// Every row for the country, ordered by year.
    pub rows: Vec<EnrichedRow>,
}

/// Distinct countries present in the table, sorted. This is the country selector.
pub fn available_countries(rows: &[EnrichedRow]) -> Vec<String> {
    rows.iter()
        .map(|row| row.country().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl CountryDashboard {
    pub fn build(
        rows: &[EnrichedRow],
        country: &str,
        growth_window: usize,
    ) -> Result<Self, DashboardError> {
        let mut country_rows: Vec<EnrichedRow> = rows
            .iter()
            .filter(|row| row.country() == country)
            .cloned()
            .collect();

        if country_rows.is_empty() {
            if rows.is_empty() {
                return Err(DashboardError::EmptyTable);
            }
            return Err(DashboardError::UnknownCountry {
                country: country.to_string(),
                available: available_countries(rows),
            });
        }
        country_rows.sort_by_key(|row| row.year());

        let Some(latest) = country_rows.last() else {
            return Err(DashboardError::EmptyTable);
        };
        let latest = LatestKpis {
            year: latest.year(),
            pop_abs_var: latest.pop_abs_var,
            pop_pct_var: latest.pop_pct_var,
            gdp_pc_abs_var: latest.gdp_pc_abs_var,
            gdp_pc_pct_var: latest.gdp_pc_pct_var,
            unemployment_pct: latest.row.unemployment_pct,
        };

        let average_growth = average_growth(
            country_rows.iter().map(|row| &row.row),
            country,
            growth_window,
        );

        let growth_series = country_rows
            .iter()
            .map(|row| GrowthPoint {
                year: row.year(),
                gdp_growth_pct: row.row.gdp_growth_pct,
                gdp_pc_pct_var: row.gdp_pc_pct_var,
            })
            .collect();
        let unemployment_series = country_rows
            .iter()
            .map(|row| UnemploymentPoint {
                year: row.year(),
                unemployment_pct: row.row.unemployment_pct,
            })
            .collect();

        Ok(Self {
            country: country.to_string(),
            latest,
            average_growth,
            growth_window,
            growth_series,
            unemployment_series,
            rows: country_rows,
        })
    }
}
