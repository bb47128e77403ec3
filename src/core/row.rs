use super::indicator::Indicator;
use serde::{Deserialize, Serialize};

/// One denormalized record per (country, year). Field order is the table column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub country: String,
    pub year: i32,
    pub population: Option<f64>,
    pub gdp_per_capita_usd: Option<f64>,
    pub gdp_growth_pct: Option<f64>,
    pub unemployment_pct: Option<f64>,
    pub labor_force_total: Option<f64>,
}

impl IndicatorRow {
    /// A row with every indicator missing.
    pub fn empty(country: &str, year: i32) -> Self {
        Self {
            country: country.to_string(),
            year,
            population: None,
            gdp_per_capita_usd: None,
            gdp_growth_pct: None,
            unemployment_pct: None,
            labor_force_total: None,
        }
    }

    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Population => self.population,
            Indicator::GdpPerCapitaUsd => self.gdp_per_capita_usd,
            Indicator::GdpGrowthPct => self.gdp_growth_pct,
            Indicator::UnemploymentPct => self.unemployment_pct,
            Indicator::LaborForceTotal => self.labor_force_total,
        }
    }
}

/// An [`IndicatorRow`] plus variations against the preceding row of the same country.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub row: IndicatorRow,
    pub pop_abs_var: Option<f64>,
    pub pop_pct_var: Option<f64>,
    pub gdp_pc_abs_var: Option<f64>,
    pub gdp_pc_pct_var: Option<f64>,
}

impl EnrichedRow {
    pub fn country(&self) -> &str {
        &self.row.country
    }

    pub fn year(&self) -> i32 {
        self.row.year
    }
}
