//! Period-over-period variation metrics and trailing statistics.
//!
//! All computations run inside a single country's year-ordered sequence and
//! never read across country boundaries. Missing operands, a missing or zero
//! base for a percentage, and non-finite results all yield `None`.
use super::row::{EnrichedRow, IndicatorRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the predecessor of a row is chosen when the year sequence has holes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// The preceding row in year order, however many years back it is.
    #[default]
    Adjacent,
    /// Only the row for `year - 1`; variations are undefined after a gap.
    Contiguous,
}

/// Default number of trailing years used by [`average_growth`].
pub const DEFAULT_GROWTH_WINDOW: usize = 25;

pub fn abs_change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let change = current? - previous?;
    change.is_finite().then_some(change)
}

pub fn pct_change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let previous = previous?;
    if previous == 0.0 {
        return None;
    }
    let change = (current? - previous) / previous * 100.0;
    change.is_finite().then_some(change)
}

fn enrich_one(row: &IndicatorRow, prev: Option<&IndicatorRow>) -> EnrichedRow {
    let Some(prev) = prev else {
        return EnrichedRow {
            row: row.clone(),
            pop_abs_var: None,
            pop_pct_var: None,
            gdp_pc_abs_var: None,
            gdp_pc_pct_var: None,
        };
    };

    EnrichedRow {
        row: row.clone(),
        pop_abs_var: abs_change(row.population, prev.population),
        pop_pct_var: pct_change(row.population, prev.population),
        gdp_pc_abs_var: abs_change(row.gdp_per_capita_usd, prev.gdp_per_capita_usd),
        gdp_pc_pct_var: pct_change(row.gdp_per_capita_usd, prev.gdp_per_capita_usd),
    }
}

/// Groups rows by country, orders each group by year and derives variations.
///
/// The input order is irrelevant; output is ordered by (country, year).
pub fn enrich(rows: &[IndicatorRow], policy: GapPolicy) -> Vec<EnrichedRow> {
    let mut groups: BTreeMap<&str, Vec<&IndicatorRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.country.as_str()).or_default().push(row);
    }

    let mut enriched = Vec::with_capacity(rows.len());
    for (_, mut group) in groups {
        group.sort_by_key(|row| row.year);

        let mut prev: Option<&IndicatorRow> = None;
        for row in group {
            let predecessor = match policy {
                GapPolicy::Adjacent => prev,
                GapPolicy::Contiguous => prev.filter(|p| p.year.checked_add(1) == Some(row.year)),
            };
            enriched.push(enrich_one(row, predecessor));
            prev = Some(row);
        }
    }
    enriched
}

/// Mean `gdp_growth_pct` over the last `window` rows (by year) of `country`.
///
/// Missing values inside the window are ignored. Returns `None` when the
/// window is empty or holds no values. A window longer than the history
/// uses every row.
pub fn average_growth<'a, I>(rows: I, country: &str, window: usize) -> Option<f64>
where
    I: IntoIterator<Item = &'a IndicatorRow>,
{
    let mut history: Vec<&IndicatorRow> = rows
        .into_iter()
        .filter(|row| row.country == country)
        .collect();
    history.sort_by_key(|row| row.year);

    let start = history.len().saturating_sub(window);
    let values: Vec<f64> = history[start..]
        .iter()
        .filter_map(|row| row.gdp_growth_pct)
        .collect();

    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
