//! Folds raw observations into one row per (country, year).
use super::indicator::{Indicator, Observation};
use super::row::IndicatorRow;
use std::collections::BTreeMap;
use tracing::debug;

/// Composite key of the merged table. Ordering is (country, year) ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub country: String,
    pub year: i32,
}

/// Mutable accumulator for one key, frozen by [`RowBuilder::finish`].
#[derive(Debug, Default)]
struct RowBuilder {
    population: Option<f64>,
    gdp_per_capita_usd: Option<f64>,
    gdp_growth_pct: Option<f64>,
    unemployment_pct: Option<f64>,
    labor_force_total: Option<f64>,
}

impl RowBuilder {
    fn set(&mut self, indicator: Indicator, value: Option<f64>) {
        let slot = match indicator {
            Indicator::Population => &mut self.population,
            Indicator::GdpPerCapitaUsd => &mut self.gdp_per_capita_usd,
            Indicator::GdpGrowthPct => &mut self.gdp_growth_pct,
            Indicator::UnemploymentPct => &mut self.unemployment_pct,
            Indicator::LaborForceTotal => &mut self.labor_force_total,
        };
        *slot = value;
    }

    fn finish(self, key: RowKey) -> IndicatorRow {
        IndicatorRow {
            country: key.country,
            year: key.year,
            population: self.population,
            gdp_per_capita_usd: self.gdp_per_capita_usd,
            gdp_growth_pct: self.gdp_growth_pct,
            unemployment_pct: self.unemployment_pct,
            labor_force_total: self.labor_force_total,
        }
    }
}

/// Merges observations into rows sorted by (country, year).
///
/// Observations with an unknown indicator id are skipped. When the same
/// (country, year, indicator) appears more than once, the last one wins,
/// including when its value is missing.
pub fn merge<I>(observations: I) -> Vec<IndicatorRow>
where
    I: IntoIterator<Item = Observation>,
{
    let mut builders: BTreeMap<RowKey, RowBuilder> = BTreeMap::new();
    let mut skipped = 0usize;

    for observation in observations {
        let key = RowKey {
            country: observation.country,
            year: observation.year,
        };
        // A row exists for every key seen, even if its indicator is unknown.
        let builder = builders.entry(key).or_default();
        match Indicator::from_code(&observation.indicator_id) {
            Some(indicator) => builder.set(indicator, observation.value),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "Ignored observations with unrecognized indicator ids");
    }

    builders
        .into_iter()
        .map(|(key, builder)| builder.finish(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(country: &str, year: i32, code: &str, value: Option<f64>) -> Observation {
        Observation::new(country, year, code, value)
    }

    #[test]
    fn test_merge_combines_indicators_per_country_year() {
        let rows = merge(vec![
            obs("PRT", 2020, "SP.POP.TOTL", Some(10000.0)),
            obs("PRT", 2021, "SP.POP.TOTL", Some(10500.0)),
            obs("PRT", 2020, "NY.GDP.PCAP.CD", Some(20000.0)),
            obs("PRT", 2021, "NY.GDP.PCAP.CD", Some(21000.0)),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "PRT");
        assert_eq!(rows[0].year, 2020);
        assert_eq!(rows[0].population, Some(10000.0));
        assert_eq!(rows[0].gdp_per_capita_usd, Some(20000.0));
        assert_eq!(rows[0].gdp_growth_pct, None);
        assert_eq!(rows[0].unemployment_pct, None);
        assert_eq!(rows[0].labor_force_total, None);
        assert_eq!(rows[1].year, 2021);
        assert_eq!(rows[1].population, Some(10500.0));
        assert_eq!(rows[1].gdp_per_capita_usd, Some(21000.0));
    }

    #[test]
    fn test_merge_empty_input_is_empty() {
        assert!(merge(Vec::<Observation>::new()).is_empty());
    }

    #[test]
    fn test_merge_sorts_by_country_then_year() {
        let rows = merge(vec![
            obs("Spain", 2001, "SP.POP.TOTL", Some(2.0)),
            obs("Portugal", 2000, "SP.POP.TOTL", Some(3.0)),
            obs("Spain", 2000, "SP.POP.TOTL", Some(1.0)),
            obs("Portugal", 1999, "SP.POP.TOTL", Some(4.0)),
        ]);

        let keys: Vec<(&str, i32)> = rows.iter().map(|r| (r.country.as_str(), r.year)).collect();
        assert_eq!(
            keys,
            vec![
                ("Portugal", 1999),
                ("Portugal", 2000),
                ("Spain", 2000),
                ("Spain", 2001)
            ]
        );
    }

    #[test]
    fn test_merge_last_write_wins_for_same_key_and_indicator() {
        let rows = merge(vec![
            obs("PRT", 2020, "SL.UEM.TOTL.ZS", Some(7.0)),
            obs("PRT", 2020, "SL.UEM.TOTL.ZS", Some(6.8)),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unemployment_pct, Some(6.8));

        // A later null overwrites an earlier value.
        let rows = merge(vec![
            obs("PRT", 2020, "SL.UEM.TOTL.ZS", Some(7.0)),
            obs("PRT", 2020, "SL.UEM.TOTL.ZS", None),
        ]);
        assert_eq!(rows[0].unemployment_pct, None);
    }

    #[test]
    fn test_merge_is_order_independent_across_keys() {
        let forward = vec![
            obs("PRT", 2020, "SP.POP.TOTL", Some(1.0)),
            obs("ESP", 2020, "SP.POP.TOTL", Some(2.0)),
            obs("PRT", 2021, "NY.GDP.MKTP.KD.ZG", Some(3.0)),
            obs("ESP", 2021, "SL.TLF.TOTL.IN", Some(4.0)),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(merge(forward), merge(backward));
    }

    #[test]
    fn test_merge_ignores_unknown_indicator_ids() {
        let rows = merge(vec![
            obs("PRT", 2020, "SP.URB.TOTL", Some(99.0)),
            obs("PRT", 2020, "SL.TLF.TOTL.IN", Some(5000.0)),
        ]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].labor_force_total, Some(5000.0));
        assert_eq!(rows[0].population, None);
    }

    #[test]
    fn test_merge_keeps_null_observations_as_missing() {
        let rows = merge(vec![obs("ESP", 2024, "SL.UEM.TOTL.ZS", None)]);

        assert_eq!(rows, vec![IndicatorRow::empty("ESP", 2024)]);
    }
}
