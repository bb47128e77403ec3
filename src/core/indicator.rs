//! Indicator catalogue and raw observation type

use serde::{Deserialize, Serialize};

/// The macroeconomic measures tracked per (country, year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Indicator {
    Population,
    GdpPerCapitaUsd,
    GdpGrowthPct,
    UnemploymentPct,
    LaborForceTotal,
}

impl Indicator {
    /// All indicators, in table column order.
    pub const ALL: [Indicator; 5] = [
        Indicator::Population,
        Indicator::GdpPerCapitaUsd,
        Indicator::GdpGrowthPct,
        Indicator::UnemploymentPct,
        Indicator::LaborForceTotal,
    ];

    /// Stable code used by the World Bank API.
    pub fn code(&self) -> &'static str {
        match self {
            Indicator::Population => "SP.POP.TOTL",
            Indicator::GdpPerCapitaUsd => "NY.GDP.PCAP.CD",
            Indicator::GdpGrowthPct => "NY.GDP.MKTP.KD.ZG",
            Indicator::UnemploymentPct => "SL.UEM.TOTL.ZS",
            Indicator::LaborForceTotal => "SL.TLF.TOTL.IN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.code() == code)
    }

    /// Column name in the persisted table.
    pub fn column(&self) -> &'static str {
        match self {
            Indicator::Population => "population",
            Indicator::GdpPerCapitaUsd => "gdp_per_capita_usd",
            Indicator::GdpGrowthPct => "gdp_growth_pct",
            Indicator::UnemploymentPct => "unemployment_pct",
            Indicator::LaborForceTotal => "labor_force_total",
        }
    }
}

/// Joins indicator codes with the separator the API expects for multi-value parameters.
pub fn join_codes(indicators: &[Indicator]) -> String {
    indicators
        .iter()
        .map(Indicator::code)
        .collect::<Vec<_>>()
        .join(";")
}

/// A single (country, year, indicator, value) fact as delivered by the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub indicator_id: String,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(country: &str, year: i32, indicator_id: &str, value: Option<f64>) -> Self {
        Self {
            country: country.to_string(),
            year,
            indicator_id: indicator_id.to_string(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup_round_trips_for_all_indicators() {
        for indicator in Indicator::ALL {
            assert_eq!(Indicator::from_code(indicator.code()), Some(indicator));
        }
    }

    #[test]
    fn test_unknown_code_is_none() {
        assert_eq!(Indicator::from_code("SP.URB.TOTL"), None);
        assert_eq!(Indicator::from_code(""), None);
    }

    #[test]
    fn test_join_codes_uses_semicolons() {
        assert_eq!(
            join_codes(&Indicator::ALL),
            "SP.POP.TOTL;NY.GDP.PCAP.CD;NY.GDP.MKTP.KD.ZG;SL.UEM.TOTL.ZS;SL.TLF.TOTL.IN"
        );
    }
}
