use super::ui;
use crate::core::{
    CountryDashboard, GapPolicy, Indicator, TableStore,
    dashboard::{GrowthPoint, UnemploymentPoint, available_countries},
    enrich::enrich,
};
use anyhow::Result;
use chrono::{DateTime, Local};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::debug;

const BAR_WIDTH: usize = 40;

/// What the dashboard session should show.
#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    /// Country to display; the first available one when unset.
    pub country: Option<String>,
    /// Overrides the configured trailing window for average growth.
    pub growth_window: Option<usize>,
    /// Only print the country selector values.
    pub list_countries: bool,
}

pub fn run(
    store: &TableStore,
    options: &DashboardOptions,
    default_window: usize,
    policy: GapPolicy,
) -> Result<()> {
    let rows = store.load()?;
    let enriched = enrich(&rows, policy);
    let countries = available_countries(&enriched);
    debug!(rows = enriched.len(), ?countries, "Table enriched");

    if options.list_countries {
        for country in &countries {
            println!("{country}");
        }
        return Ok(());
    }

    // A missing or empty table is not an error, whichever country was asked for.
    if countries.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!(
                    "No indicator data found at {}. Run macrodash-refresh first.",
                    store.path().display()
                ),
                ui::StyleType::Warning
            )
        );
        return Ok(());
    }

    let selected = match &options.country {
        Some(country) => country.as_str(),
        None => countries[0].as_str(),
    };

    let window = options.growth_window.unwrap_or(default_window);
    let dashboard = CountryDashboard::build(&enriched, selected, window)?;
    display(&dashboard, store.last_modified());
    Ok(())
}

fn display(dashboard: &CountryDashboard, refreshed_at: Option<DateTime<Local>>) {
    println!(
        "\n{}",
        ui::style_text(
            &format!("Economic Analysis: {}", dashboard.country),
            ui::StyleType::Title
        )
    );
    if let Some(refreshed_at) = refreshed_at {
        println!(
            "{}",
            ui::style_text(
                &format!("Data refreshed {}", refreshed_at.format("%Y-%m-%d %H:%M")),
                ui::StyleType::Subtle
            )
        );
    }

    println!(
        "\n{}",
        ui::style_text(
            &format!("Key Performance Indicators ({})", dashboard.latest.year),
            ui::StyleType::Label
        )
    );
    println!("{}", kpi_table(dashboard));

    println!("\n{}", headline_lines(dashboard).join("\n"));

    ui::print_separator();
    println!(
        "{}",
        ui::style_text("Historical Trends: GDP", ui::StyleType::Label)
    );
    println!("{}", growth_table(&dashboard.growth_series));

    println!(
        "\n{}",
        ui::style_text("Historical Trends: Labor Market", ui::StyleType::Label)
    );
    println!("{}", unemployment_chart(&dashboard.unemployment_series));

    ui::print_separator();
    println!("{}", ui::style_text("Raw Data View", ui::StyleType::Label));
    println!("{}", raw_data_table(dashboard));
}

fn kpi_table(dashboard: &CountryDashboard) -> Table {
    let kpis = &dashboard.latest;
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pop. Variation (Abs)"),
        ui::header_cell("Pop. Variation (%)"),
        ui::header_cell("GDP pc Var (Abs)"),
        ui::header_cell("GDP pc Var (%)"),
    ]);
    table.add_row(vec![
        ui::change_cell(kpis.pop_abs_var, |v| ui::format_thousands(v, 0)),
        ui::change_cell(kpis.pop_pct_var, ui::format_pct),
        ui::change_cell(kpis.gdp_pc_abs_var, ui::format_usd),
        ui::change_cell(kpis.gdp_pc_pct_var, ui::format_pct),
    ]);
    table
}

fn headline_lines(dashboard: &CountryDashboard) -> Vec<String> {
    let value_or_na = |value: Option<f64>| {
        value.map_or(ui::style_text("N/A", ui::StyleType::Subtle), |v| {
            ui::style_text(&ui::format_pct(v), ui::StyleType::Value)
        })
    };
    vec![
        format!(
            "{} {}",
            ui::style_text(
                &format!(
                    "Avg. GDP Growth (Last {} years):",
                    dashboard.growth_window
                ),
                ui::StyleType::Label
            ),
            value_or_na(dashboard.average_growth)
        ),
        format!(
            "{} {}",
            ui::style_text("Current Unemployment Rate:", ui::StyleType::Label),
            value_or_na(dashboard.latest.unemployment_pct)
        ),
    ]
}

fn growth_table(series: &[GrowthPoint]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell("GDP Growth (%)"),
        ui::header_cell("GDP pc Var (%)"),
    ]);
    for point in series {
        table.add_row(vec![
            Cell::new(point.year),
            ui::change_cell(point.gdp_growth_pct, ui::format_pct),
            ui::change_cell(point.gdp_pc_pct_var, ui::format_pct),
        ]);
    }
    table
}

fn unemployment_chart(series: &[UnemploymentPoint]) -> Table {
    let max = series
        .iter()
        .filter_map(|p| p.unemployment_pct)
        .fold(0.0_f64, f64::max);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell("Unemployment (%)"),
        ui::header_cell(""),
    ]);
    for point in series {
        table.add_row(vec![
            Cell::new(point.year),
            ui::format_optional_cell(point.unemployment_pct, ui::format_pct),
            Cell::new(
                point
                    .unemployment_pct
                    .map(|v| ui::bar(v, max, BAR_WIDTH))
                    .unwrap_or_default(),
            )
            .fg(comfy_table::Color::Blue),
        ]);
    }
    table
}

fn raw_data_table(dashboard: &CountryDashboard) -> Table {
    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Year")];
    header.extend(Indicator::ALL.iter().map(|i| ui::header_cell(i.column())));
    header.extend(
        ["pop_abs_var", "pop_pct_var", "gdp_pc_abs_var", "gdp_pc_pct_var"]
            .into_iter()
            .map(ui::header_cell),
    );
    table.set_header(header);

    let plain = |v: f64| ui::format_thousands(v, 2);
    for row in &dashboard.rows {
        let mut cells = vec![Cell::new(row.year()).set_alignment(CellAlignment::Left)];
        cells.extend(
            Indicator::ALL
                .iter()
                .map(|i| ui::format_optional_cell(row.row.value(*i), plain)),
        );
        cells.push(ui::format_optional_cell(row.pop_abs_var, plain));
        cells.push(ui::format_optional_cell(row.pop_pct_var, plain));
        cells.push(ui::format_optional_cell(row.gdp_pc_abs_var, plain));
        cells.push(ui::format_optional_cell(row.gdp_pc_pct_var, plain));
        table.add_row(cells);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IndicatorRow;
    use tempfile::tempdir;

    fn render(mut table: Table) -> String {
        table.force_no_tty();
        table.to_string()
    }

    fn dashboard() -> CountryDashboard {
        let rows = vec![
            IndicatorRow {
                population: Some(10_000.0),
                gdp_per_capita_usd: Some(20_000.0),
                gdp_growth_pct: Some(1.5),
                unemployment_pct: Some(8.0),
                ..IndicatorRow::empty("Portugal", 2020)
            },
            IndicatorRow {
                population: Some(10_500.0),
                gdp_per_capita_usd: Some(21_000.0),
                unemployment_pct: Some(4.0),
                ..IndicatorRow::empty("Portugal", 2021)
            },
        ];
        let enriched = enrich(&rows, GapPolicy::Adjacent);
        CountryDashboard::build(&enriched, "Portugal", 25).unwrap()
    }

    #[test]
    fn test_kpi_table_formats_variations() {
        let rendered = render(kpi_table(&dashboard()));

        assert!(rendered.contains("500"));
        assert!(rendered.contains("5.00%"));
        assert!(rendered.contains("$1,000.00"));
    }

    #[test]
    fn test_missing_values_render_as_na_not_zero() {
        let rendered = render(growth_table(&dashboard().growth_series));

        // 2020 has no predecessor, 2021 has no growth figure
        assert_eq!(rendered.matches("N/A").count(), 2);
        assert!(rendered.contains("1.50%"));
    }

    #[test]
    fn test_headline_lines_show_average_and_unemployment() {
        let lines = headline_lines(&dashboard());

        assert!(lines[0].contains("Last 25 years"));
        assert!(lines[0].contains("1.50%"));
        assert!(lines[1].contains("4.00%"));
    }

    #[test]
    fn test_unemployment_chart_scales_bars_to_maximum() {
        let rendered = render(unemployment_chart(&dashboard().unemployment_series));

        assert!(rendered.contains(&"█".repeat(BAR_WIDTH)));
        assert!(rendered.contains(&"█".repeat(BAR_WIDTH / 2)));
    }

    #[test]
    fn test_raw_data_table_lists_every_column() {
        let rendered = render(raw_data_table(&dashboard()));

        for indicator in Indicator::ALL {
            assert!(rendered.contains(indicator.column()));
        }
        assert!(rendered.contains("10,500.00"));
    }

    #[test]
    fn test_run_handles_missing_table() {
        let dir = tempdir().unwrap();
        let store = TableStore::new(dir.path().join("absent.csv"));

        let result = run(
            &store,
            &DashboardOptions::default(),
            25,
            GapPolicy::Adjacent,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_with_country_on_missing_or_empty_table_shows_hint() {
        let dir = tempdir().unwrap();
        let options = DashboardOptions {
            country: Some("Spain".to_string()),
            ..DashboardOptions::default()
        };

        let missing = TableStore::new(dir.path().join("absent.csv"));
        let result = run(&missing, &options, 25, GapPolicy::Adjacent);
        assert!(result.is_ok(), "missing table gave {:?}", result.err());

        let empty = TableStore::new(dir.path().join("empty.csv"));
        empty.write(&[]).unwrap();
        let result = run(&empty, &options, 25, GapPolicy::Adjacent);
        assert!(result.is_ok(), "empty table gave {:?}", result.err());
    }

    #[test]
    fn test_run_rejects_unknown_country() {
        let dir = tempdir().unwrap();
        let store = TableStore::new(dir.path().join("table.csv"));
        store
            .write(&[IndicatorRow::empty("Spain", 2020)])
            .unwrap();

        let options = DashboardOptions {
            country: Some("Atlantis".to_string()),
            ..DashboardOptions::default()
        };
        let err = run(&store, &options, 25, GapPolicy::Adjacent).unwrap_err();
        assert!(err.to_string().contains("Atlantis"));
    }
}
