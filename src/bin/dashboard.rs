use anyhow::Result;
use clap::Parser;
use macrodash::DashboardOptions;
use macrodash::core::log::init_logging;

/// Explore the stored macroeconomic indicators for one country
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Country to display, as listed by --list-countries
    #[arg(long)]
    country: Option<String>,

    /// Number of trailing years for the average GDP growth
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    window: Option<u32>,

    /// Print the countries available in the table and exit
    #[arg(long)]
    list_countries: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = DashboardOptions {
        country: cli.country,
        growth_window: cli.window.map(|w| w as usize),
        list_countries: cli.list_countries,
    };

    let result = macrodash::run_dashboard(cli.config_path.as_deref(), &options);
    if let Err(e) = &result {
        tracing::error!(error = %e, "Dashboard failed");
    }
    result
}
