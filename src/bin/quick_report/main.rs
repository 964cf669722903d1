//! Quick report orchestrator - loads scraped items, builds the grouped report,
//! prints it and writes the requested exports

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use purchase_report::report::export::{export, ExportFormat};
use purchase_report::report::highlight::highlight;
use purchase_report::report::utils::export_file_name;
use purchase_report::report::{
    build_report, FilterMode, RawItem, Report, ReportOptions, ScrapedPage, SortField, UiOptions,
};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "quick-report", about = "Grouped purchase history report from scraped items")]
struct Cli {
    /// JSON file with a scraped page ({orders, filters}) or a bare item array
    input: PathBuf,

    /// Column to sort by (orderId, seller, purchaseDate, price, ...)
    #[arg(short, long, default_value = "")]
    sort_by: String,

    /// Reverse the sort order
    #[arg(short, long)]
    reverse: bool,

    /// Show only matching items (notShipped)
    #[arg(short, long, default_value = "")]
    filter: String,

    /// Export formats to write (json, csv, xml)
    #[arg(short, long)]
    export: Vec<String>,
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
struct Config {
    output_dir: PathBuf,
    ui_options_path: Option<PathBuf>,
}

impl Config {
    fn from_env() -> Result<Self> {
        Ok(Config {
            output_dir: env::var("REPORT_OUTPUT_DIR")
                .unwrap_or_else(|_| ".".to_string())
                .into(),

            ui_options_path: env::var("REPORT_UI_OPTIONS").ok().map(PathBuf::from),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let cli = Cli::parse();

    let ui = load_ui_options(config.ui_options_path.as_deref()).await;

    let sort_field: SortField = cli.sort_by.parse()?;
    let formats = cli
        .export
        .iter()
        .map(|f| f.parse::<ExportFormat>())
        .collect::<Result<Vec<_>, _>>()?;

    let options = ReportOptions {
        sort_field,
        reverse_order: cli.reverse,
        filter_mode: FilterMode::parse(&cli.filter),
        enable_grouping: ui.enable_grouping,
        today: Local::now().date_naive(),
    };

    // Step 1: Load scraped items
    info!("Step 1/4: Loading scraped items from {:?}", cli.input);
    let page = load_page(&cli.input).await?;
    info!("✓ Loaded {} items", page.orders.len());

    // Step 2: Normalize, filter, sort, group
    info!("Step 2/4: Building report...");
    let report = build_report(page.orders, &options);
    info!("✓ Report has {} groups", report.groups.len());

    if report.is_empty() {
        println!("No purchase history data found");
        return Ok(());
    }

    // Step 3: Print
    info!("Step 3/4: Printing report...");
    for filter in &page.filters {
        println!("{} : {}", filter.label, filter.content);
    }
    print_report(&report, &ui, &options);

    // Step 4: Exports
    info!("Step 4/4: Writing {} exports...", formats.len());
    let records: Vec<_> = report.records().cloned().collect();
    for format in formats {
        let body = export(&records, format, ui.separator(), Utc::now())?;
        let path = config
            .output_dir
            .join(export_file_name(format.extension(), options.today));

        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;
        info!("✓ Wrote {} ({})", path.display(), format.mime_type());
    }

    Ok(())
}

async fn load_ui_options(path: Option<&Path>) -> UiOptions {
    let Some(path) = path else {
        return UiOptions::default();
    };

    match tokio::fs::read_to_string(path).await {
        Ok(json) => UiOptions::from_json(&json),
        Err(e) => {
            warn!("Cannot read UI options {:?}: {}, using defaults", path, e);
            UiOptions::default()
        }
    }
}

/// Accepts a full page document or a bare array of items
async fn load_page(path: &Path) -> Result<ScrapedPage> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;

    if json.trim_start().starts_with('[') {
        let orders: Vec<RawItem> =
            serde_json::from_str(&json).context("Input is not an array of scraped items")?;
        return Ok(ScrapedPage {
            orders,
            filters: Vec::new(),
        });
    }

    serde_json::from_str(&json).context("Input is not a scraped page document")
}

fn print_report(report: &Report, ui: &UiOptions, options: &ReportOptions) {
    let mut index = 0;

    for group in &report.groups {
        for record in &group.records {
            index += 1;
            let marker = highlight(record, ui, options.today)
                .map(|h| format!(" [{}: {}]", h.class_name(), h.title(ui)))
                .unwrap_or_default();

            println!(
                "{:>4}  {:<20} {:<14} {:>5} {:>14} {:>3}  {:<12} {:<18} {:>5}  {}{}",
                index,
                record.seller.name,
                record.purchase_date,
                record.elapsed_days.map(|d| d.to_string()).unwrap_or_default(),
                record.price.text,
                record.quantity,
                record.ship_status,
                record.delivery_date,
                record.eta_days.map(|d| d.to_string()).unwrap_or_default(),
                record.specs,
                marker
            );
        }

        if let Some(subtotal) = &group.subtotal {
            println!("      {}: {}", subtotal.label, subtotal);
        }
    }

    if let Some(grand) = &report.grand_total {
        println!("      {}: {}", grand.label, grand);
    }
}
