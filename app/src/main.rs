use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use inventory_app::logging::init_logging;
use inventory_app::state::FilterInputs;
use inventory_app::{
    spawn_connectivity_monitor, ApiClient, AppConfig, UiState, UreqTransport, ViewController,
};
use inventory_core::PageItem;
use tracing::info;

#[derive(Parser)]
#[command(name = "inventory-app")]
#[command(about = "Terminal front end for the inventory API")]
struct Cli {
    /// Overrides INVENTORY_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one page of the product table.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<String>,
        #[arg(long)]
        max_price: Option<String>,
        /// `true` for in stock, `false` for out of stock.
        #[arg(long)]
        available: Option<String>,
    },
    /// Products whose name or description contains the text.
    Search { text: String },
    /// Inventory totals.
    Stats,
    /// Write every product to a CSV file.
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    info!(api_url = %config.api_url, "starting inventory console");

    let api = ApiClient::from_config(&config, UreqTransport::new(config.timeout));
    let controller = ViewController::new(api, &config);
    if !controller.initialize().await {
        print_toasts(&controller.snapshot());
        bail!("inventory API at {} is unreachable", config.api_url);
    }

    let monitor = spawn_connectivity_monitor(controller.clone(), config.monitor_interval);
    let result = run(cli.command, &controller).await;
    monitor.abort();
    result
}

async fn run(command: Command, controller: &ViewController<UreqTransport>) -> Result<()> {
    match command {
        Command::List {
            page,
            category,
            min_price,
            max_price,
            available,
        } => {
            let has_filters = category.is_some()
                || min_price.is_some()
                || max_price.is_some()
                || available.is_some();
            if has_filters {
                controller.set_filter_inputs(FilterInputs {
                    category: category.unwrap_or_default(),
                    price_min: min_price.unwrap_or_default(),
                    price_max: max_price.unwrap_or_default(),
                    availability: available.unwrap_or_default(),
                });
            }
            if page != 1 || has_filters {
                controller.change_page(page).await;
            }
            print_table(&controller.snapshot());
        }
        Command::Search { text } => {
            controller.search(&text).await;
            print_table(&controller.snapshot());
        }
        Command::Stats => match controller.show_statistics().await {
            Some(stats) => {
                println!("{}", stats.summary());
                println!(
                    "Categories: {} | Average price: ${:.2}",
                    stats.category_count, stats.average_price
                );
            }
            None => bail!("could not compute statistics"),
        },
        Command::Export { output } => {
            let Some(export) = controller.export_csv().await else {
                print_toasts(&controller.snapshot());
                bail!("export failed");
            };
            let path = output.unwrap_or_else(|| PathBuf::from(&export.file_name));
            std::fs::write(&path, &export.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn print_table(state: &UiState) {
    if state.table.is_empty() {
        println!("No products found");
        print_toasts(state);
        return;
    }
    println!(
        "{:<26} {:<30} {:>10} {:>6}  {:<14} {}",
        "ID", "Name", "Price", "Stock", "Category", "Status"
    );
    for row in &state.table.rows {
        println!(
            "{:<26} {:<30} {:>10} {:>6}  {:<14} {}",
            row.id,
            row.name,
            row.price,
            row.stock,
            row.category,
            row.status.label()
        );
    }
    if let Some(summary) = &state.table.summary {
        println!("{summary}");
    }
    if let Some(pager) = &state.table.pagination {
        let items: Vec<String> = pager
            .items
            .iter()
            .map(|item| match item {
                PageItem::Page { number, current: true } => format!("[{number}]"),
                PageItem::Page { number, .. } => number.to_string(),
                PageItem::Ellipsis => "...".to_string(),
            })
            .collect();
        println!("Pages: {}", items.join(" "));
    }
    print_toasts(state);
}

fn print_toasts(state: &UiState) {
    for toast in state.toasts.iter() {
        eprintln!("{}: {}", toast.level.title(), toast.message);
    }
}
