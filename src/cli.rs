use clap::{Args, Parser, Subcommand};
use huizenzoeker::client::{Huizenzoeker, QueryParams, SearchQuery};
use huizenzoeker::config::AppConfig;
use huizenzoeker::error::AppError;
use huizenzoeker::filters::{FilterKey, FilterRegistry, FilterValue};
use huizenzoeker::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "huizenzoeker",
    about = "Search Dutch real-estate listings through the Huizenzoeker API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a listings search
    Search(SearchArgs),
    /// List the available search filters
    Filters,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Listing type: sale or rent
    #[arg(long = "type", default_value = "sale")]
    object_type: String,
    /// Ordering field, prefix with '-' for descending (e.g. -price)
    #[arg(long, allow_hyphen_values = true)]
    order_by: Option<String>,
    /// Filter argument as NAME[__OPERATION]=VALUE; lists are comma separated
    #[arg(long = "filter", value_parser = parse_filter_argument)]
    filters: Vec<(String, FilterValue)>,
    /// Print the request parameters instead of sending the request
    #[arg(long)]
    dry_run: bool,
}

fn parse_filter_argument(raw: &str) -> Result<(String, FilterValue), String> {
    let (argument, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let argument = argument.trim();
    if argument.is_empty() {
        return Err(format!("missing filter name in '{raw}'"));
    }
    Ok((argument.to_string(), FilterValue::parse_cli(value)))
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Search(args) => run_search(&config, args),
        Command::Filters => {
            render_filters();
            Ok(())
        }
    }
}

fn run_search(config: &AppConfig, args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs {
        object_type,
        order_by,
        filters,
        dry_run,
    } = args;

    let mut query = SearchQuery::new();
    if let Some(order_by) = order_by {
        query = query.order_by(order_by);
    }
    for (argument, value) in filters {
        query = query.filter(argument, value);
    }

    let client = Huizenzoeker::from_config(&config.client)?;
    if dry_run {
        let params = client.request_params(&object_type, &query)?;
        render_params(&params);
        return Ok(());
    }

    let entries = client.objects(&object_type, &query)?;
    info!(count = entries.len(), "search complete");
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn render_params(params: &QueryParams) {
    for (key, value) in params.iter() {
        let shown = if key == "apisleutel" {
            "<redacted>".to_string()
        } else {
            value.to_string()
        };
        println!("{key}={shown}");
    }
}

fn render_filters() {
    println!("Available filters");
    for filter in FilterRegistry::global().iter() {
        let keys = match filter.key() {
            FilterKey::Single(key) => key.to_string(),
            FilterKey::Range { low, high } => format!("{low}/{high}"),
        };
        let operations = filter
            .supported_operations()
            .iter()
            .map(|operation| operation.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("- {} -> {} ({})", filter.name(), keys, operations);
    }
}
