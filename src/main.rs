use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use txview::*;

/// Percentiles charted when none are requested.
const DEFAULT_PERCENTILES: [f64; 3] = [0.5, 0.95, 0.99];

const USAGE: &str = "usage: txview <transaction-type> <from-ms> <to-ms> [transaction-name]";

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let transaction_type = args.get(1).ok_or_else(|| anyhow::anyhow!(USAGE))?;
    let from: i64 = args
        .get(2)
        .ok_or_else(|| anyhow::anyhow!(USAGE))?
        .parse()
        .map_err(|e| anyhow::anyhow!("from: {}", e))?;
    let to: i64 = args
        .get(3)
        .ok_or_else(|| anyhow::anyhow!(USAGE))?
        .parse()
        .map_err(|e| anyhow::anyhow!("to: {}", e))?;
    let transaction_name = args.get(4).cloned();

    let app_config = config::AppConfig::load()?;
    let source = source::FileSource::load(&app_config.source.path).await?;
    let service =
        service::TransactionViewService::new(source, app_config.charts, app_config.histogram);
    let query = models::TransactionQuery::new(transaction_type.as_str(), transaction_name, from, to)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transaction_type = %query.transaction_type,
        from,
        to,
        "building transaction views"
    );

    let overview = service.overview_view(&query)?;
    let percentiles = service.percentile_view(&query, &DEFAULT_PERCENTILES)?;
    let flame_graph = service.flame_graph_view(&query, &source::ProfileFilter::default())?;
    let queries = service.queries_view(&query)?;

    let out = serde_json::json!({
        "overview": overview,
        "percentiles": percentiles,
        "flameGraph": flame_graph,
        "queries": queries,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
