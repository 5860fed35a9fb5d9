// League report entry point.
//
// Startup sequence:
// 1. Parse command-line flags
// 2. Initialize tracing (log to file, stdout carries the report)
// 3. Load config
// 4. Build the Sleeper client, optionally wrapped in the snapshot cache
//    (`--clear-cache` drops the league's snapshots first)
// 5. Build and print the report

use leaguepulse_app::config;
use leaguepulse_app::db::{Cache, CachedSource};
use leaguepulse_app::report::{self, OutputFormat};
use leaguepulse_app::source::sleeper::SleeperClient;
use leaguepulse_app::source::LeagueSource;

use anyhow::{bail, Context};
use tracing::info;

const USAGE: &str =
    "usage: leaguepulse [--week N] [--format text|json|csv] [--no-cache] [--clear-cache]";

#[derive(Debug)]
struct Args {
    week: Option<u32>,
    format: OutputFormat,
    use_cache: bool,
    clear_cache: bool,
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut args = Args {
        week: None,
        format: OutputFormat::Text,
        use_cache: true,
        clear_cache: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--week" => {
                let raw = iter.next().context("--week needs a value")?;
                let week: u32 = raw
                    .parse()
                    .with_context(|| format!("invalid week `{raw}`"))?;
                if !(1..=config::MAX_WEEK).contains(&week) {
                    bail!("week must be between 1 and {}", config::MAX_WEEK);
                }
                args.week = Some(week);
            }
            "--format" => {
                let raw = iter.next().context("--format needs a value")?;
                args.format = OutputFormat::parse(&raw)
                    .with_context(|| format!("unknown format `{raw}`"))?;
            }
            "--no-cache" => args.use_cache = false,
            "--clear-cache" => args.clear_cache = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(None);
            }
            other => bail!("unexpected argument `{other}`\n{USAGE}"),
        }
    }

    Ok(Some(args))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse flags
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    // 2. Initialize tracing
    init_tracing()?;
    info!("leaguepulse starting up");

    // 3. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(league_id = %config.league.league_id, "config loaded");

    // 4. Build the source
    let client = SleeperClient::new(config.league.league_id.clone(), &config.fetch)
        .context("failed to build HTTP client")?;
    let source: Box<dyn LeagueSource> = if args.use_cache {
        if let Some(parent) = config.cache_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let cache_path = config.cache_path.to_string_lossy();
        let cache = Cache::open(&cache_path).context("failed to open snapshot cache")?;
        info!(path = %cache_path, "snapshot cache opened");
        if args.clear_cache {
            let removed = cache.clear_league(&config.league.league_id)?;
            info!(removed, "cleared cached snapshots");
        }
        Box::new(CachedSource::new(client, cache))
    } else {
        Box::new(client)
    };

    // 5. Build and print
    let week = args.week.or(config.league.week);
    let report = report::build_report(source.as_ref(), week, &config.scoring).await?;
    println!("{}", report::render(&report, args.format)?);

    info!("leaguepulse finished");
    Ok(())
}

/// Initialize tracing to log to a file (stdout is reserved for the report).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("leaguepulse.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("leaguepulse=info,leaguepulse_app=info,leaguepulse_core=info,warn")
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
