use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod report;

#[derive(Parser)]
#[command(name = "xvol")]
#[command(about = "Intraday previous-close crossing analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

/// Flags shared by every command that reads configuration.
#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    /// Config layers in merge order, applied on top of the built-in defaults
    #[arg(long = "config")]
    pub config_paths: Vec<String>,

    /// Output format: text | json
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Where prices come from.
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Price source: yahoo | csv
    #[arg(long, default_value = "yahoo")]
    pub source: String,

    /// Intraday CSV (ticker,timestamp,price). Required with --source csv
    #[arg(long = "intraday-csv")]
    pub intraday_csv: Option<String>,

    /// Daily close CSV (ticker,date,close). Required with --source csv
    #[arg(long = "closes-csv")]
    pub closes_csv: Option<String>,

    /// Override the Yahoo chart API base URL
    #[arg(long = "yahoo-base-url")]
    pub yahoo_base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Count crossings for one session across a ticker universe
    Session {
        /// Universe name (adrs | merval, or any defined in config)
        #[arg(long)]
        universe: String,

        /// Analysis date YYYY-MM-DD (default: last session up to today)
        #[arg(long)]
        date: Option<String>,

        /// Previous-close date YYYY-MM-DD (default: session before --date)
        #[arg(long = "previous-date")]
        previous_date: Option<String>,

        /// Also aggregate a rolling window per ticker
        #[arg(long, default_value_t = false)]
        window: bool,

        /// Also compute the close-variation series per ticker
        #[arg(long, default_value_t = false)]
        variation: bool,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Rolling-window crossing statistics for one ticker
    Window {
        #[arg(long)]
        ticker: String,

        /// Venue id (nyse | bcba)
        #[arg(long)]
        venue: String,

        /// Anchor date YYYY-MM-DD (default: last session up to today)
        #[arg(long)]
        anchor: Option<String>,

        /// Window size in trading days (default from config)
        #[arg(long)]
        size: Option<usize>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Close-to-next-close percentage variation for one ticker
    Variation {
        #[arg(long)]
        ticker: String,

        #[arg(long)]
        venue: String,

        #[arg(long)]
        anchor: Option<String>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Trading calendar queries
    Calendar {
        #[command(subcommand)]
        cmd: CalendarCmd,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,

        /// Start from the built-in defaults
        #[arg(long = "with-defaults", default_value_t = false)]
        with_defaults: bool,
    },
}

#[derive(Subcommand)]
enum CalendarCmd {
    /// List trading days in [start, end]
    Days {
        #[arg(long)]
        venue: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        #[arg(long = "config")]
        config_paths: Vec<String>,
    },

    /// Holiday-data coverage of every configured venue
    Coverage {
        #[arg(long = "config")]
        config_paths: Vec<String>,
    },

    /// Last trading day on or before a date
    Last {
        #[arg(long)]
        venue: String,

        #[arg(long)]
        date: String,

        #[arg(long = "config")]
        config_paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent when absent.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Session {
            universe,
            date,
            previous_date,
            window,
            variation,
            source,
            common,
        } => {
            commands::session::run_session(commands::session::SessionArgs {
                universe,
                date,
                previous_date,
                window,
                variation,
                source,
                common,
            })
            .await?;
        }

        Commands::Window {
            ticker,
            venue,
            anchor,
            size,
            source,
            common,
        } => {
            commands::window::run_window(ticker, venue, anchor, size, source, common).await?;
        }

        Commands::Variation {
            ticker,
            venue,
            anchor,
            source,
            common,
        } => {
            commands::window::run_variation(ticker, venue, anchor, source, common).await?;
        }

        Commands::Calendar { cmd } => match cmd {
            CalendarCmd::Days {
                venue,
                start,
                end,
                config_paths,
            } => commands::calendar::days(&venue, &start, &end, &config_paths)?,
            CalendarCmd::Last {
                venue,
                date,
                config_paths,
            } => commands::calendar::last(&venue, &date, &config_paths)?,
            CalendarCmd::Coverage { config_paths } => commands::calendar::coverage(&config_paths)?,
        },

        Commands::ConfigHash { paths, with_defaults } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = if with_defaults {
                xvol_config::load_with_defaults(&path_refs)?
            } else {
                xvol_config::load_layered_yaml(&path_refs)?
            };
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays a clean report.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
