use anyhow::Context;
use clap::{Parser, Subcommand};
use politix::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Social-media presence of members of parliament
#[derive(Parser, Debug)]
#[command(name = "politix")]
#[command(about = "Aggregate and filter the social-media presence of members of parliament")]
#[command(version)]
struct Args {
    /// Politician feed, URL or file path (default: published dataset, or POLITIX_DATA env var)
    #[arg(long, global = true)]
    data: Option<String>,

    /// Precomputed stats feed, URL or file path (default: published stats, or POLITIX_STATS env var)
    #[arg(long, global = true)]
    stats: Option<String>,

    /// Ignore the precomputed stats feed and always compute locally
    #[arg(long, global = true)]
    no_stats: bool,

    /// Config file (.toml, .yml or .yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Filter controls shared by the query commands
#[derive(clap::Args, Debug, Clone)]
struct FilterArgs {
    /// Party label or coalition tag
    #[arg(long)]
    party: Option<String>,

    /// Case-insensitive name search
    #[arg(long, default_value = "")]
    search: String,

    /// Platform: all, x, bluesky or mastodon
    #[arg(long)]
    platform: Option<String>,

    /// Keep politicians with any of these accounts: x, bluesky, mastodon, none (default: all)
    #[arg(long, value_delimiter = ',')]
    accounts: Vec<String>,
}

impl FilterArgs {
    fn state(&self) -> anyhow::Result<FilterState> {
        let platform = match &self.platform {
            Some(p) => p.parse::<Platform>()?,
            None => Platform::All,
        };
        let presence = if self.accounts.is_empty() {
            Presence::default()
        } else {
            Presence::from_checked(&self.accounts)?
        };
        Ok(FilterState {
            search_term: self.search.clone(),
            selected_party: self.party.clone(),
            active_platform: platform,
            presence,
        })
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print status counts for the selected scope
    /// Prints every platform unless --platform is given
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the filtered politicians, sorted by name, one JSON object per line
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Limit number of results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the labels available to the party selector
    Parties,

    /// Compute the stats document served by the stats feed
    Precompute {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  stats       Print status counts for the selected scope");
    println!("  list        Print the filtered politicians");
    println!("  parties     Print the labels available to the party selector");
    println!("  precompute  Compute the stats document served by the stats feed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("politix=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn build_config(args: &Args, local_only: bool) -> anyhow::Result<Config> {
    let mut builder = ConfigBuilder::new();

    if let Some(path) = &args.config {
        let file = ConfigFile::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?;
        builder = builder.file(file);
    }

    builder = builder.env();

    if let Some(data) = &args.data {
        builder = builder.data_source(data.as_str());
    }
    if let Some(stats) = &args.stats {
        builder = builder.stats_source(stats.as_str());
    }
    if args.no_stats || local_only {
        builder = builder.no_stats();
    }

    Ok(builder.build()?)
}

async fn load_dashboard(config: &Config) -> anyhow::Result<Dashboard> {
    Dashboard::load(config)
        .await
        .with_context(|| format!("Failed to load politicians from {}", config.data_source))
}

async fn run_stats_command(config: &Config, filter: &FilterArgs) -> anyhow::Result<()> {
    let state = filter.state()?;
    let dashboard = load_dashboard(config).await?;
    let stats = dashboard.stats(&state);

    let json = if filter.platform.is_some() {
        serde_json::to_string_pretty(stats.get(state.active_platform))?
    } else {
        serde_json::to_string_pretty(&stats)?
    };
    println!("{}", json);
    Ok(())
}

async fn run_list_command(
    config: &Config,
    filter: &FilterArgs,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let state = filter.state()?;
    let dashboard = load_dashboard(config).await?;
    let politicians = dashboard.filtered(&state);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for politician in politicians.iter().take(limit.unwrap_or(usize::MAX)) {
        let json = serde_json::to_string(politician)?;
        writeln!(out, "{}", json)?;
    }
    Ok(())
}

async fn run_parties_command(config: &Config) -> anyhow::Result<()> {
    let dashboard = load_dashboard(config).await?;
    for label in dashboard.party_labels() {
        println!("{}", label);
    }
    Ok(())
}

async fn run_precompute_command(config: &Config, output: Option<PathBuf>) -> anyhow::Result<()> {
    let dashboard = load_dashboard(config).await?;
    let json = serde_json::to_string_pretty(&dashboard.precompute())?;

    match output {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote precomputed stats");
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    match &args.command {
        Some(Command::Stats { filter }) => {
            let config = build_config(&args, false)?;
            run_stats_command(&config, filter).await
        }
        Some(Command::List { filter, limit }) => {
            // The table never reads stats
            let config = build_config(&args, true)?;
            run_list_command(&config, filter, *limit).await
        }
        Some(Command::Parties) => {
            let config = build_config(&args, true)?;
            run_parties_command(&config).await
        }
        Some(Command::Precompute { output }) => {
            let config = build_config(&args, true)?;
            run_precompute_command(&config, output.clone()).await
        }
        None => {
            print_available_commands();
            Ok(())
        }
    }
}
