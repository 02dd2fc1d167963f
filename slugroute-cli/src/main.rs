//! Slugroute CLI

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use slugroute_core::HierarchyProvider;
use slugroute_router::{Router, Snapshot, UrlRequest};
use slugroute_store::{Fixture, InMemoryHierarchy, InMemoryStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "slugroute")]
#[command(about = "Bidirectional slug router", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn", env = "SLUGROUTE_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Where the rules come from
#[derive(Args)]
struct Source {
    /// Rule file (YAML, TOML or JSON)
    #[arg(short, long, conflicts_with = "snapshot", required_unless_present = "snapshot")]
    rules: Option<PathBuf>,

    /// Compiled snapshot, as written by `compile`
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Fixture with the element tree and the tables
    #[arg(short, long)]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a rule file into a snapshot
    Compile {
        /// Rule file (YAML, TOML or JSON)
        #[arg(short, long, default_value = "rules.yaml")]
        rules: PathBuf,

        /// Fixture providing the element tree
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Write the snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a rule file
    Validate {
        /// Rule file (YAML, TOML or JSON)
        #[arg(short, long, default_value = "rules.yaml")]
        rules: PathBuf,
    },

    /// Resolve a request path to a controller and an id
    Resolve {
        #[command(flatten)]
        source: Source,

        /// Rule to resolve with; the first rule whose shape fits when omitted
        #[arg(long)]
        rule: Option<usize>,

        /// Request path, without leading slash
        path: String,
    },

    /// Build the URL of an entity
    Url {
        #[command(flatten)]
        source: Source,

        /// Target controller
        controller: String,

        /// Entity id
        id: Option<i64>,

        /// Language tag
        #[arg(long)]
        lang: Option<String>,

        /// Position among the controller's matching rules
        #[arg(long)]
        rule_index: Option<usize>,

        /// Field override, as name=value
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Skip word encoding
        #[arg(long)]
        raw: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Compile { rules, data, output } => {
            let config = load_config(&rules)?;
            let tree = data.as_deref().map(load_fixture).transpose()?.map(|(_, tree)| tree);
            let router = config.build_router(tree.as_ref().map(|t| t as &dyn HierarchyProvider))?;
            let json = router.snapshot().to_json()?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(rules = router.len(), path = %path.display(), "Snapshot written");
                }
                None => println!("{json}"),
            }
            Ok(())
        }

        Commands::Validate { rules } => match load_config(&rules) {
            Ok(config) => {
                println!("✓ Rule file is valid");
                println!("  Rules: {}", config.rules.len());
                println!("  Registrations: {}", config.definitions().len());
                Ok(())
            }
            Err(e) => {
                eprintln!("✗ Rule file validation failed: {e}");
                std::process::exit(1);
            }
        },

        Commands::Resolve { source, rule, path } => {
            let (router, store) = load_source(&source)?;
            let path = path.trim_start_matches('/');

            let Some(index) = rule.or_else(|| router.matchers().first_match(path)) else {
                bail!("no rule fits '{path}'");
            };
            let segments: Vec<&str> = path.split('/').collect();

            match router.session(&store).resolve(&segments, index)? {
                Some(resolution) => {
                    println!("{}", serde_json::to_string_pretty(&resolution)?);
                    Ok(())
                }
                None => {
                    eprintln!("No match for '{path}' with rule {index}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Url {
            source,
            controller,
            id,
            lang,
            rule_index,
            fields,
            raw,
        } => {
            let (router, store) = load_source(&source)?;

            let mut request = UrlRequest::new(controller).raw(raw);
            if let Some(id) = id {
                request = request.id(id);
            }
            if let Some(lang) = lang {
                request = request.tag("lang", lang);
            }
            if let Some(index) = rule_index {
                request = request.rule_index(index);
            }
            for (name, value) in fields {
                request = request.field(name, value);
            }

            match router.session(&store).build(&request)? {
                Some(url) => {
                    println!("/{url}");
                    Ok(())
                }
                None => {
                    eprintln!("No URL for {} {:?}", request.controller, request.id);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("Slugroute");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<slugroute_config::RulesConfig> {
    slugroute_config::load(path).with_context(|| format!("failed to load {}", path.display()))
}

fn load_fixture(path: &Path) -> Result<(InMemoryStore, InMemoryHierarchy)> {
    let fixture =
        Fixture::load(path).with_context(|| format!("failed to load {}", path.display()))?;
    Ok(fixture.into_parts())
}

fn load_source(source: &Source) -> Result<(Router, InMemoryStore)> {
    let (store, tree) = match &source.data {
        Some(path) => load_fixture(path)?,
        None => (InMemoryStore::new(), InMemoryHierarchy::new()),
    };

    let router = match (&source.rules, &source.snapshot) {
        (Some(rules), _) => load_config(rules)?.build_router(Some(&tree))?,
        (None, Some(snapshot)) => {
            let json = std::fs::read_to_string(snapshot)
                .with_context(|| format!("failed to read {}", snapshot.display()))?;
            Router::from_snapshot(Snapshot::from_json(&json)?)?
        }
        (None, None) => bail!("either --rules or --snapshot is required"),
    };

    tracing::debug!(rules = router.len(), "Router ready");
    Ok((router, store))
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(filter.into()))
        .init();

    Ok(())
}
