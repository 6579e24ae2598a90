use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use nsprefix_discovery::{Discovery, ScanConfiguration};
use std::io;
use std::path::PathBuf;

mod manifest;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "nsprefix")]
#[command(about = "Discover PHP symbols in vendored packages that need prefixing", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan vendored files and print the namespace, class and constant maps
    Discover(DiscoverArgs),
}

#[derive(Args)]
struct DiscoverArgs {
    /// Configuration file (`.toml`, `.json`, or a `composer.json` with `extra.strauss`)
    #[arg(short, long)]
    config: PathBuf,

    /// Directory the vendored files were copied to
    #[arg(short, long)]
    target_dir: PathBuf,

    /// JSON manifest mapping relative paths to file records
    #[arg(short, long, conflicts_with = "walk", required_unless_present = "walk")]
    manifest: Option<PathBuf>,

    /// Build the manifest by walking the target directory for `*.php` files
    #[arg(long)]
    walk: bool,

    /// Prefix stripped from discovered namespaces (defaults to the configured namespace prefix)
    #[arg(long)]
    namespace_prefix_filter: Option<String>,

    /// Classes starting with this prefix are left out (defaults to the configured classmap prefix)
    #[arg(long)]
    class_prefix_filter: Option<String>,

    /// Constants starting with this prefix are left out (defaults to the configured constants prefix)
    #[arg(long)]
    constant_prefix_filter: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Discover(args) => run_discover(args),
    }
}

fn run_discover(args: DiscoverArgs) -> Result<()> {
    let config = ScanConfiguration::load(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    let target_dir = args
        .target_dir
        .canonicalize()
        .with_context(|| format!("Target directory {} not found", args.target_dir.display()))?;

    let files = match &args.manifest {
        Some(path) => manifest::load_manifest(path)?,
        None => manifest::walk_manifest(&target_dir)?,
    };
    log::info!("Discovering symbols in {} files", files.len());

    let mut discovery = Discovery::new(config).context("Invalid configuration pattern")?;
    discovery
        .scan_files(&target_dir, &files)
        .context("Discovery aborted")?;

    let config = discovery.config();
    let report = discovery.report_with(
        args.namespace_prefix_filter
            .as_deref()
            .unwrap_or(&config.namespace_prefix),
        args.class_prefix_filter
            .as_deref()
            .unwrap_or(&config.classmap_prefix),
        args.constant_prefix_filter
            .as_deref()
            .unwrap_or(config.constants_prefix_or_empty()),
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    print_stdout(&json)
}
