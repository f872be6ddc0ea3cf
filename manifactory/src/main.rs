use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

/// Manifactory - Container Registry Lister
///
/// Lists repositories, tags and image manifests of a Docker/OCI registry.
#[derive(Parser, Debug)]
#[command(name = "manifactory")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Registry username
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Registry password
    #[arg(
        short,
        long,
        global = true,
        env = "MANIFACTORY_PASSWORD",
        hide_env_values = true
    )]
    password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(short, long, global = true)]
    insecure: bool,

    /// Send credentials with Basic auth instead of negotiating Bearer tokens
    #[arg(short, long, global = true)]
    basic_auth: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all repositories in the registry catalog
    Repos {
        /// Registry URL
        registry_url: String,
    },
    /// List tags for repositories read from a file or stdin
    Tags {
        /// Registry URL
        registry_url: String,
        /// File with one repository per line (stdin if omitted)
        repos_file: Option<PathBuf>,
        /// Print full image names (host[:port]/repository:tag)
        #[arg(short, long)]
        names: bool,
    },
    /// Show the manifest of an image
    Manifest {
        /// Registry URL
        registry_url: String,
        /// Repository name
        repository: String,
        /// Tag name
        tag: String,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let flags = context::ConnectionFlags {
        username: cli.username,
        password: cli.password,
        insecure: cli.insecure,
        basic_auth: cli.basic_auth,
        timeout: cli.timeout,
    };
    // Build context with precedence: defaults > config file > env vars > CLI flags
    let ctx = context::AppContext::build(cli.config.as_deref(), &flags)?;

    match cli.command {
        Commands::Repos { registry_url } => commands::repos::handle_repos(&ctx, &registry_url),
        Commands::Tags {
            registry_url,
            repos_file,
            names,
        } => commands::tags::handle_tags(&ctx, &registry_url, repos_file.as_deref(), names),
        Commands::Manifest {
            registry_url,
            repository,
            tag,
        } => commands::manifest::handle_manifest(&ctx, &registry_url, &repository, &tag),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
