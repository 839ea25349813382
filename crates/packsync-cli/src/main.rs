use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod sync_flow;

use config::{load_file_config, resolve_settings, ConfigOverrides};
use render::{
    current_output_style, format_report_lines, print_lines, render_status_line, OutputStyle,
    TerminalProgress,
};
use sync_flow::run_sync;

#[derive(Parser, Debug)]
#[command(name = "packsync", version)]
#[command(about = "Converge a server directory to a published modpack build", long_about = None)]
struct Cli {
    /// Package slug on the manifest provider.
    package: String,
    /// Build id, `latest` or `recommended`.
    build: String,
    /// Working directory to converge.
    #[arg(long, env = "PACKSYNC_ROOT")]
    root: Option<PathBuf>,
    /// Default Solder API base url.
    #[arg(long)]
    solder: Option<String>,
    /// Platform API used to find a package's own Solder.
    #[arg(long)]
    platform_api: Option<String>,
    /// Artifact to copy after a sync; `%MCVERSION%` is replaced with the build's platform version.
    #[arg(long, env = "JAR_REPO")]
    artifact_source: Option<String>,
    #[arg(long, env = "JAR_DEST")]
    artifact_dest: Option<PathBuf>,
    #[arg(long)]
    max_connections: Option<usize>,
    /// Seconds a connection may go without progress; slow transfers still finish.
    #[arg(long)]
    stall_timeout_secs: Option<u64>,
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root: self.root.clone(),
            solder: self.solder.clone(),
            platform_api: self.platform_api.clone(),
            artifact_source: self.artifact_source.clone(),
            artifact_dest: self.artifact_dest.clone(),
            max_connections: self.max_connections,
            stall_timeout_secs: self.stall_timeout_secs,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let style = current_output_style();

    match run_cli(cli, style).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render_status_line(style, "error", &format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run_cli(cli: Cli, style: OutputStyle) -> Result<()> {
    let overrides = cli.overrides();
    let root = overrides.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let file = load_file_config(&root)?;
    let settings = resolve_settings(overrides, file)?;

    let progress = TerminalProgress::new(style);
    let report = run_sync(&cli.package, &cli.build, &settings, &progress).await?;
    print_lines(&format_report_lines(&report, style));
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
