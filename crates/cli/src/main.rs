use clap::Parser;
use kubeforge_core::OutputSink;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "kubeforge")]
#[command(about = "Plan and provision managed Kubernetes clusters", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let tracing = if cli.verbose {
        kubeforge_utils::tracing::init_with_default("debug")
    } else {
        kubeforge_utils::tracing::init()
    };
    tracing.map_err(|e| eyre::eyre!(e))?;

    cli.command.execute(&OutputSink::stdout()).await?;
    Ok(())
}
