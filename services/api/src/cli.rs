use crate::demo::{run_demo, run_import, DemoArgs, ImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cognivio::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Cognivio",
    about = "Score classroom observations and run the teacher assessment service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a CSV export of element scores and print the assessment
    Import(ImportArgs),
    /// Print a roster, dashboard, insights, and peer matches for seeded teachers
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Import(args) => run_import(args),
        Command::Demo(args) => run_demo(args),
    }
}
