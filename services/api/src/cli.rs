use crate::demo::{run_demo, DemoArgs};
use crate::report::{run_calc, run_screen, CalcArgs, ScreenArgs};
use crate::server;
use auction_screener::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Auction Screener",
    about = "Screen foreclosure auction listings from the command line or over HTTP",
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
    /// Screen a JSON listing export, optionally enriched with deal history
    Screen(ScreenArgs),
    /// Project costs and profit for a bid/sale scenario
    Calc(CalcArgs),
    /// Run the seeded sample listings through ingestion and screening
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
        Command::Screen(args) => run_screen(args),
        Command::Calc(args) => run_calc(args),
        Command::Demo(args) => run_demo(args),
    }
}
