mod cli;
mod demo;
mod infra;
mod report;
mod routes;
mod server;

use auction_screener::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
