mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use order_bumps::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
