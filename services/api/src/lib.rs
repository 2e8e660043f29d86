mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use inquiry_form::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
