mod cli;
mod console;
mod infra;
mod routes;
mod server;

use job_radar::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
