use crate::{api, cli::commands::database};
use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub cors_origin: String,
    pub database: database::Options,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the DSN cannot be built, the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let dsn = args.database.dsn()?;

    debug!("Database target: {}", args.database.display_target());

    api::new(args.port, &dsn, &args.cors_origin).await
}
