//! Apply the embedded Diesel migrations to a PostgreSQL database.

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// `noteshare-migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "noteshare-migrate",
    about = "Apply pending schema migrations to the noteshare database",
    version
)]
struct CliArgs {
    /// Database connection URL.
    #[arg(long = "database-url", env = "NOTESHARE_DATABASE_URL", value_name = "url")]
    database_url: String,
    /// Revert the most recent migration instead of applying pending ones.
    #[arg(long)]
    revert: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init();

    let args = CliArgs::parse();
    let mut conn = PgConnection::establish(&args.database_url)
        .wrap_err("failed to connect to the database")?;

    if args.revert {
        let version = conn
            .revert_last_migration(MIGRATIONS)
            .map_err(|err| eyre!("failed to revert migration: {err}"))?;
        info!(%version, "reverted migration");
        return Ok(());
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| eyre!("failed to apply migrations: {err}"))?;
    if applied.is_empty() {
        info!("schema already up to date");
    }
    for version in applied {
        info!(%version, "applied migration");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[rstest]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[rstest]
    fn revert_flag_is_optional() {
        let args = CliArgs::try_parse_from([
            "noteshare-migrate",
            "--database-url",
            "postgres://localhost/noteshare",
        ])
        .expect("valid args");
        assert!(!args.revert);
        assert_eq!(args.database_url, "postgres://localhost/noteshare");
    }
}
