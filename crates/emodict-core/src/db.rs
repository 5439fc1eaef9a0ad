// crates/emodict-core/src/db.rs

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::config::{DbConfig, MAINTENANCE_DB};
use crate::error::Result;

pub type DbPool = Pool<Postgres>;

/// SQLSTATE raised by `CREATE DATABASE` when the database already exists.
const DUPLICATE_DATABASE: &str = "42P04";

/// Establish a Postgres connection pool against the given database.
pub async fn connect(config: &DbConfig, db_name: &str) -> Result<DbPool> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(db_name);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Create the target database if it does not exist, going through the
/// maintenance database. An already-existing database is informational, not
/// an error; any other failure aborts the run.
pub async fn ensure_database(config: &DbConfig, db_name: &str) -> Result<()> {
    let admin = connect(config, MAINTENANCE_DB).await?;

    // CREATE DATABASE cannot run as a prepared statement, and db_name is a
    // fixed variant identifier rather than user input.
    let statement = format!("CREATE DATABASE {db_name}");
    let outcome = sqlx::raw_sql(&statement).execute(&admin).await;
    admin.close().await;

    match outcome {
        Ok(_) => {
            info!(db = db_name, "database created");
            Ok(())
        }
        Err(sqlx::Error::Database(db_err))
            if db_err.code().as_deref() == Some(DUPLICATE_DATABASE) =>
        {
            info!(db = db_name, "database already exists, skipping creation");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
