// crates/emodict-core/src/config.rs

use std::path::PathBuf;

use crate::encoding::Normalization;
use crate::error::{LoaderError, Result};

/// Host and port of the shared emotion-coding Postgres instance. Both can be
/// overridden through the environment for local runs.
pub const DEFAULT_HOST: &str = "emotion-coding-postgres-db";
pub const DEFAULT_PORT: u16 = 5433;

/// Maintenance database used to bootstrap the per-variant databases.
pub const MAINTENANCE_DB: &str = "postgres";

/// The two dictionary loads. They share the schema and the ingestion flow and
/// diverge only in target database, input file, and emotion normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictVariant {
    BaseDict,
    EmolexDict,
}

impl DictVariant {
    pub fn db_name(&self) -> &'static str {
        match self {
            DictVariant::BaseDict => "base_dict",
            DictVariant::EmolexDict => "emolex_dict",
        }
    }

    pub fn default_input(&self) -> PathBuf {
        match self {
            DictVariant::BaseDict => PathBuf::from("data-nrc-encoded.csv"),
            DictVariant::EmolexDict => PathBuf::from("parlmint_with_emotions.parquet"),
        }
    }

    pub fn normalization(&self) -> Normalization {
        match self {
            DictVariant::BaseDict => Normalization::Raw,
            DictVariant::EmolexDict => Normalization::Proportional,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl DbConfig {
    /// Reads connection parameters from the environment. Credentials are
    /// required; host and port fall back to the deployment constants.
    pub fn from_env() -> Result<Self> {
        let user = require_var("POSTGRES_USER")?;
        let password = require_var("POSTGRES_PASSWORD")?;
        let host =
            std::env::var("POSTGRES_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("POSTGRES_PORT") {
            Ok(raw) => raw.parse().map_err(|_| {
                LoaderError::Config(format!("POSTGRES_PORT is not a valid port: '{raw}'"))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            user,
            password,
            host,
            port,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| LoaderError::Config(format!("{name} must be set")))
}
