use anyhow::Context;
use serde::Deserialize;

/// Upper bound for the candidate list `limit` parameter.
pub const MAX_CANDIDATE_LIMIT: usize = 50;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db")]
    pub database_url: String,
    #[serde(default = "default_db_pool_size")]
    pub db_pool_size: u32,
    /// Broker for match notifications. Unset means notifications are only logged.
    #[serde(default)]
    pub rabbitmq_url: Option<String>,
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
}

fn default_port() -> u16 { 3010 }
fn default_db() -> String { "matchbot.db".into() }
fn default_db_pool_size() -> u32 { 8 }
fn default_candidate_limit() -> usize { 5 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_url: default_db(),
            db_pool_size: default_db_pool_size(),
            rabbitmq_url: None,
            candidate_limit: default_candidate_limit(),
        }
    }
}

impl AppConfig {
    /// Read `MATCHBOT__*` environment variables over the defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_builder(config::Config::builder().add_source(
            config::Environment::with_prefix("MATCHBOT")
                .separator("__")
                .try_parsing(true),
        ))
    }

    /// A malformed value is an error; startup must not fall back to another database.
    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> anyhow::Result<Self> {
        let config = builder
            .build()?
            .try_deserialize::<Self>()
            .context("invalid MATCHBOT configuration")?;
        Ok(config)
    }

    /// Resolve a requested candidate count against the configured default and the hard cap.
    pub fn candidate_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.candidate_limit)
            .clamp(1, MAX_CANDIDATE_LIMIT)
    }
}
