use crate::config::ConfigError;
use crate::datasource::TrafficLogError;
use crate::orchestration::{DiscoverError, SessionError};
use thiserror::Error;

/// Top-level error for a whole audit run.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("traffic log error: {0}")]
    Traffic(#[from] TrafficLogError),
    #[error("audit session error: {0}")]
    Session(#[from] SessionError),
    #[error("standings discovery error: {0}")]
    Discover(#[from] DiscoverError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
