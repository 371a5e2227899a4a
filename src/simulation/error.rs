use thiserror::Error;

/// Errors raised while building networks, validating configuration, or running
/// the simulator and optimizer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    #[error("invalid network descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("network has no lanes")]
    DegenerateNetwork,
    #[error("simulation exceeded the limit of {limit} events")]
    EventLimitExceeded { limit: u64 },
}

pub type Result<T> = std::result::Result<T, SignalError>;
