#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RingError {
    /// Lookup on a ring with no hosts.
    #[error("Empty ring: no hosts available")]
    EmptyRing,

    /// Ring configured with zero virtual nodes per host.
    #[error("Virtual node count must be at least 1")]
    NoVirtualNodes,

    /// Endpoint string not in `host:port` form.
    #[error("Invalid host endpoint: {0}")]
    InvalidEndpoint(String),
}

pub type RingResult<T> = Result<T, RingError>;
