use {
    super::{RingError, RingResult},
    std::{fmt, str::FromStr},
};

/// Identity of a backend host: an address and a port.
///
/// Endpoints compare by value and are immutable once constructed. The
/// `Display` form (`host:port`) is what gets hashed onto the ring, so two
/// endpoints with the same rendering occupy the same positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostEndpoint {
    host: String,
    port: u16,
}

impl HostEndpoint {
    /// Creates a new endpoint from an address and a port.
    ///
    /// No validation is performed on the address: whatever the discovery
    /// source supplies is taken as-is and used only as an identity.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the host address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for HostEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for HostEndpoint {
    type Err = RingError;

    /// Parses `host:port`, splitting on the last colon so that addresses
    /// containing colons keep working.
    fn from_str(s: &str) -> RingResult<Self> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| RingError::InvalidEndpoint(s.to_string()))?;
        if host.is_empty() {
            return Err(RingError::InvalidEndpoint(s.to_string()));
        }
        let port = port
            .parse()
            .map_err(|_| RingError::InvalidEndpoint(s.to_string()))?;
        Ok(Self::new(host, port))
    }
}
