//! Discovered backend address

use std::fmt;

/// A Memcached endpoint found for this account.
///
/// Built fresh for every reconciliation; the hosting platform may move the
/// port between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_host_colon_port() {
        assert_eq!(Endpoint::new("127.0.0.1", 11211).to_string(), "127.0.0.1:11211");
    }
}
