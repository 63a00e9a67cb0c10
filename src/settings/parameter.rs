//! Admin parameter names and the options they control

use crate::error::MemdropError;
use std::fmt;
use std::str::FromStr;

/// Option holding the desired Memcached state
pub const ENABLE_MEMCACHED: &str = "enable_memcached";

/// Toggleable admin parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// Memcached object cache (has side effects on the dropin)
    Memcached,
    /// Dynamic page cache
    DynamicCache,
    /// Purge the page cache automatically on content changes
    AutoflushCache,
}

impl Parameter {
    /// Name of the backing option
    pub fn option_name(&self) -> &'static str {
        match self {
            Self::Memcached => ENABLE_MEMCACHED,
            Self::DynamicCache => "enable_cache",
            Self::AutoflushCache => "autoflush_cache",
        }
    }

    /// Whether toggling must converge the dropin before persisting
    pub fn drives_dropin(&self) -> bool {
        matches!(self, Self::Memcached)
    }
}

impl FromStr for Parameter {
    type Err = MemdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memcached" => Ok(Self::Memcached),
            "dynamic-cache" => Ok(Self::DynamicCache),
            "autoflush-cache" => Ok(Self::AutoflushCache),
            other => Err(MemdropError::UnknownParameter(other.to_string())),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memcached => "memcached",
            Self::DynamicCache => "dynamic-cache",
            Self::AutoflushCache => "autoflush-cache",
        };
        write!(f, "{}", name)
    }
}
