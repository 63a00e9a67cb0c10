//! Memcached backend discovery and verification
//!
//! Two leaves of the reconciliation pipeline:
//!
//! | Step | Type | Failure |
//! |------|------|---------|
//! | Find the account's port | [`PortDiscovery`] | [`Unavailable`] |
//! | Set/get round trip | [`BackendProbe`] | [`ProbeResult`] not working |

pub mod discovery;
pub mod endpoint;
pub mod probe;

pub use discovery::{PortDiscovery, Unavailable};
pub use endpoint::Endpoint;
pub use probe::{BackendProbe, MemcachedProbe, ProbeResult};
