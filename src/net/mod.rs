//! Network and trust helpers: address parsing, name resolution and lookups
//! in the local trust and ticket stores.

mod port;
mod resolve;
mod trust;

pub use port::PortSpec;
pub use resolve::resolve_host;
pub use trust::{local_ticket, trusted_fingerprint};
