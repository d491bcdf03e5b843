//! p4-query - Perforce history and metadata through the `p4` command line.
//!
//! [`P4Client`] runs one `p4` command per query, authenticating once per
//! user and server with a cached session ticket. The raw output can be kept
//! as lines or turned into records with the parsers in [`parse`].
//!
//! ```no_run
//! use p4_query::{Credentials, P4Client, P4Config};
//!
//! # async fn demo() -> p4_query::Result<()> {
//! let creds = Credentials::with_password("alice", "secret", "ssl:perforce:1666")
//!     .trust("AB:CD:EF");
//! let client = P4Client::new(creds, P4Config::default());
//!
//! if let Some(change) = client.describe_change(4242, true).await? {
//!     println!("{} by {}: {}", change.revision, change.user, change.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod exec;
pub mod net;
pub mod parse;
pub mod query;

pub use config::{Credentials, P4Config};
pub use error::{P4Error, Result, ENCODING_ERROR_MESSAGE};
pub use query::{P4Client, RawOutput};
