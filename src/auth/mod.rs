//! Session tickets: login and the per-client ticket cache.

mod cache;
mod login;

pub use cache::{TicketCache, TicketKey};
pub use login::{find_ticket, login, login_command, LoginCommand, TRUST_ALREADY_ESTABLISHED};
