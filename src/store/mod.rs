//! Local persistence

mod tokens;

pub use tokens::{AuthSession, Clock, SystemClock, TokenStore, TOKEN_KEY};
