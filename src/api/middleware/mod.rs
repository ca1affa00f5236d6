pub mod auth;

pub use auth::{BearerAuth, CallerIdentity};
