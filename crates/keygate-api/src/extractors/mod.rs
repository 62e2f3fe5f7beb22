//! Request extractors

mod auth;
mod validated;

pub use auth::AuthPrincipal;
pub use validated::ValidatedJson;
