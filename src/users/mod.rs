//! Account signup and login: HTTP handlers, credential service, hashing and
//! the user store.

use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod errors;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use errors::UserError;
pub use repo_types::{NewUser, UserRecord};
pub use services::CredentialService;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
