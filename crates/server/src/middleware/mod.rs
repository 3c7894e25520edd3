//! Request middleware: sessions, authentication, and cache headers.

pub mod auth;
pub mod no_cache;
pub mod session;

pub use auth::{Referer, RequireAuth, clear_current_user, require_role, set_current_user};
pub use no_cache::no_cache_headers;
pub use session::create_session_layer;
