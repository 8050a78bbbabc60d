/// Middleware modules for the API server
///
/// Bearer-token authentication lives in `taskdesk_shared::auth::middleware`
/// and is wired in [`crate::app`].

pub mod security;
