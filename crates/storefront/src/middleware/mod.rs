//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, one hub per request)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Browser lock (one request at a time per session cookie)
//! 5. Session layer (tower-sessions with in-memory store)

pub mod browser_lock;
pub mod request_id;
pub mod session;

pub use browser_lock::browser_lock_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::create_session_layer;
