//! Session adapters.
//!
//! Implementations of the `SessionContext` port:
//!
//! - `static_session` - Token held in memory, set by whoever signs the user in

mod static_session;

pub use static_session::StaticSession;
