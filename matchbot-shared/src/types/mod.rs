pub mod api;
pub mod event;

pub use api::*;
pub use event::*;

/// Opaque identity of a registered user: the chat platform's numeric user id.
pub type UserId = i64;
