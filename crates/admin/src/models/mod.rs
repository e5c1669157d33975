//! Types stored in the session.

pub mod session;

pub use session::{Flash, FlashKind, session_keys};
