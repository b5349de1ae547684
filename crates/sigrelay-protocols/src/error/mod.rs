//! Error types shared across sigrelay crates.

mod intake;
mod message_type;
mod notify;

pub use intake::*;
pub use message_type::*;
pub use notify::*;
