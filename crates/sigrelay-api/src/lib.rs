//! # sigrelay API
//!
//! Pull-style HTTP access to the messages buffered by the intake client.
//!
//! ```text
//! GET /receive/pop    - Oldest message (200) or nothing (204)
//! GET /receive/flush  - Every buffered message, oldest first
//! GET /healthz        - Liveness probe (204)
//! ```
//!
//! With repeat-last enabled, `pop` on an empty queue serves the most
//! recently delivered message again instead of 204.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, USAGE};
pub use server::DeliveryServer;
pub use state::DeliveryState;
