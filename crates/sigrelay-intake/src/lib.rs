//! # sigrelay Intake
//!
//! Keeps a websocket connection to the Signal receive API alive and buffers
//! accepted messages for the delivery side.
//!
//! ## Components
//!
//! - [`MessageQueue`] - FIFO buffer with destructive pop and flush
//! - [`IntakeClient`] - Websocket reader that decodes, filters and enqueues frames
//! - [`Notifier`] - Fans accepted messages out to registered observers
//! - [`Supervisor`] - Reconnect loop driving any [`MessageSource`](sigrelay_protocols::MessageSource)

pub mod client;
pub mod error;
pub mod notify;
pub mod queue;
pub mod supervisor;

pub use client::IntakeClient;
pub use error::DecodeError;
pub use notify::Notifier;
pub use queue::MessageQueue;
pub use supervisor::{Supervisor, SupervisorState, DEFAULT_BACKOFF};
