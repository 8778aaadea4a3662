//! # velma-client — Velma Notification API Integration
//!
//! Typed client for the **Velma** transactional-email / notification
//! service.
//!
//! ## Capabilities
//!
//! - **Command packets** — assemble a job submission (sponsor identity,
//!   authentication keys, recipient contacts, product/template fields,
//!   user-defined template variables) with fluent setters and a stable
//!   wire-format serialization.
//! - **Contacts** — recipient records with auto-generated application
//!   ids, derived display names, and optional per-recipient callback
//!   URLs; packet membership is by instance identity, not field value.
//! - **Submission** — POST the serialized packet to the `job` route
//!   over HTTPS with api-key authentication and map the response into
//!   a typed [`VelmaResponse`].
//!
//! Packet assembly is pure in-memory work with no internal locking;
//! confine a [`CommandPacket`] to one logical flow of control.

pub mod types;
pub mod error;
pub mod ids;
pub mod contact;
pub mod packet;
pub mod client;

pub use client::VelmaClient;
pub use contact::Contact;
pub use error::{VelmaError, VelmaErrorCode, VelmaResult};
pub use packet::CommandPacket;
pub use types::{VelmaConfig, VelmaResponse};
