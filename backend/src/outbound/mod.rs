//! Outbound adapters implementing domain ports.
//!
//! - **memory**: mutex-guarded repositories for users, plans, and institutions
//! - **payment**: sandbox payment provider issuing checkout links
//! - **jwt**: HS256 access tokens
//! - **secrets**: random one-time token values
//! - **mailer**: log-backed email client
//! - **notification_queue**: bounded channel feeding the notification worker
//!
//! Adapters translate between domain types and their backing mechanism and
//! contain no business logic.

pub mod jwt;
pub mod mailer;
pub mod memory;
pub mod notification_queue;
pub mod payment;
pub mod secrets;
