//! Independent checks over one response object.
//!
//! Each validator returns a plain report value. The runner turns any
//! [`Finding`] into a log entry, so validators never touch the log.

mod naming;
mod presence;
mod types;

pub use naming::{NamingReport, check_naming};
pub use presence::{PresenceReport, check_presence};
pub use types::{TypeMismatch, TypeReport, check_types};

use crate::errors::FailureKind;

/// Outcome of one validation, convertible into a log entry.
pub trait Finding {
    fn passed(&self) -> bool;

    /// Human-readable verdict; on failure it names the offending fields.
    fn message(&self) -> String;

    /// Kind recorded when [`Finding::passed`] is false.
    fn failure_kind(&self) -> FailureKind;
}
