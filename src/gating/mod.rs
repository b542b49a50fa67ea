//! Permission gating.
//!
//! Decides which data channels may flow into a request: capability flags on
//! the action side, privacy settings and provider trust on the reader side.

mod flags;
mod resolver;

pub use flags::CapabilityFlags;
pub use resolver::{ChannelDecision, PermissionResolver};
