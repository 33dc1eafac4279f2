//! Route lookup against an external routing service.
//!
//! The service is a collaborator, not part of this crate: [`RouteProvider`]
//! is the seam hosts implement with their HTTP client of choice. Everything
//! here degrades to a straight line rather than failing.

pub mod planner;
pub mod protocol;
pub mod provider;

pub use planner::*;
pub use protocol::*;
pub use provider::*;
