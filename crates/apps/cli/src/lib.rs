//! Headless host for the focus drive session: real routing over HTTP, a
//! tokio frame loop and a map that only logs.

pub mod args;
pub mod drive;
pub mod provider;
pub mod trace_map;

pub use args::*;
pub use drive::*;
pub use provider::*;
pub use trace_map::*;
