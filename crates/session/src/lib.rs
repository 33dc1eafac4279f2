pub mod config;
pub mod countdown;
pub mod map;
pub mod session;

pub use config::*;
pub use countdown::*;
pub use map::*;
pub use session::*;
