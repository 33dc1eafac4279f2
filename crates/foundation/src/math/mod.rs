pub mod geodesy;
pub mod path;

pub use geodesy::*;
pub use path::*;
