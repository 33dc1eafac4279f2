pub mod bounds;
pub mod math;
pub mod time;

// Foundation crate: the geometry kernel and time primitives, nothing else.
pub use bounds::*;
pub use math::*;
pub use time::*;
