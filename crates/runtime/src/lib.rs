pub mod clock;
pub mod event_bus;
pub mod frame;
pub mod frame_loop;
pub mod time_source;

pub use clock::*;
pub use event_bus::*;
pub use frame::*;
pub use frame_loop::*;
pub use time_source::*;
