pub mod deferred;
pub mod time;

pub use deferred::{DeferredQueue, DeferredTask};
pub use time::SimClock;
