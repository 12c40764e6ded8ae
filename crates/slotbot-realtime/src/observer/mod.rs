//! Observer bookkeeping.

pub mod handle;
pub mod pool;
pub mod stream;

pub use handle::{Delivery, ObserverHandle, ObserverId};
pub use pool::ObserverPool;
pub use stream::ObserverStream;
