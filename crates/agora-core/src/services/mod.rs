//! Application services built on the ports.

mod coordinator;
mod engine;
mod guards;
mod locks;

pub use coordinator::DualWriteCoordinator;
pub use engine::InteractionEngine;
pub use guards::{Authored, Guards, Resolved, authorize};
pub use locks::{EntityLock, EntityLocks};
