pub mod arena;
pub mod registry;
mod timers;

pub use arena::ArenaHandle;
pub use registry::{ArenaConfig, ArenaState};
