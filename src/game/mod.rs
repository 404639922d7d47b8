pub mod core;
pub mod engine;
mod ws;

pub use engine::{ArenaConfig, ArenaState};
pub use ws::handle_connection;
