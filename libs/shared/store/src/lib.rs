pub mod memory;
pub mod seed;
pub mod state;

pub use memory::{Collection, HasId, MemoryStore};
pub use state::AppState;
