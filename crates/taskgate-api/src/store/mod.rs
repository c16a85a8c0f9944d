//! In-memory stand-ins for the persistence collaborators.

pub mod identity;
pub mod task;

pub use identity::MemoryIdentityStore;
pub use task::{MemoryTaskStore, Task, TaskChanges};
