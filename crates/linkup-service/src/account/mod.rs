//! Account lookup and storage.

pub mod directory;
pub mod memory;

pub use directory::AccountDirectory;
pub use memory::MemoryAccountDirectory;
