pub mod file;
pub mod memory;

pub use file::FilePersistence;
pub use memory::MemoryPersistence;
