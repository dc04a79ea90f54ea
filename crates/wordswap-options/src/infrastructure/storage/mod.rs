//! Storage infrastructure: key-value stores and configuration file persistence.
//!
//! - `memory` keeps records in process, for tests and embedding.
//! - `json_file` persists one JSON object to disk, replacing the whole file on
//!   every write.
//! - `config` reads and writes the TOML application config.

pub mod config;
pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
