//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_actor_directory;
mod json_menu_catalog;
mod ocs_actor_directory;

pub use in_memory_actor_directory::{DirectorySeed, InMemoryActorDirectory};
pub use json_menu_catalog::{load_menu_from_file, load_menu_from_json};
pub use ocs_actor_directory::{OcsActorDirectory, OcsDirectoryConfig};
