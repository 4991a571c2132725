// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing the format implementations.
//!
//! Each format adapter implements the parser, generator and validator ports for
//! one external representation. [`AdapterRegistry`] maps format keys to them and
//! [`FileSource`] reads input documents from disk.

pub mod docker_compose;
pub mod file_source;
pub mod nginx_conf;
pub mod registry;
pub mod traefik_dynamic;
mod yaml_doc;

// Re-export adapters
pub use docker_compose::DockerComposeAdapter;
pub use file_source::{FileSource, MAX_FILE_SIZE};
pub use nginx_conf::NginxConfAdapter;
pub use registry::AdapterRegistry;
pub use traefik_dynamic::TraefikDynamicAdapter;
