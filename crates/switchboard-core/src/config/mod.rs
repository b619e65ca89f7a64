//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use switchboard_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Timeout: {:?}", cfg.router.timeout());
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_config, load_config_with_env, save_config};
pub use schema::{AdvisorConfig, Config, RouterConfig};
