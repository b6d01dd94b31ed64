//! Executor Config Core
//!
//! Configuration plumbing for components deployed by a distributed
//! processing framework.
//!
//! ## Features
//!
//! - **Workspace Resolution**: derive each replica/shard's private directory
//!   from layered `metas` and `runtime_args`
//! - **Contract Validation**: reject components whose constructor or request
//!   handlers cannot be called by the orchestrator, at registration time
//! - **Registry**: only validated components can be instantiated
//! - **Config Loading**: YAML, JSON and TOML documents plus environment
//!   variables
//!
//! ## Architecture
//!
//! 1. **Metas** (`metas`): the two configuration sources.
//! 2. **Resolver** (`resolver`): field-by-field merge and path composition.
//! 3. **Contract** (`contract/`): declared signatures and the rules that
//!    check them.
//! 4. **Registry** (`registry`): validation gate for component types.
//! 5. **Executor** (`executor`): a component instance and its workspace.
//! 6. **Loader** (`loader`): configuration documents and manifests.
//!
//! ## Example
//!
//! ```rust
//! use executor_config_core::{resolve_workspace, Metas, RuntimeArgs};
//! use std::path::PathBuf;
//!
//! let metas = Metas::named("t").with_workspace("/tmp/ws");
//! let runtime_args = RuntimeArgs::new().with_pea_id(1).with_replica_id(2);
//!
//! let workspace = resolve_workspace(&metas, &runtime_args).unwrap();
//! assert_eq!(workspace, PathBuf::from("/tmp/ws/t/2/1"));
//! ```

pub mod contract;
pub mod error;
pub mod executor;
pub mod loader;
pub mod metas;
pub mod registry;
pub mod resolver;

pub use contract::{
    Component, ComponentDescriptor, ConstructorParam, ContractFinding, ContractTarget,
    ContractValidator, HandlerParam, HandlerSpec, Param, Signature,
};
pub use error::{ConfigError, ContractViolation, Result};
pub use executor::ExecutorInstance;
pub use loader::{ComponentConfig, ComponentManifest, DocumentFormat};
pub use metas::{present_id, Metas, RuntimeArgs, DEFAULT_ENV_PREFIX, UNSET_ID};
pub use registry::{ComponentRegistry, ValidatedComponent};
pub use resolver::{ensure_dir, resolve_workspace, EffectiveConfig};

/// Crate version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
