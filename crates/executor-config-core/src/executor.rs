//! Component instances
//!
//! An [`ExecutorInstance`] is one deployed copy of a validated component. It
//! owns its configuration sources and derives its workspace from them on
//! every access.

use std::path::PathBuf;

use crate::contract::HandlerSpec;
use crate::error::Result;
use crate::metas::{Metas, RuntimeArgs};
use crate::registry::ValidatedComponent;
use crate::resolver::{ensure_dir, resolve_workspace, EffectiveConfig};

/// A constructed component with its configuration
#[derive(Debug, Clone)]
pub struct ExecutorInstance {
    component: ValidatedComponent,
    metas: Metas,
    runtime_args: RuntimeArgs,
}

impl ExecutorInstance {
    /// Create an instance of a validated component
    ///
    /// Unnamed metas take the component's type name.
    pub fn new(component: &ValidatedComponent, mut metas: Metas, runtime_args: RuntimeArgs) -> Self {
        if metas.name.as_deref().map_or(true, str::is_empty) {
            metas.name = Some(component.name().to_string());
        }
        Self {
            component: component.clone(),
            metas,
            runtime_args,
        }
    }

    pub fn component(&self) -> &ValidatedComponent {
        &self.component
    }

    pub fn metas(&self) -> &Metas {
        &self.metas
    }

    pub fn runtime_args(&self) -> &RuntimeArgs {
        &self.runtime_args
    }

    /// Merged view of both configuration sources
    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig::merge(&self.metas, &self.runtime_args)
    }

    /// Private directory of this replica/shard; recomputed on every call
    pub fn workspace(&self) -> Result<PathBuf> {
        resolve_workspace(&self.metas, &self.runtime_args)
    }

    /// Resolve the workspace and make sure the directory exists
    ///
    /// Safe to call repeatedly and from sibling shards creating nested
    /// directories at the same time.
    pub fn ensure_workspace(&self) -> Result<PathBuf> {
        let path = self.workspace()?;
        ensure_dir(&path)?;
        Ok(path)
    }

    /// Handler serving `endpoint`, falling back to the default handler
    pub fn handler_for(&self, endpoint: &str) -> Option<&HandlerSpec> {
        let handlers = &self.component.descriptor().handlers;
        handlers
            .iter()
            .find(|h| h.endpoints.iter().any(|e| e == endpoint))
            .or_else(|| handlers.iter().find(|h| h.is_default()))
    }
}
