//! Workspace resolution
//!
//! Merges [`Metas`] and [`RuntimeArgs`] into an [`EffectiveConfig`] and turns
//! it into the private directory of one replica/shard:
//!
//! ```text
//! <workspace>/<name>[/<replica_id>][/<pea_id>]
//! ```
//!
//! Precedence is decided per field and is intentionally not uniform:
//!
//! | field | rule |
//! |---|---|
//! | `workspace` | metas, then runtime args |
//! | `name` | metas, then runtime args |
//! | `replica_id` | runtime args only |
//! | `pea_id` | runtime args only |
//!
//! Resolution is pure. It never touches the filesystem apart from reading
//! the current directory to anchor a relative workspace. Creating the
//! directory is a separate step, see [`ensure_dir`].

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::metas::{present_id, present_str, Metas, RuntimeArgs};

/// Configuration after both sources have been merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Component instance / shard group name
    pub name: Option<String>,
    /// Workspace root
    pub workspace: Option<String>,
    /// Replica id, `None` when absent or set to the sentinel
    pub replica_id: Option<i64>,
    /// Pea id, `None` when absent or set to the sentinel
    pub pea_id: Option<i64>,
}

impl EffectiveConfig {
    /// Merge the two configuration sources field by field
    pub fn merge(metas: &Metas, runtime_args: &RuntimeArgs) -> Self {
        let workspace = present_str(metas.workspace.as_deref())
            .or_else(|| present_str(runtime_args.workspace.as_deref()))
            .map(str::to_owned);

        let name = present_str(metas.name.as_deref())
            .or_else(|| present_str(runtime_args.name.as_deref()))
            .map(str::to_owned);

        Self {
            name,
            workspace,
            replica_id: present_id(runtime_args.replica_id),
            pea_id: present_id(runtime_args.pea_id),
        }
    }

    /// Compose the absolute workspace path for this configuration
    pub fn workspace_path(&self) -> Result<PathBuf> {
        let workspace = self.workspace.as_deref().ok_or(ConfigError::WorkspaceNotSet)?;
        let name = self.name.as_deref().ok_or(ConfigError::NameNotSet)?;

        let mut path = PathBuf::from(workspace);
        path.push(name);
        if let Some(replica_id) = self.replica_id {
            path.push(replica_id.to_string());
        }
        if let Some(pea_id) = self.pea_id {
            path.push(pea_id.to_string());
        }

        absolutize(&path)
    }
}

/// Resolve the workspace directory of a component instance
///
/// Calling this twice with the same inputs yields the same path.
pub fn resolve_workspace(metas: &Metas, runtime_args: &RuntimeArgs) -> Result<PathBuf> {
    let config = EffectiveConfig::merge(metas, runtime_args);
    let path = config.workspace_path()?;

    tracing::debug!(
        name = config.name.as_deref().unwrap_or_default(),
        replica_id = ?config.replica_id,
        pea_id = ?config.pea_id,
        workspace = %path.display(),
        "Resolved component workspace"
    );

    Ok(path)
}

/// Create a resolved workspace directory and any missing parents
///
/// An existing directory is success, including one created concurrently by
/// a sibling shard while this call was walking the same parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && path.is_dir() => {}
        Err(e) => return Err(ConfigError::io(path, e)),
    }
    tracing::debug!(workspace = %path.display(), "Workspace directory ready");
    Ok(())
}

/// Anchor a relative path at the current directory and normalize it
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(clean_path(path));
    }
    let cwd = env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(clean_path(&cwd.join(path)))
}

/// Lexical normalization: drop `.`, let `..` pop a segment, never go above
/// the root. Symlinks are not followed.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => cleaned.push(prefix.as_os_str()),
            Component::RootDir => cleaned.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if cleaned.file_name().is_some() {
                    cleaned.pop();
                }
            }
            Component::Normal(part) => cleaned.push(part),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metas(name: &str, workspace: Option<&str>) -> Metas {
        Metas {
            name: Some(name.to_string()),
            workspace: workspace.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_workspace_prefers_metas() {
        let config = EffectiveConfig::merge(
            &metas("t", Some("/a")),
            &RuntimeArgs::new().with_workspace("/b"),
        );
        assert_eq!(config.workspace.as_deref(), Some("/a"));
    }

    #[test]
    fn test_merge_workspace_falls_back_to_runtime_args() {
        let config = EffectiveConfig::merge(&metas("t", None), &RuntimeArgs::new().with_workspace("/b"));
        assert_eq!(config.workspace.as_deref(), Some("/b"));
    }

    #[test]
    fn test_merge_empty_workspace_counts_as_unset() {
        let config = EffectiveConfig::merge(&metas("t", Some("")), &RuntimeArgs::new().with_workspace("/b"));
        assert_eq!(config.workspace.as_deref(), Some("/b"));

        let runtime_args = RuntimeArgs::new().with_workspace("");
        let config = EffectiveConfig::merge(&metas("t", Some("")), &runtime_args);
        assert_eq!(config.workspace, None);
        assert!(matches!(
            resolve_workspace(&metas("t", Some("")), &runtime_args),
            Err(ConfigError::WorkspaceNotSet)
        ));
        assert!(matches!(
            resolve_workspace(&metas("t", None), &runtime_args),
            Err(ConfigError::WorkspaceNotSet)
        ));
    }

    #[test]
    fn test_merge_name_prefers_metas() {
        let runtime_args = RuntimeArgs {
            name: Some("runtime".to_string()),
            ..Default::default()
        };
        assert_eq!(
            EffectiveConfig::merge(&metas("declared", None), &runtime_args).name.as_deref(),
            Some("declared")
        );
        assert_eq!(
            EffectiveConfig::merge(&Metas::default(), &runtime_args).name.as_deref(),
            Some("runtime")
        );
    }

    #[test]
    fn test_merge_ids_come_from_runtime_args_only() {
        let declared = Metas {
            replica_id: Some(5),
            pea_id: Some(6),
            ..metas("t", Some("/a"))
        };
        let config = EffectiveConfig::merge(&declared, &RuntimeArgs::new());
        assert_eq!(config.replica_id, None);
        assert_eq!(config.pea_id, None);

        let config = EffectiveConfig::merge(&declared, &RuntimeArgs::new().with_replica_id(0).with_pea_id(-1));
        assert_eq!(config.replica_id, Some(0));
        assert_eq!(config.pea_id, None);
    }

    #[test]
    fn test_resolve_replica_then_pea() {
        let path = resolve_workspace(
            &metas("t", Some("/tmp/ws")),
            &RuntimeArgs::new().with_pea_id(1).with_replica_id(2),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/ws/t/2/1"));
    }

    #[test]
    fn test_resolve_runtime_workspace_with_unset_ids() {
        let runtime_args = RuntimeArgs {
            workspace: Some("/tmp/ws".to_string()),
            replica_id: None,
            pea_id: None,
            ..Default::default()
        };
        let path = resolve_workspace(&metas("t", None), &runtime_args).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/ws/t"));
    }

    #[test]
    fn test_resolve_segment_combinations() {
        let m = metas("t", Some("/ws"));
        let cases = [
            (Some(3), Some(4), "/ws/t/3/4"),
            (Some(3), None, "/ws/t/3"),
            (Some(3), Some(-1), "/ws/t/3"),
            (None, Some(4), "/ws/t/4"),
            (Some(-1), Some(4), "/ws/t/4"),
            (Some(-1), Some(-1), "/ws/t"),
            (Some(0), Some(0), "/ws/t/0/0"),
        ];
        for (replica_id, pea_id, expected) in cases {
            let runtime_args = RuntimeArgs {
                replica_id,
                pea_id,
                ..Default::default()
            };
            assert_eq!(
                resolve_workspace(&m, &runtime_args).unwrap(),
                PathBuf::from(expected),
                "replica_id={:?} pea_id={:?}",
                replica_id,
                pea_id
            );
        }
    }

    #[test]
    fn test_resolve_without_workspace_fails() {
        let err = resolve_workspace(&metas("t", None), &RuntimeArgs::new()).unwrap_err();
        assert!(matches!(err, ConfigError::WorkspaceNotSet));
        assert_eq!(err.to_string(), "workspace not set");
    }

    #[test]
    fn test_resolve_without_name_fails() {
        let err = resolve_workspace(&Metas::default().with_workspace("/ws"), &RuntimeArgs::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::NameNotSet));
    }

    #[test]
    fn test_resolve_relative_workspace_is_absolute() {
        let path = resolve_workspace(&metas("t", Some("rel/./dir")), &RuntimeArgs::new()).unwrap();
        let expected = env::current_dir().unwrap().join("rel").join("dir").join("t");
        assert!(path.is_absolute());
        assert_eq!(path, expected);
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("/a/b/")), PathBuf::from("/a/b"));
    }
}
