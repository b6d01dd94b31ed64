//! Integration tests for executor-config-core
//!
//! Covers:
//! - Workspace resolution scenarios and precedence properties
//! - Sentinel handling for replica and pea ids
//! - Registration-time contract validation
//! - Concurrent workspace creation by sibling shards

use executor_config_core::{
    Component, ComponentRegistry, ConfigError, ConstructorParam, ExecutorInstance, HandlerParam,
    HandlerSpec, Metas, RuntimeArgs, Signature, ComponentConfig, DocumentFormat,
    resolve_workspace,
};
use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn absolute_workspace() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..4).prop_map(|parts| format!("/{}", parts.join("/")))
}

fn unset_id() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![Just(None), Just(Some(-1))]
}

proptest! {
    #[test]
    fn metas_workspace_wins(
        name in segment(),
        declared in absolute_workspace(),
        injected in absolute_workspace(),
    ) {
        let metas = Metas::named(&name).with_workspace(&declared);
        let with_runtime = resolve_workspace(&metas, &RuntimeArgs::new().with_workspace(&injected)).unwrap();
        let without_runtime = resolve_workspace(&metas, &RuntimeArgs::new()).unwrap();
        prop_assert_eq!(with_runtime, without_runtime);
    }

    #[test]
    fn workspace_is_workspace_joined_with_name(name in segment(), workspace in absolute_workspace()) {
        let path = resolve_workspace(&Metas::named(&name).with_workspace(&workspace), &RuntimeArgs::new()).unwrap();
        prop_assert_eq!(path, PathBuf::from(&workspace).join(&name));
    }

    #[test]
    fn replica_precedes_pea(
        name in segment(),
        workspace in absolute_workspace(),
        replica_id in 0i64..1000,
        pea_id in 0i64..1000,
    ) {
        let runtime_args = RuntimeArgs::new()
            .with_workspace(&workspace)
            .with_pea_id(pea_id)
            .with_replica_id(replica_id);
        let path = resolve_workspace(&Metas::named(&name), &runtime_args).unwrap();
        prop_assert_eq!(
            path,
            PathBuf::from(&workspace).join(&name).join(replica_id.to_string()).join(pea_id.to_string())
        );
    }

    #[test]
    fn sentinel_ids_drop_segments(
        name in segment(),
        workspace in absolute_workspace(),
        replica_id in unset_id(),
        pea_id in unset_id(),
    ) {
        let runtime_args = RuntimeArgs { workspace: Some(workspace.clone()), replica_id, pea_id, ..Default::default() };
        let path = resolve_workspace(&Metas::named(&name), &runtime_args).unwrap();
        prop_assert_eq!(path, PathBuf::from(&workspace).join(&name));
    }

    #[test]
    fn resolution_is_idempotent(
        name in segment(),
        workspace in absolute_workspace(),
        replica_id in prop::option::of(-1i64..5),
        pea_id in prop::option::of(-1i64..5),
    ) {
        let metas = Metas::named(&name);
        let runtime_args = RuntimeArgs { workspace: Some(workspace), replica_id, pea_id, ..Default::default() };
        prop_assert_eq!(
            resolve_workspace(&metas, &runtime_args).unwrap(),
            resolve_workspace(&metas, &runtime_args).unwrap()
        );
    }
}

#[test]
fn test_replica_with_unset_pea() {
    for replica_id in [0, 1, 2] {
        for pea_id in [None, Some(-1)] {
            let runtime_args = RuntimeArgs {
                workspace: Some("/tmp/ws".to_string()),
                replica_id: Some(replica_id),
                pea_id,
                ..Default::default()
            };
            assert_eq!(
                resolve_workspace(&Metas::named("test"), &runtime_args).unwrap(),
                PathBuf::from(format!("/tmp/ws/test/{}", replica_id))
            );
        }
    }
}

#[test]
fn test_pea_with_unset_replica() {
    for pea_id in [0, 1, 2] {
        for replica_id in [None, Some(-1)] {
            let runtime_args = RuntimeArgs {
                workspace: Some("/tmp/ws".to_string()),
                replica_id,
                pea_id: Some(pea_id),
                ..Default::default()
            };
            assert_eq!(
                resolve_workspace(&Metas::named("test"), &runtime_args).unwrap(),
                PathBuf::from(format!("/tmp/ws/test/{}", pea_id))
            );
        }
    }
}

#[test]
fn test_scenarios_from_documents() {
    let config = ComponentConfig::parse(
        DocumentFormat::Json,
        r#"{"metas": {"name": "t", "workspace": "/tmp/ws"}, "runtime_args": {"pea_id": 1, "replica_id": 2}}"#,
    )
    .unwrap();
    assert_eq!(
        resolve_workspace(&config.metas, &config.runtime_args).unwrap(),
        PathBuf::from("/tmp/ws/t/2/1")
    );

    let config = ComponentConfig::parse(
        DocumentFormat::Yaml,
        "metas:\n  name: t\nruntime_args:\n  workspace: /tmp/ws\n  pea_id: null\n  replica_id: null\n",
    )
    .unwrap();
    assert_eq!(
        resolve_workspace(&config.metas, &config.runtime_args).unwrap(),
        PathBuf::from("/tmp/ws/t")
    );
}

#[test]
fn test_missing_workspace_is_an_error() {
    let err = resolve_workspace(&Metas::named("t"), &RuntimeArgs::new()).unwrap_err();
    assert!(matches!(err, ConfigError::WorkspaceNotSet));
}

struct GoodExecutor;

impl Component for GoodExecutor {
    const NAME: &'static str = "GoodExecutor";

    fn constructor() -> Signature {
        Signature::catch_all()
    }

    fn handlers() -> Vec<HandlerSpec> {
        vec![HandlerSpec::new("foo", Signature::catch_all())]
    }
}

struct GoodExecutor2;

impl Component for GoodExecutor2 {
    const NAME: &'static str = "GoodExecutor2";

    fn constructor() -> Signature {
        Signature::from_params(ConstructorParam::ALL)
    }

    fn handlers() -> Vec<HandlerSpec> {
        vec![HandlerSpec::new("foo", Signature::from_params(HandlerParam::ALL))]
    }
}

struct BadExecutor1;

impl Component for BadExecutor1 {
    const NAME: &'static str = "BadExecutor1";

    fn constructor() -> Signature {
        Signature::new()
    }

    fn handlers() -> Vec<HandlerSpec> {
        vec![HandlerSpec::new("foo", Signature::catch_all())]
    }
}

struct BadExecutor2;

impl Component for BadExecutor2 {
    const NAME: &'static str = "BadExecutor2";

    fn constructor() -> Signature {
        Signature::catch_all()
    }

    fn handlers() -> Vec<HandlerSpec> {
        vec![HandlerSpec::new("foo", Signature::new())]
    }
}

struct BadExecutor3;

impl Component for BadExecutor3 {
    const NAME: &'static str = "BadExecutor3";

    fn constructor() -> Signature {
        Signature::catch_all()
    }

    fn handlers() -> Vec<HandlerSpec> {
        vec![HandlerSpec::new("foo", Signature::from_params(HandlerParam::ALL).param("query"))]
    }
}

#[test]
fn test_good_components_register_and_instantiate() {
    let mut registry = ComponentRegistry::new();
    let good = registry.register::<GoodExecutor>().unwrap();
    let good2 = registry.register::<GoodExecutor2>().unwrap();

    let exec1 = ExecutorInstance::new(&good, Metas::default(), RuntimeArgs::new());
    let exec2 = ExecutorInstance::new(&good2, Metas::default(), RuntimeArgs::new());
    assert_eq!(exec1.metas().name.as_deref(), Some("GoodExecutor"));
    assert_eq!(exec2.metas().name.as_deref(), Some("GoodExecutor2"));
}

#[test]
fn test_bad_components_are_rejected() {
    let mut registry = ComponentRegistry::new();

    let err = registry.register::<BadExecutor1>().unwrap_err();
    assert!(err.has_rule("constructor-contract"));

    let err = registry.register::<BadExecutor2>().unwrap_err();
    assert!(err.has_rule("handler-contract"));
    assert!(!err.has_rule("constructor-contract"));

    let err = registry.register::<BadExecutor3>().unwrap_err();
    assert_eq!(err.findings.len(), 1);
    assert!(err.findings[0].message.contains("'query'"));

    assert!(registry.is_empty());
}

#[test]
fn test_concurrent_workspace_creation() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = dir.path().to_string_lossy().to_string();
    let mut registry = ComponentRegistry::new();
    let component = Arc::new(registry.register::<GoodExecutor>().unwrap());

    let handles: Vec<_> = (0..4)
        .flat_map(|replica_id| (-1..3).map(move |pea_id| (replica_id, pea_id)))
        .map(|(replica_id, pea_id)| {
            let component = Arc::clone(&component);
            let workspace = workspace.clone();
            thread::spawn(move || {
                let instance = ExecutorInstance::new(
                    &component,
                    Metas::named("shared").with_workspace(workspace),
                    RuntimeArgs::new().with_replica_id(replica_id).with_pea_id(pea_id),
                );
                instance.ensure_workspace()
            })
        })
        .collect();

    for handle in handles {
        let path = handle.join().unwrap().unwrap();
        assert!(path.is_dir());
    }
    assert!(dir.path().join("shared").join("3").join("2").is_dir());
}
