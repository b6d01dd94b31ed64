//! CLI command definitions for executor-config
//!
//! Clap-based commands for resolving a component's workspace and for
//! checking component manifests before deployment.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use executor_config_core::resolver::ensure_dir;
use executor_config_core::{
    ComponentConfig, ComponentManifest, ConfigError, ContractValidator, EffectiveConfig,
    ExecutorInstance, Metas, RuntimeArgs, ValidatedComponent, DEFAULT_ENV_PREFIX,
};

use super::output::{CheckOutput, ComponentReport, OutputFormat, WorkspaceOutput};
use super::ExitCode;
use crate::error::CliError;

/// executor-config CLI
///
/// Resolve component workspaces and check component declarations.
#[derive(Parser, Debug)]
#[command(name = "executor-config")]
#[command(about = "Resolve executor workspaces and check component contracts", long_about = None)]
#[command(version)]
pub struct ExecutorCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: ExecutorCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum ExecutorCommands {
    /// Resolve the workspace directory of a component instance
    ///
    /// Runtime arguments are layered: configuration file, then environment
    /// (when --env-prefix is given), then flags.
    Workspace(WorkspaceArgs),

    /// Check component manifests against the calling contract
    Check {
        /// Manifest files (YAML, JSON or TOML)
        #[arg(short, long, num_args = 1.., required = true)]
        manifests: Vec<PathBuf>,

        /// Output format for check results
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Arguments of the `workspace` command
#[derive(Args, Debug, Default)]
pub struct WorkspaceArgs {
    /// Configuration file with `metas` and `runtime_args` sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Component manifest; validated before resolving, its name is the default instance name
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Runtime workspace root
    #[arg(short, long)]
    pub workspace: Option<String>,

    /// Runtime name
    #[arg(long)]
    pub name: Option<String>,

    /// Replica id (-1 for none)
    #[arg(long, allow_negative_numbers = true)]
    pub replica_id: Option<i64>,

    /// Pea id (-1 for none)
    #[arg(long, allow_negative_numbers = true)]
    pub pea_id: Option<i64>,

    /// Read runtime arguments from <PREFIX>__WORKSPACE, <PREFIX>__REPLICA_ID, ...
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_ENV_PREFIX)]
    pub env_prefix: Option<String>,

    /// Create the workspace directory
    #[arg(long)]
    pub create: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: Option<OutputFormat>,
}

impl WorkspaceArgs {
    /// Runtime arguments given as flags
    fn flag_runtime_args(&self) -> RuntimeArgs {
        RuntimeArgs {
            name: self.name.clone(),
            workspace: self.workspace.clone(),
            replica_id: self.replica_id,
            pea_id: self.pea_id,
        }
    }
}

/// Merge every configuration layer into `metas` and `runtime_args`
pub fn load_sources(args: &WorkspaceArgs) -> Result<(Metas, RuntimeArgs), CliError> {
    layer_sources(args, RuntimeArgs::from_env)
}

/// Layer file, environment and flags; `read_env` supplies the environment
/// layer for the configured prefix
fn layer_sources<F>(args: &WorkspaceArgs, read_env: F) -> Result<(Metas, RuntimeArgs), CliError>
where
    F: FnOnce(&str) -> Result<RuntimeArgs, ConfigError>,
{
    let document = match &args.config {
        Some(path) => ComponentConfig::from_file(path)?,
        None => ComponentConfig::default(),
    };

    let mut runtime_args = document.runtime_args;
    if let Some(prefix) = &args.env_prefix {
        runtime_args = runtime_args.overlay(read_env(prefix)?);
    }
    runtime_args = runtime_args.overlay(args.flag_runtime_args());

    Ok((document.metas, runtime_args))
}

/// Resolve the workspace described by the arguments
///
/// With a manifest, the component is validated first and its name becomes
/// the default instance name.
pub fn resolve(args: &WorkspaceArgs, metas: Metas, runtime_args: RuntimeArgs) -> Result<WorkspaceOutput, CliError> {
    let (path, effective) = match &args.manifest {
        Some(manifest) => {
            let descriptor = ComponentManifest::from_file(manifest)?.into_descriptor();
            let component = ValidatedComponent::from_descriptor(&ContractValidator::new(), descriptor)?;
            let instance = ExecutorInstance::new(&component, metas, runtime_args);
            let path = if args.create {
                instance.ensure_workspace()?
            } else {
                instance.workspace()?
            };
            (path, instance.effective_config())
        }
        None => {
            let effective = EffectiveConfig::merge(&metas, &runtime_args);
            let path = effective.workspace_path()?;
            if args.create {
                ensure_dir(&path)?;
            }
            (path, effective)
        }
    };

    Ok(WorkspaceOutput {
        workspace: path.display().to_string(),
        created: args.create,
        effective,
    })
}

/// Execute the workspace command
pub fn execute_workspace(args: WorkspaceArgs) -> Result<ExitCode, CliError> {
    let (metas, runtime_args) = load_sources(&args)?;
    let output = resolve(&args, metas, runtime_args)?;

    tracing::info!(workspace = %output.workspace, "Workspace resolved");
    println!("{}", output.render(args.format.unwrap_or_default())?);

    Ok(ExitCode::Success)
}

/// Validate every manifest and collect one report per component
pub fn check_manifests(manifests: &[PathBuf]) -> Result<CheckOutput, CliError> {
    if manifests.is_empty() {
        return Err(CliError::invalid_input("At least one manifest is required"));
    }

    let validator = ContractValidator::new();
    let mut components = Vec::with_capacity(manifests.len());

    for path in manifests {
        let descriptor = ComponentManifest::from_file(path)?.into_descriptor();
        let findings = validator.findings(&descriptor);
        tracing::debug!(
            manifest = %path.display(),
            component = %descriptor.name,
            findings = findings.len(),
            "Checked manifest"
        );
        components.push(ComponentReport {
            component: descriptor.name,
            manifest: path.display().to_string(),
            valid: findings.is_empty(),
            findings,
        });
    }

    Ok(CheckOutput::new(components))
}

/// Execute the check command
pub fn execute_check(
    manifests: Vec<PathBuf>,
    format: Option<OutputFormat>,
) -> Result<ExitCode, CliError> {
    let output = check_manifests(&manifests)?;
    println!("{}", output.render(format.unwrap_or_default())?);

    if output.valid {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::ContractViolation)
    }
}
