//! Component calling contract
//!
//! The orchestrator creates components and calls their request handlers with
//! keyword arguments only. A component therefore declares, up front, which
//! parameter names its constructor and each handler accept, and the
//! [`ContractValidator`] checks those declarations once, when the component
//! is registered.
//!
//! Constructors receive `metas`, `requests` and `runtime_args`. Handlers
//! receive `docs`, `parameters`, `docs_matrix`, `groundtruths` and
//! `groundtruths_matrix`. A signature either names every one of them or
//! accepts arbitrary keyword arguments through a catch-all.
//!
//! # Example
//!
//! ```rust
//! use executor_config_core::contract::{
//!     Component, ComponentDescriptor, ContractValidator, HandlerSpec, Signature,
//! };
//!
//! struct Indexer;
//!
//! impl Component for Indexer {
//!     const NAME: &'static str = "Indexer";
//!
//!     fn constructor() -> Signature {
//!         Signature::catch_all()
//!     }
//!
//!     fn handlers() -> Vec<HandlerSpec> {
//!         vec![HandlerSpec::new("index", Signature::catch_all()).on("/index")]
//!     }
//! }
//!
//! let validator = ContractValidator::new();
//! assert!(validator.validate(&ComponentDescriptor::of::<Indexer>()).is_ok());
//! ```

pub mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ContractViolation;
use rules::ContractRule;

/// Keyword arguments the orchestrator passes to every constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorParam {
    Metas,
    Requests,
    RuntimeArgs,
}

impl ConstructorParam {
    /// The full constructor vocabulary in call order
    pub const ALL: [ConstructorParam; 3] = [
        ConstructorParam::Metas,
        ConstructorParam::Requests,
        ConstructorParam::RuntimeArgs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructorParam::Metas => "metas",
            ConstructorParam::Requests => "requests",
            ConstructorParam::RuntimeArgs => "runtime_args",
        }
    }

    /// Vocabulary as plain names
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.as_str()).collect()
    }
}

impl fmt::Display for ConstructorParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstructorParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown constructor parameter: {}", s))
    }
}

/// Keyword arguments the orchestrator passes to every request handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerParam {
    /// Document batch of the request
    Docs,
    /// Request parameters
    Parameters,
    /// Request-level document matrix
    DocsMatrix,
    /// Ground-truth batch
    Groundtruths,
    /// Ground-truth matrix
    GroundtruthsMatrix,
}

impl HandlerParam {
    /// The full handler vocabulary in call order
    pub const ALL: [HandlerParam; 5] = [
        HandlerParam::Docs,
        HandlerParam::Parameters,
        HandlerParam::DocsMatrix,
        HandlerParam::Groundtruths,
        HandlerParam::GroundtruthsMatrix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerParam::Docs => "docs",
            HandlerParam::Parameters => "parameters",
            HandlerParam::DocsMatrix => "docs_matrix",
            HandlerParam::Groundtruths => "groundtruths",
            HandlerParam::GroundtruthsMatrix => "groundtruths_matrix",
        }
    }

    /// Vocabulary as plain names
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.as_str()).collect()
    }
}

impl fmt::Display for HandlerParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown handler parameter: {}", s))
    }
}

/// A declared formal parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ParamDecl")]
pub struct Param {
    pub name: String,
    /// Whether the parameter can be omitted by the caller
    pub has_default: bool,
}

impl Param {
    /// A parameter the caller must supply
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_default: false,
        }
    }

    /// A parameter with a default value
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_default: true,
        }
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        Param::required(name)
    }
}

impl From<ConstructorParam> for Param {
    fn from(param: ConstructorParam) -> Self {
        Param::required(param.as_str())
    }
}

impl From<HandlerParam> for Param {
    fn from(param: HandlerParam) -> Self {
        Param::required(param.as_str())
    }
}

/// Manifests may write a parameter as a bare name or as a table
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamDecl {
    Name(String),
    Full {
        name: String,
        #[serde(default, alias = "has_default")]
        default: bool,
    },
}

impl From<ParamDecl> for Param {
    fn from(decl: ParamDecl) -> Self {
        match decl {
            ParamDecl::Name(name) => Param::required(name),
            ParamDecl::Full { name, default } => Param {
                name,
                has_default: default,
            },
        }
    }
}

/// Declared keyword interface of a constructor or handler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signature {
    /// Named parameters in declaration order
    pub params: Vec<Param>,
    /// Accepts arbitrary additional keyword arguments
    pub catch_all: bool,
}

impl Signature {
    /// A signature with no parameters and no catch-all
    pub fn new() -> Self {
        Self::default()
    }

    /// A signature that accepts any keyword arguments
    pub fn catch_all() -> Self {
        Self {
            params: Vec::new(),
            catch_all: true,
        }
    }

    /// A signature naming exactly the given parameters
    pub fn from_params<I, P>(params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            catch_all: false,
        }
    }

    /// Add a parameter
    pub fn param(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Also accept arbitrary keyword arguments
    pub fn with_catch_all(mut self) -> Self {
        self.catch_all = true;
        self
    }

    /// Whether a call passing `name` by keyword would bind
    pub fn accepts(&self, name: &str) -> bool {
        self.catch_all || self.declares(name)
    }

    /// Whether `name` is declared explicitly
    pub fn declares(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                if p.has_default {
                    format!("{}=..", p.name)
                } else {
                    p.name.clone()
                }
            })
            .collect();
        if self.catch_all {
            parts.push("**kwargs".to_string());
        }
        write!(f, "({})", parts.join(", "))
    }
}

/// A method registered as a request handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSpec {
    /// Method name, unique within the component
    pub method: String,
    /// Endpoints served by this handler; empty marks the default handler
    #[serde(default, rename = "on")]
    pub endpoints: Vec<String>,
    #[serde(flatten)]
    pub signature: Signature,
}

impl HandlerSpec {
    /// Create a default handler
    pub fn new(method: impl Into<String>, signature: Signature) -> Self {
        Self {
            method: method.into(),
            endpoints: Vec::new(),
            signature,
        }
    }

    /// Bind the handler to an endpoint
    pub fn on(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.push(endpoint.into());
        self
    }

    /// Whether this handler serves endpoints nobody else is bound to
    pub fn is_default(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Declared interface of a component type
///
/// Implemented by every component that can be registered. The declarations
/// stand in for inspecting the real constructor and methods.
pub trait Component {
    /// Type name, also the default instance name
    const NAME: &'static str;

    /// Keyword interface of the constructor
    fn constructor() -> Signature;

    /// Request handlers of the component
    fn handlers() -> Vec<HandlerSpec>;
}

/// Everything the validator needs to know about a component type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub name: String,
    #[serde(default)]
    pub constructor: Signature,
    #[serde(default)]
    pub handlers: Vec<HandlerSpec>,
}

impl ComponentDescriptor {
    /// Describe a [`Component`] implementation
    pub fn of<T: Component>() -> Self {
        Self {
            name: T::NAME.to_string(),
            constructor: T::constructor(),
            handlers: T::handlers(),
        }
    }

    /// Find a handler by method name
    pub fn handler(&self, method: &str) -> Option<&HandlerSpec> {
        self.handlers.iter().find(|h| h.method == method)
    }
}

/// Where in a component a finding was detected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "method", rename_all = "snake_case")]
pub enum ContractTarget {
    Constructor,
    Handler(String),
    Component,
}

impl fmt::Display for ContractTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractTarget::Constructor => write!(f, "constructor"),
            ContractTarget::Handler(method) => write!(f, "handler '{}'", method),
            ContractTarget::Component => write!(f, "component"),
        }
    }
}

/// A single contract rule failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFinding {
    /// Identifier of the rule that produced the finding
    pub rule_id: String,
    pub target: ContractTarget,
    pub message: String,
}

impl ContractFinding {
    pub fn new(rule_id: impl Into<String>, target: ContractTarget, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            target,
            message: message.into(),
        }
    }
}

impl fmt::Display for ContractFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.rule_id, self.target, self.message)
    }
}

/// Checks component declarations against the calling contract
///
/// Validation is structural. It never creates the component and never calls
/// a handler, so it is safe to run on any descriptor.
pub struct ContractValidator {
    rules: Vec<Arc<dyn ContractRule>>,
}

impl Default for ContractValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractValidator {
    /// Create a validator with the default rule set
    pub fn new() -> Self {
        let mut validator = Self::empty();
        validator.register(Arc::new(rules::ConstructorContractRule));
        validator.register(Arc::new(rules::HandlerContractRule));
        validator.register(Arc::new(rules::DuplicateParameterRule));
        validator.register(Arc::new(rules::HandlerBindingRule));
        validator
    }

    /// Create a validator without rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register an additional rule
    pub fn register(&mut self, rule: Arc<dyn ContractRule>) {
        self.rules.push(rule);
    }

    /// Registered rules
    pub fn rules(&self) -> &[Arc<dyn ContractRule>] {
        &self.rules
    }

    /// Run every rule and collect the findings
    pub fn findings(&self, component: &ComponentDescriptor) -> Vec<ContractFinding> {
        let mut findings = Vec::new();
        for rule in &self.rules {
            let found = rule.evaluate(component);
            if !found.is_empty() {
                tracing::debug!(
                    component = %component.name,
                    rule = rule.id(),
                    check = rule.description(),
                    findings = found.len(),
                    "Contract rule failed"
                );
            }
            findings.extend(found);
        }
        findings
    }

    /// Validate a component, failing with every finding at once
    pub fn validate(&self, component: &ComponentDescriptor) -> Result<(), ContractViolation> {
        let findings = self.findings(component);
        if findings.is_empty() {
            return Ok(());
        }

        tracing::warn!(
            component = %component.name,
            findings = findings.len(),
            "Component rejected by contract validation"
        );
        Err(ContractViolation::new(&component.name, findings))
    }
}
