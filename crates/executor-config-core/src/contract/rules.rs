//! Contract rules
//!
//! Each rule looks at one aspect of a [`ComponentDescriptor`] and reports
//! every problem it finds. Rules are independent; the validator runs all of
//! them and rejects the component if any finding is produced.

use std::collections::{HashMap, HashSet};

use super::{
    ComponentDescriptor, ConstructorParam, ContractFinding, ContractTarget, HandlerParam,
    Signature,
};

/// A structural check over a component declaration
pub trait ContractRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &str;

    /// Description of what this rule checks
    fn description(&self) -> &str;

    /// Evaluate the rule, returning an empty list when the component passes
    fn evaluate(&self, component: &ComponentDescriptor) -> Vec<ContractFinding>;
}

/// Compare a signature against the keyword arguments the orchestrator sends
///
/// A catch-all signature accepts any call. Otherwise the declared names must
/// be exactly the vocabulary: a missing name would make the call fail and an
/// extra one could never be supplied.
fn check_vocabulary(
    rule_id: &str,
    target: &ContractTarget,
    signature: &Signature,
    vocabulary: &[&str],
) -> Vec<ContractFinding> {
    if signature.catch_all {
        return Vec::new();
    }

    let mut findings = Vec::new();

    for param in &signature.params {
        if !vocabulary.contains(&param.name.as_str()) {
            findings.push(ContractFinding::new(
                rule_id,
                target.clone(),
                format!(
                    "parameter '{}' is not recognized (expected a subset of: {})",
                    param.name,
                    vocabulary.join(", ")
                ),
            ));
        }
    }

    for name in vocabulary {
        if !signature.declares(name) {
            findings.push(ContractFinding::new(
                rule_id,
                target.clone(),
                format!(
                    "does not accept keyword argument '{}'; declare it or accept arbitrary keyword arguments",
                    name
                ),
            ));
        }
    }

    findings
}

/// Constructors must accept `metas`, `requests` and `runtime_args`
pub struct ConstructorContractRule;

impl ContractRule for ConstructorContractRule {
    fn id(&self) -> &str {
        "constructor-contract"
    }

    fn description(&self) -> &str {
        "Constructor accepts the keyword arguments every component is created with"
    }

    fn evaluate(&self, component: &ComponentDescriptor) -> Vec<ContractFinding> {
        check_vocabulary(
            self.id(),
            &ContractTarget::Constructor,
            &component.constructor,
            &ConstructorParam::names(),
        )
    }
}

/// Request handlers must accept the request keyword arguments
pub struct HandlerContractRule;

impl ContractRule for HandlerContractRule {
    fn id(&self) -> &str {
        "handler-contract"
    }

    fn description(&self) -> &str {
        "Request handlers accept the keyword arguments every request is dispatched with"
    }

    fn evaluate(&self, component: &ComponentDescriptor) -> Vec<ContractFinding> {
        let vocabulary = HandlerParam::names();
        component
            .handlers
            .iter()
            .flat_map(|handler| {
                check_vocabulary(
                    self.id(),
                    &ContractTarget::Handler(handler.method.clone()),
                    &handler.signature,
                    &vocabulary,
                )
            })
            .collect()
    }
}

/// No signature may declare the same parameter twice
pub struct DuplicateParameterRule;

impl DuplicateParameterRule {
    fn check(&self, target: ContractTarget, signature: &Signature) -> Vec<ContractFinding> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut findings = Vec::new();

        for param in &signature.params {
            let name = param.name.as_str();
            if !seen.insert(name) && reported.insert(name) {
                findings.push(ContractFinding::new(
                    self.id(),
                    target.clone(),
                    format!("parameter '{}' is declared more than once", name),
                ));
            }
        }

        findings
    }
}

impl ContractRule for DuplicateParameterRule {
    fn id(&self) -> &str {
        "duplicate-parameter"
    }

    fn description(&self) -> &str {
        "Parameter names are unique within a signature"
    }

    fn evaluate(&self, component: &ComponentDescriptor) -> Vec<ContractFinding> {
        let mut findings = self.check(ContractTarget::Constructor, &component.constructor);
        for handler in &component.handlers {
            findings.extend(self.check(
                ContractTarget::Handler(handler.method.clone()),
                &handler.signature,
            ));
        }
        findings
    }
}

/// Handler names are unique, there is at most one default handler and every
/// endpoint resolves to a single handler
pub struct HandlerBindingRule;

impl ContractRule for HandlerBindingRule {
    fn id(&self) -> &str {
        "handler-binding"
    }

    fn description(&self) -> &str {
        "Every endpoint is served by exactly one request handler"
    }

    fn evaluate(&self, component: &ComponentDescriptor) -> Vec<ContractFinding> {
        let mut findings = Vec::new();
        let mut methods = HashSet::new();
        let mut default_handler: Option<&str> = None;
        let mut endpoints: HashMap<&str, &str> = HashMap::new();

        for handler in &component.handlers {
            let target = ContractTarget::Handler(handler.method.clone());

            if handler.method.trim().is_empty() {
                findings.push(ContractFinding::new(
                    self.id(),
                    ContractTarget::Component,
                    "request handler has an empty method name",
                ));
            } else if !methods.insert(handler.method.as_str()) {
                findings.push(ContractFinding::new(
                    self.id(),
                    target.clone(),
                    "method is registered as a request handler more than once",
                ));
            }

            if handler.is_default() {
                match default_handler {
                    Some(existing) => findings.push(ContractFinding::new(
                        self.id(),
                        target.clone(),
                        format!("'{}' is already the default handler", existing),
                    )),
                    None => default_handler = Some(handler.method.as_str()),
                }
            }

            for endpoint in &handler.endpoints {
                if endpoint.trim().is_empty() {
                    findings.push(ContractFinding::new(
                        self.id(),
                        target.clone(),
                        "endpoint name is empty",
                    ));
                    continue;
                }
                if let Some(existing) = endpoints.insert(endpoint.as_str(), handler.method.as_str()) {
                    findings.push(ContractFinding::new(
                        self.id(),
                        target.clone(),
                        format!("endpoint '{}' is already bound to '{}'", endpoint, existing),
                    ));
                }
            }
        }

        findings
    }
}
