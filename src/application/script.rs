//! Operation scripts
//!
//! One command per line, `#` comments and blank lines ignored. Entities are
//! addressed by their name path from the root, e.g.
//!
//! ```text
//! check-all-companies "Customer 3/Subscription 3.2" on
//! add-company "Customer 3/Subscription 3.2"
//! check-company "Customer 1/Subscription 1.1/Company 1.1.1" off
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use itertools::Itertools;
use regex::Regex;
use tracing::{debug, instrument};

use crate::application::services::SelectionService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Customer, EntityId, Root, Subscription};

const TOKEN_PATTERN: &str = r#""([^"]*)"|(\S+)"#;

/// `on` / `off` argument of the check commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn as_bool(self) -> bool {
        self == Switch::On
    }
}

impl FromStr for Switch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" => Ok(Switch::On),
            "off" | "false" | "no" => Ok(Switch::Off),
            other => Err(format!("expected on/off, got '{}'", other)),
        }
    }
}

/// `/`-separated names from a customer down to the addressed entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPath(Vec<String>);

impl EntityPath {
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    fn customer<'r>(&self, root: &'r Root) -> Option<&'r Customer> {
        let name = self.0.first()?;
        root.customers().find(|c| c.name() == name)
    }

    fn subscription<'r>(&self, root: &'r Root) -> Option<&'r Subscription> {
        let name = self.0.get(1)?;
        self.customer(root)?
            .subscriptions()
            .find(|s| s.name() == name)
    }

    /// Id of the customer this path names, if it has exactly one segment.
    pub fn resolve_customer(&self, root: &Root) -> Option<EntityId> {
        if self.0.len() != 1 {
            return None;
        }
        self.customer(root).map(|c| c.id().clone())
    }

    pub fn resolve_subscription(&self, root: &Root) -> Option<EntityId> {
        if self.0.len() != 2 {
            return None;
        }
        self.subscription(root).map(|s| s.id().clone())
    }

    pub fn resolve_company(&self, root: &Root) -> Option<EntityId> {
        let name = match self.0.as_slice() {
            [_, _, name] => name,
            _ => return None,
        };
        self.subscription(root)?
            .companies()
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.id().clone())
    }

    pub fn resolve_environment(&self, root: &Root) -> Option<EntityId> {
        let name = match self.0.as_slice() {
            [_, _, name] => name,
            _ => return None,
        };
        self.subscription(root)?
            .environments()
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.id().clone())
    }
}

impl FromStr for EntityPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = s.split('/').map(|seg| seg.trim().to_string()).collect();
        if segments.iter().any(String::is_empty) {
            return Err(format!("empty segment in path '{}'", s));
        }
        Ok(Self(segments))
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("/"))
    }
}

/// A single script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddCustomer,
    AddSubscription(EntityPath),
    AddCompany(EntityPath),
    AddEnvironment(EntityPath),
    SelectCustomer(EntityPath),
    SelectSubscription(EntityPath),
    CheckAll(Switch),
    CheckCustomer(EntityPath, Switch),
    CheckSubscription(EntityPath, Switch),
    CheckCompany(EntityPath, Switch),
    CheckEnvironment(EntityPath, Switch),
    CheckAllSubscriptions(EntityPath, Switch),
    CheckAllCompanies(EntityPath, Switch),
    CheckAllEnvironments(EntityPath, Switch),
}

/// A command together with the line it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub line: usize,
    pub command: Command,
}

/// Parsed script, ready to run against a `SelectionService`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

fn path_arg(line: usize, raw: &str) -> ApplicationResult<EntityPath> {
    raw.parse().map_err(|e| ApplicationError::script(line, e))
}

fn switch_arg(line: usize, raw: &str) -> ApplicationResult<Switch> {
    raw.parse().map_err(|e| ApplicationError::script(line, e))
}

fn parse_command(line: usize, verb: &str, args: &[String]) -> ApplicationResult<Command> {
    let command = match (verb, args) {
        ("add-customer", []) => Command::AddCustomer,
        ("add-subscription", [p]) => Command::AddSubscription(path_arg(line, p)?),
        ("add-company", [p]) => Command::AddCompany(path_arg(line, p)?),
        ("add-environment", [p]) => Command::AddEnvironment(path_arg(line, p)?),
        ("select-customer", [p]) => Command::SelectCustomer(path_arg(line, p)?),
        ("select-subscription", [p]) => Command::SelectSubscription(path_arg(line, p)?),
        ("check-all", [s]) => Command::CheckAll(switch_arg(line, s)?),
        ("check-customer", [p, s]) => {
            Command::CheckCustomer(path_arg(line, p)?, switch_arg(line, s)?)
        }
        ("check-subscription", [p, s]) => {
            Command::CheckSubscription(path_arg(line, p)?, switch_arg(line, s)?)
        }
        ("check-company", [p, s]) => Command::CheckCompany(path_arg(line, p)?, switch_arg(line, s)?),
        ("check-environment", [p, s]) => {
            Command::CheckEnvironment(path_arg(line, p)?, switch_arg(line, s)?)
        }
        ("check-all-subscriptions", [p, s]) => {
            Command::CheckAllSubscriptions(path_arg(line, p)?, switch_arg(line, s)?)
        }
        ("check-all-companies", [p, s]) => {
            Command::CheckAllCompanies(path_arg(line, p)?, switch_arg(line, s)?)
        }
        ("check-all-environments", [p, s]) => {
            Command::CheckAllEnvironments(path_arg(line, p)?, switch_arg(line, s)?)
        }
        (
            "add-customer" | "add-subscription" | "add-company" | "add-environment"
            | "select-customer" | "select-subscription" | "check-all" | "check-customer"
            | "check-subscription" | "check-company" | "check-environment"
            | "check-all-subscriptions" | "check-all-companies" | "check-all-environments",
            _,
        ) => {
            return Err(ApplicationError::script(
                line,
                format!("wrong number of arguments for '{}'", verb),
            ))
        }
        _ => {
            return Err(ApplicationError::script(
                line,
                format!("unknown command '{}'", verb),
            ))
        }
    };
    Ok(command)
}

impl Script {
    /// Parse script text. Line numbers in errors are 1-based.
    pub fn parse(content: &str) -> ApplicationResult<Self> {
        let tokens = Regex::new(TOKEN_PATTERN).map_err(|e| ApplicationError::OperationFailed {
            context: "compile script token pattern".into(),
            source: Box::new(e),
        })?;

        let mut steps = Vec::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let words: Vec<String> = tokens
                .captures_iter(trimmed)
                .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
                .map(|m| m.as_str().to_string())
                .collect();
            let Some((verb, args)) = words.split_first() else {
                continue;
            };
            let command = parse_command(line, verb, args)?;
            steps.push(Step { line, command });
        }
        debug!("parsed {} script steps", steps.len());
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply all steps in order; stops at the first failing step.
    ///
    /// Paths are resolved against the snapshot produced by the previous step.
    #[instrument(level = "debug", skip(self, service), fields(steps = self.steps.len()))]
    pub fn run(&self, service: &SelectionService) -> ApplicationResult<Arc<Root>> {
        let mut current = service.snapshot();
        for step in &self.steps {
            current = step.apply(service, &current)?;
        }
        Ok(current)
    }
}

impl Step {
    fn unresolved(&self, kind: &str, path: &EntityPath) -> ApplicationError {
        ApplicationError::script(self.line, format!("no {} at '{}'", kind, path))
    }

    fn customer(&self, root: &Root, path: &EntityPath) -> ApplicationResult<EntityId> {
        path.resolve_customer(root)
            .ok_or_else(|| self.unresolved("customer", path))
    }

    fn subscription(&self, root: &Root, path: &EntityPath) -> ApplicationResult<EntityId> {
        path.resolve_subscription(root)
            .ok_or_else(|| self.unresolved("subscription", path))
    }

    fn company(&self, root: &Root, path: &EntityPath) -> ApplicationResult<EntityId> {
        path.resolve_company(root)
            .ok_or_else(|| self.unresolved("company", path))
    }

    fn environment(&self, root: &Root, path: &EntityPath) -> ApplicationResult<EntityId> {
        path.resolve_environment(root)
            .ok_or_else(|| self.unresolved("environment", path))
    }

    fn apply(&self, service: &SelectionService, root: &Root) -> ApplicationResult<Arc<Root>> {
        debug!("line {}: {:?}", self.line, self.command);
        match &self.command {
            Command::AddCustomer => service.add_customer(),
            Command::AddSubscription(p) => service.add_subscription(&self.customer(root, p)?),
            Command::AddCompany(p) => service.add_company(&self.subscription(root, p)?),
            Command::AddEnvironment(p) => service.add_environment(&self.subscription(root, p)?),
            Command::SelectCustomer(p) => service.select_customer(&self.customer(root, p)?),
            Command::SelectSubscription(p) => {
                service.select_subscription(&self.subscription(root, p)?)
            }
            Command::CheckAll(s) => service.check_all_customers(s.as_bool()),
            Command::CheckCustomer(p, s) => {
                service.set_customer_checked(&self.customer(root, p)?, s.as_bool())
            }
            Command::CheckSubscription(p, s) => {
                service.set_subscription_checked(&self.subscription(root, p)?, s.as_bool())
            }
            Command::CheckCompany(p, s) => {
                service.set_company_checked(&self.company(root, p)?, s.as_bool())
            }
            Command::CheckEnvironment(p, s) => {
                service.set_environment_checked(&self.environment(root, p)?, s.as_bool())
            }
            Command::CheckAllSubscriptions(p, s) => {
                service.check_all_subscriptions(&self.customer(root, p)?, s.as_bool())
            }
            Command::CheckAllCompanies(p, s) => {
                service.check_all_companies(&self.subscription(root, p)?, s.as_bool())
            }
            Command::CheckAllEnvironments(p, s) => {
                service.check_all_environments(&self.subscription(root, p)?, s.as_bool())
            }
        }
    }
}
