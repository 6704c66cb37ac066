//! Domain entities: the four tree levels below `Root`
//!
//! All entities are immutable once built. Containers remember the position of
//! their future placeholder, which is validated at construction.

use std::fmt;
use std::sync::Arc;

use crate::domain::error::{DomainError, DomainResult, Level};

/// Stable identifier of a tree entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

macro_rules! leaf_entity {
    ($t:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $t {
            id: EntityId,
            name: String,
            is_future: bool,
        }

        impl $t {
            pub fn new(id: impl Into<EntityId>, name: impl Into<String>, is_future: bool) -> Self {
                Self {
                    id: id.into(),
                    name: name.into(),
                    is_future,
                }
            }

            pub fn id(&self) -> &EntityId {
                &self.id
            }

            pub fn name(&self) -> &str {
                &self.name
            }

            pub fn is_future(&self) -> bool {
                self.is_future
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.name)
            }
        }
    };
}

leaf_entity!(Company, "Company leaf. Carries checked state through `Root`.");
leaf_entity!(
    Environment,
    "Environment leaf. Carries checked state through `Root`."
);

/// Position of the single future placeholder in `items`.
pub(crate) fn single_future<T>(
    items: &[T],
    is_future: impl Fn(&T) -> bool,
    level: Level,
) -> DomainResult<usize> {
    let mut positions = items
        .iter()
        .enumerate()
        .filter(|(_, item)| is_future(*item))
        .map(|(idx, _)| idx);
    let first = positions
        .next()
        .ok_or(DomainError::MissingFutureEntity { level })?;
    let extra = positions.count();
    if extra > 0 {
        return Err(DomainError::DuplicateFutureEntity {
            level,
            count: extra + 1,
        });
    }
    Ok(first)
}

/// Subscription: owns companies and environments, each with one future placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    id: EntityId,
    name: String,
    is_future: bool,
    companies: Vec<Company>,
    environments: Vec<Environment>,
    future_company: usize,
    future_environment: usize,
}

impl Subscription {
    /// Build a subscription, validating the placeholder invariant.
    ///
    /// # Errors
    /// `MissingFutureEntity` / `DuplicateFutureEntity` when `companies` or
    /// `environments` does not hold exactly one future entity.
    pub fn new(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        is_future: bool,
        companies: Vec<Company>,
        environments: Vec<Environment>,
    ) -> DomainResult<Self> {
        let future_company = single_future(&companies, Company::is_future, Level::Company)?;
        let future_environment =
            single_future(&environments, Environment::is_future, Level::Environment)?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            is_future,
            companies,
            environments,
            future_company,
            future_environment,
        })
    }

    /// Subscription holding nothing but the two placeholders.
    pub(crate) fn with_placeholders(
        id: EntityId,
        name: String,
        is_future: bool,
        future_company: Company,
        future_environment: Environment,
    ) -> Self {
        debug_assert!(future_company.is_future() && future_environment.is_future());
        Self {
            id,
            name,
            is_future,
            companies: vec![future_company],
            environments: vec![future_environment],
            future_company: 0,
            future_environment: 0,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_future(&self) -> bool {
        self.is_future
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    pub fn future_company(&self) -> &Company {
        &self.companies[self.future_company]
    }

    pub fn future_environment(&self) -> &Environment {
        &self.environments[self.future_environment]
    }

    pub fn present_companies(&self) -> impl Iterator<Item = &Company> + '_ {
        self.companies.iter().filter(|c| !c.is_future())
    }

    pub fn present_environments(&self) -> impl Iterator<Item = &Environment> + '_ {
        self.environments.iter().filter(|e| !e.is_future())
    }

    pub fn company_by_id(&self, id: &EntityId) -> Option<&Company> {
        self.companies.iter().find(|c| c.id() == id)
    }

    pub fn environment_by_id(&self, id: &EntityId) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id() == id)
    }

    /// Copy with `company` appended; the placeholder position is unchanged.
    pub(crate) fn with_company(&self, company: Company) -> Self {
        let mut next = self.clone();
        next.companies.push(company);
        next
    }

    pub(crate) fn with_environment(&self, environment: Environment) -> Self {
        let mut next = self.clone();
        next.environments.push(environment);
        next
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Customer: owns subscriptions, one of which is the future placeholder.
///
/// Subscriptions are shared between snapshots; replacing one copies only the
/// pointer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: EntityId,
    name: String,
    is_future: bool,
    subscriptions: Vec<Arc<Subscription>>,
    future_subscription: usize,
}

impl Customer {
    /// Build a customer, validating the placeholder invariant.
    ///
    /// # Errors
    /// `MissingFutureEntity` / `DuplicateFutureEntity` when `subscriptions`
    /// does not hold exactly one future subscription.
    pub fn new(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        is_future: bool,
        subscriptions: Vec<Subscription>,
    ) -> DomainResult<Self> {
        let future_subscription =
            single_future(&subscriptions, Subscription::is_future, Level::Subscription)?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            is_future,
            subscriptions: subscriptions.into_iter().map(Arc::new).collect(),
            future_subscription,
        })
    }

    pub(crate) fn with_placeholder(
        id: EntityId,
        name: String,
        is_future: bool,
        future_subscription: Subscription,
    ) -> Self {
        debug_assert!(future_subscription.is_future());
        Self {
            id,
            name,
            is_future,
            subscriptions: vec![Arc::new(future_subscription)],
            future_subscription: 0,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_future(&self) -> bool {
        self.is_future
    }

    pub fn subscriptions(&self) -> impl ExactSizeIterator<Item = &Subscription> + '_ {
        self.subscriptions.iter().map(Arc::as_ref)
    }

    /// First subscription in order; never absent since the placeholder is always there.
    pub fn first_subscription(&self) -> &Subscription {
        &self.subscriptions[0]
    }

    pub fn future_subscription(&self) -> &Subscription {
        &self.subscriptions[self.future_subscription]
    }

    pub fn present_subscriptions(&self) -> impl Iterator<Item = &Subscription> + '_ {
        self.subscriptions().filter(|s| !s.is_future())
    }

    pub fn subscription_by_id(&self, id: &EntityId) -> Option<&Subscription> {
        self.subscriptions().find(|s| s.id() == id)
    }

    pub fn company_by_id(&self, id: &EntityId) -> Option<&Company> {
        self.flat_companies().find(|c| c.id() == id)
    }

    pub fn environment_by_id(&self, id: &EntityId) -> Option<&Environment> {
        self.flat_environments().find(|e| e.id() == id)
    }

    /// Companies of all subscriptions, in subscription order.
    pub fn flat_companies(&self) -> impl Iterator<Item = &Company> + '_ {
        self.subscriptions().flat_map(|s| s.companies().iter())
    }

    pub fn flat_environments(&self) -> impl Iterator<Item = &Environment> + '_ {
        self.subscriptions().flat_map(|s| s.environments().iter())
    }

    pub(crate) fn subscription_position(&self, id: &EntityId) -> Option<usize> {
        self.subscriptions.iter().position(|s| s.id() == id)
    }

    pub(crate) fn subscription_at(&self, idx: usize) -> &Subscription {
        &self.subscriptions[idx]
    }

    pub(crate) fn with_subscription(&self, subscription: Subscription) -> Self {
        let mut next = self.clone();
        next.subscriptions.push(Arc::new(subscription));
        next
    }

    /// Copy with the subscription at `idx` swapped out; siblings stay shared.
    pub(crate) fn replace_subscription(&self, idx: usize, subscription: Subscription) -> Self {
        let mut next = self.clone();
        next.subscriptions[idx] = Arc::new(subscription);
        next
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
