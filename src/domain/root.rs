//! Selection tree root: navigation, add/select operations and checked state
//!
//! Every operation takes `&self` and returns a new `Root`. Customers are held
//! behind `Arc`, so a new snapshot shares all untouched subtrees with the old
//! one and the old snapshot is never observably modified.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::check::{CheckState, Tally};
use crate::domain::entities::{single_future, Company, Customer, EntityId, Environment, Subscription};
use crate::domain::error::{DomainResult, Level};
use crate::domain::mint::Minter;

/// One immutable snapshot of the whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    customers: Vec<Arc<Customer>>,
    future_customer: usize,
    checked_companies: BTreeSet<EntityId>,
    checked_environments: BTreeSet<EntityId>,
    selected_customer_id: EntityId,
    selected_subscription_id: EntityId,
}

fn toggle<'a>(set: &mut BTreeSet<EntityId>, ids: impl IntoIterator<Item = &'a EntityId>, value: bool) {
    for id in ids {
        if value {
            set.insert(id.clone());
        } else {
            set.remove(id);
        }
    }
}

fn company_ids<'a>(companies: impl IntoIterator<Item = &'a Company>) -> impl Iterator<Item = &'a EntityId> {
    companies.into_iter().map(Company::id)
}

fn environment_ids<'a>(
    environments: impl IntoIterator<Item = &'a Environment>,
) -> impl Iterator<Item = &'a EntityId> {
    environments.into_iter().map(Environment::id)
}

impl Root {
    /// Build a root from customers, selecting the first customer and its
    /// first subscription. Nothing is checked.
    ///
    /// # Errors
    /// `MissingFutureEntity` / `DuplicateFutureEntity` when `customers` does
    /// not hold exactly one future customer.
    pub fn new(customers: Vec<Customer>) -> DomainResult<Self> {
        let future_customer = single_future(&customers, Customer::is_future, Level::Customer)?;
        // non-empty: the future customer is in there
        let first = &customers[0];
        let selected_customer_id = first.id().clone();
        let selected_subscription_id = first.first_subscription().id().clone();
        Ok(Self {
            customers: customers.into_iter().map(Arc::new).collect(),
            future_customer,
            checked_companies: BTreeSet::new(),
            checked_environments: BTreeSet::new(),
            selected_customer_id,
            selected_subscription_id,
        })
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn customers(&self) -> impl ExactSizeIterator<Item = &Customer> + '_ {
        self.customers.iter().map(Arc::as_ref)
    }

    pub fn future_customer(&self) -> &Customer {
        &self.customers[self.future_customer]
    }

    pub fn present_customers(&self) -> impl Iterator<Item = &Customer> + '_ {
        self.customers().filter(|c| !c.is_future())
    }

    pub fn flat_subscriptions(&self) -> impl Iterator<Item = &Subscription> + '_ {
        self.customers().flat_map(|c| c.subscriptions())
    }

    pub fn flat_companies(&self) -> impl Iterator<Item = &Company> + '_ {
        self.flat_subscriptions().flat_map(|s| s.companies().iter())
    }

    pub fn flat_environments(&self) -> impl Iterator<Item = &Environment> + '_ {
        self.flat_subscriptions().flat_map(|s| s.environments().iter())
    }

    pub fn checked_companies(&self) -> &BTreeSet<EntityId> {
        &self.checked_companies
    }

    pub fn checked_environments(&self) -> &BTreeSet<EntityId> {
        &self.checked_environments
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn customer_by_id(&self, id: &EntityId) -> Option<&Customer> {
        self.customers().find(|c| c.id() == id)
    }

    pub fn subscription_by_id(&self, id: &EntityId) -> Option<&Subscription> {
        self.flat_subscriptions().find(|s| s.id() == id)
    }

    pub fn company_by_id(&self, id: &EntityId) -> Option<&Company> {
        self.flat_companies().find(|c| c.id() == id)
    }

    pub fn environment_by_id(&self, id: &EntityId) -> Option<&Environment> {
        self.flat_environments().find(|e| e.id() == id)
    }

    pub fn customer_for_subscription(&self, subscription_id: &EntityId) -> Option<&Customer> {
        self.customers()
            .find(|c| c.subscription_by_id(subscription_id).is_some())
    }

    pub fn customer_for_company(&self, company_id: &EntityId) -> Option<&Customer> {
        self.customers().find(|c| c.company_by_id(company_id).is_some())
    }

    pub fn customer_for_environment(&self, environment_id: &EntityId) -> Option<&Customer> {
        self.customers()
            .find(|c| c.environment_by_id(environment_id).is_some())
    }

    pub fn subscription_for_company(&self, company_id: &EntityId) -> Option<&Subscription> {
        self.flat_subscriptions()
            .find(|s| s.company_by_id(company_id).is_some())
    }

    pub fn subscription_for_environment(&self, environment_id: &EntityId) -> Option<&Subscription> {
        self.flat_subscriptions()
            .find(|s| s.environment_by_id(environment_id).is_some())
    }

    fn customer_position(&self, id: &EntityId) -> Option<usize> {
        self.customers.iter().position(|c| c.id() == id)
    }

    /// (customer index, subscription index) of a subscription.
    fn subscription_position(&self, id: &EntityId) -> Option<(usize, usize)> {
        self.customers
            .iter()
            .enumerate()
            .find_map(|(ci, c)| c.subscription_position(id).map(|si| (ci, si)))
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selected_customer_id(&self) -> &EntityId {
        &self.selected_customer_id
    }

    pub fn selected_subscription_id(&self) -> &EntityId {
        &self.selected_subscription_id
    }

    /// Always `Some` for roots built by `new` or the operations below.
    pub fn selected_customer(&self) -> Option<&Customer> {
        self.customer_by_id(&self.selected_customer_id)
    }

    pub fn selected_subscription(&self) -> Option<&Subscription> {
        self.subscription_by_id(&self.selected_subscription_id)
    }

    /// Select `customer`. The subscription selection falls back to the
    /// customer's first subscription unless it already belongs to it.
    ///
    /// Returns `None` when the customer is not part of this snapshot.
    #[instrument(level = "debug", skip(self, customer), fields(customer = %customer.id()))]
    pub fn select_customer(&self, customer: &Customer) -> Option<Root> {
        let owner = self.customer_by_id(customer.id())?;
        let mut next = self.clone();
        next.selected_customer_id = owner.id().clone();
        if owner.subscription_by_id(&self.selected_subscription_id).is_none() {
            next.selected_subscription_id = owner.first_subscription().id().clone();
        }
        debug!("selected subscription {}", next.selected_subscription_id);
        Some(next)
    }

    /// Select `subscription` and move the customer selection to its owner.
    ///
    /// Returns `None` when the subscription is not part of this snapshot.
    #[instrument(level = "debug", skip(self, subscription), fields(subscription = %subscription.id()))]
    pub fn select_subscription(&self, subscription: &Subscription) -> Option<Root> {
        let owner = self.customer_for_subscription(subscription.id())?;
        let mut next = self.clone();
        next.selected_customer_id = owner.id().clone();
        next.selected_subscription_id = subscription.id().clone();
        debug!("selected customer {}", next.selected_customer_id);
        Some(next)
    }

    // ------------------------------------------------------------------
    // Add
    // ------------------------------------------------------------------

    /// Append a new customer with a single future subscription and select it.
    ///
    /// The new customer's leaves are checked iff the future customer's
    /// future subscription has its future company / future environment
    /// checked.
    #[instrument(level = "debug", skip(self, minter))]
    pub fn add_customer(&self, minter: &Minter<'_>) -> Root {
        let customer = minter.customer();
        let template = self.future_customer().future_subscription();
        let inherit_companies = self.checked_companies.contains(template.future_company().id());
        let inherit_environments = self
            .checked_environments
            .contains(template.future_environment().id());

        let mut next = self.clone();
        if inherit_companies {
            toggle(&mut next.checked_companies, company_ids(customer.flat_companies()), true);
        }
        if inherit_environments {
            toggle(
                &mut next.checked_environments,
                environment_ids(customer.flat_environments()),
                true,
            );
        }
        next.selected_customer_id = customer.id().clone();
        next.selected_subscription_id = customer.first_subscription().id().clone();
        debug!(
            "added customer {} (companies checked: {}, environments checked: {})",
            customer.id(),
            inherit_companies,
            inherit_environments
        );
        next.customers.push(Arc::new(customer));
        next
    }

    /// Append a new subscription to `customer` and select it.
    ///
    /// Checked state of its placeholders follows the customer's future
    /// subscription. Returns `None` when the customer is not part of this
    /// snapshot.
    #[instrument(level = "debug", skip(self, customer, minter), fields(customer = %customer.id()))]
    pub fn add_subscription(&self, customer: &Customer, minter: &Minter<'_>) -> Option<Root> {
        let ci = self.customer_position(customer.id())?;
        let owner = &self.customers[ci];
        let subscription = minter.subscription();
        let template = owner.future_subscription();
        let inherit_companies = self.checked_companies.contains(template.future_company().id());
        let inherit_environments = self
            .checked_environments
            .contains(template.future_environment().id());

        let mut next = self.clone();
        if inherit_companies {
            toggle(&mut next.checked_companies, company_ids(subscription.companies()), true);
        }
        if inherit_environments {
            toggle(
                &mut next.checked_environments,
                environment_ids(subscription.environments()),
                true,
            );
        }
        next.selected_customer_id = owner.id().clone();
        next.selected_subscription_id = subscription.id().clone();
        debug!("added subscription {}", subscription.id());
        next.customers[ci] = Arc::new(owner.with_subscription(subscription));
        Some(next)
    }

    /// Append a new company to `subscription`; it is checked iff the
    /// subscription's future company is checked.
    ///
    /// Returns `None` when the subscription is not part of this snapshot.
    #[instrument(level = "debug", skip(self, subscription, minter), fields(subscription = %subscription.id()))]
    pub fn add_company(&self, subscription: &Subscription, minter: &Minter<'_>) -> Option<Root> {
        let (ci, si) = self.subscription_position(subscription.id())?;
        let owner = &self.customers[ci];
        let current = owner.subscription_at(si);
        let company = minter.company();

        let mut next = self.clone();
        if self.checked_companies.contains(current.future_company().id()) {
            next.checked_companies.insert(company.id().clone());
        }
        debug!("added company {}", company.id());
        next.customers[ci] = Arc::new(owner.replace_subscription(si, current.with_company(company)));
        Some(next)
    }

    /// Append a new environment to `subscription`; it is checked iff the
    /// subscription's future environment is checked.
    ///
    /// Returns `None` when the subscription is not part of this snapshot.
    #[instrument(level = "debug", skip(self, subscription, minter), fields(subscription = %subscription.id()))]
    pub fn add_environment(&self, subscription: &Subscription, minter: &Minter<'_>) -> Option<Root> {
        let (ci, si) = self.subscription_position(subscription.id())?;
        let owner = &self.customers[ci];
        let current = owner.subscription_at(si);
        let environment = minter.environment();

        let mut next = self.clone();
        if self
            .checked_environments
            .contains(current.future_environment().id())
        {
            next.checked_environments.insert(environment.id().clone());
        }
        debug!("added environment {}", environment.id());
        next.customers[ci] =
            Arc::new(owner.replace_subscription(si, current.with_environment(environment)));
        Some(next)
    }

    // ------------------------------------------------------------------
    // Checked state: queries
    // ------------------------------------------------------------------

    pub fn is_company_checked(&self, company: &Company) -> bool {
        self.checked_companies.contains(company.id())
    }

    pub fn is_environment_checked(&self, environment: &Environment) -> bool {
        self.checked_environments.contains(environment.id())
    }

    pub fn is_subscription_checked(&self, subscription: &Subscription) -> CheckState {
        CheckState::from_tallies(
            Tally::count(company_ids(subscription.companies()), &self.checked_companies),
            Tally::count(
                environment_ids(subscription.environments()),
                &self.checked_environments,
            ),
        )
    }

    /// Aggregated over all of the customer's leaves, not per subscription.
    pub fn is_customer_checked(&self, customer: &Customer) -> CheckState {
        CheckState::from_tallies(
            Tally::count(company_ids(customer.flat_companies()), &self.checked_companies),
            Tally::count(
                environment_ids(customer.flat_environments()),
                &self.checked_environments,
            ),
        )
    }

    // ------------------------------------------------------------------
    // Checked state: mutations
    // ------------------------------------------------------------------

    pub fn set_company_checked(&self, company: &Company, value: bool) -> Root {
        let mut next = self.clone();
        toggle(&mut next.checked_companies, [company.id()], value);
        next
    }

    pub fn set_environment_checked(&self, environment: &Environment, value: bool) -> Root {
        let mut next = self.clone();
        toggle(&mut next.checked_environments, [environment.id()], value);
        next
    }

    /// All-or-nothing over the subscription's companies and environments.
    #[instrument(level = "debug", skip(self, subscription), fields(subscription = %subscription.id()))]
    pub fn set_subscription_checked(&self, subscription: &Subscription, value: bool) -> Root {
        let mut next = self.clone();
        next.toggle_subscription(subscription, value);
        next
    }

    /// All-or-nothing over the customer's flattened companies and environments.
    #[instrument(level = "debug", skip(self, customer), fields(customer = %customer.id()))]
    pub fn set_customer_checked(&self, customer: &Customer, value: bool) -> Root {
        let mut next = self.clone();
        toggle(&mut next.checked_companies, company_ids(customer.flat_companies()), value);
        toggle(
            &mut next.checked_environments,
            environment_ids(customer.flat_environments()),
            value,
        );
        next
    }

    /// `true` checks every leaf in the tree; `false` clears both sets.
    #[instrument(level = "debug", skip(self))]
    pub fn check_all_customers(&self, value: bool) -> Root {
        let mut next = self.clone();
        if value {
            toggle(&mut next.checked_companies, company_ids(self.flat_companies()), true);
            toggle(
                &mut next.checked_environments,
                environment_ids(self.flat_environments()),
                true,
            );
        } else {
            next.checked_companies.clear();
            next.checked_environments.clear();
        }
        debug!(
            "checked {} companies, {} environments",
            next.checked_companies.len(),
            next.checked_environments.len()
        );
        next
    }

    #[instrument(level = "debug", skip(self, customer), fields(customer = %customer.id()))]
    pub fn check_all_subscriptions(&self, customer: &Customer, value: bool) -> Root {
        let mut next = self.clone();
        for subscription in customer.subscriptions() {
            next.toggle_subscription(subscription, value);
        }
        next
    }

    pub fn check_all_companies(&self, subscription: &Subscription, value: bool) -> Root {
        let mut next = self.clone();
        toggle(&mut next.checked_companies, company_ids(subscription.companies()), value);
        next
    }

    pub fn check_all_environments(&self, subscription: &Subscription, value: bool) -> Root {
        let mut next = self.clone();
        toggle(
            &mut next.checked_environments,
            environment_ids(subscription.environments()),
            value,
        );
        next
    }

    fn toggle_subscription(&mut self, subscription: &Subscription, value: bool) {
        toggle(&mut self.checked_companies, company_ids(subscription.companies()), value);
        toggle(
            &mut self.checked_environments,
            environment_ids(subscription.environments()),
            value,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SequentialIds;
    use crate::domain::mint::Labels;

    fn bare_root(minter: &Minter<'_>) -> Root {
        Root::new(vec![minter.customer(), minter.future_customer()]).unwrap()
    }

    #[test]
    fn given_root_without_future_customer_when_new_then_fails() {
        let ids = SequentialIds::new();
        let labels = Labels::default();
        let minter = Minter::new(&ids, &labels);

        let result = Root::new(vec![minter.customer()]);

        assert!(result.is_err());
    }

    #[test]
    fn given_new_root_then_selects_first_customer_and_subscription() {
        let ids = SequentialIds::new();
        let labels = Labels::default();
        let minter = Minter::new(&ids, &labels);

        let root = bare_root(&minter);

        let first = root.customers().next().unwrap();
        assert_eq!(root.selected_customer_id(), first.id());
        assert_eq!(root.selected_subscription_id(), first.first_subscription().id());
        assert!(root.checked_companies().is_empty());
    }

    #[test]
    fn given_added_company_when_mutating_then_untouched_customers_stay_shared() {
        let ids = SequentialIds::new();
        let labels = Labels::default();
        let minter = Minter::new(&ids, &labels);
        let root = bare_root(&minter);
        let target = root.customers().next().unwrap().first_subscription().clone();

        let next = root.add_company(&target, &minter).unwrap();

        assert!(Arc::ptr_eq(&root.customers[1], &next.customers[1]));
        assert!(!Arc::ptr_eq(&root.customers[0], &next.customers[0]));
    }

    #[test]
    fn given_unknown_subscription_when_adding_company_then_returns_none() {
        let ids = SequentialIds::new();
        let labels = Labels::default();
        let minter = Minter::new(&ids, &labels);
        let root = bare_root(&minter);
        let stranger = minter.subscription();

        assert!(root.add_company(&stranger, &minter).is_none());
        assert!(root.add_environment(&stranger, &minter).is_none());
        assert!(root.select_subscription(&stranger).is_none());
    }
}
