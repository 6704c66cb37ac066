//! Selection state service
//!
//! Owns no tree itself: reads the current snapshot from a `SnapshotStore`,
//! applies one engine operation and installs the successor snapshot.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, OptionExt};
use crate::domain::{EntityId, IdGenerator, Labels, Level, Minter, Root};
use crate::infrastructure::traits::SnapshotStore;

/// Service addressing tree entities by id.
pub struct SelectionService {
    store: Arc<dyn SnapshotStore>,
    ids: Arc<dyn IdGenerator>,
    labels: Labels,
}

impl SelectionService {
    /// Create a new selection service.
    pub fn new(store: Arc<dyn SnapshotStore>, ids: Arc<dyn IdGenerator>, labels: Labels) -> Self {
        Self { store, ids, labels }
    }

    /// Current snapshot. Holding on to it is safe across later updates.
    pub fn snapshot(&self) -> Arc<Root> {
        self.store.current()
    }

    fn update<F>(&self, op: &str, mut f: F) -> ApplicationResult<Arc<Root>>
    where
        F: FnMut(&Root, &Minter<'_>) -> ApplicationResult<Root>,
    {
        let minter = Minter::new(self.ids.as_ref(), &self.labels);
        let next = self.store.update(&mut |root| f(root, &minter))?;
        debug!(
            "{}: {} companies / {} environments checked",
            op,
            next.checked_companies().len(),
            next.checked_environments().len()
        );
        Ok(next)
    }

    // ------------------------------------------------------------------
    // Add
    // ------------------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub fn add_customer(&self) -> ApplicationResult<Arc<Root>> {
        self.update("add_customer", |root, minter| Ok(root.add_customer(minter)))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_subscription(&self, customer_id: &EntityId) -> ApplicationResult<Arc<Root>> {
        self.update("add_subscription", |root, minter| {
            let customer = root
                .customer_by_id(customer_id)
                .or_not_found(Level::Customer, customer_id)?;
            root.add_subscription(customer, minter)
                .or_not_found(Level::Customer, customer_id)
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_company(&self, subscription_id: &EntityId) -> ApplicationResult<Arc<Root>> {
        self.update("add_company", |root, minter| {
            let subscription = root
                .subscription_by_id(subscription_id)
                .or_not_found(Level::Subscription, subscription_id)?;
            root.add_company(subscription, minter)
                .or_not_found(Level::Subscription, subscription_id)
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_environment(&self, subscription_id: &EntityId) -> ApplicationResult<Arc<Root>> {
        self.update("add_environment", |root, minter| {
            let subscription = root
                .subscription_by_id(subscription_id)
                .or_not_found(Level::Subscription, subscription_id)?;
            root.add_environment(subscription, minter)
                .or_not_found(Level::Subscription, subscription_id)
        })
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub fn select_customer(&self, customer_id: &EntityId) -> ApplicationResult<Arc<Root>> {
        self.update("select_customer", |root, _| {
            let customer = root
                .customer_by_id(customer_id)
                .or_not_found(Level::Customer, customer_id)?;
            root.select_customer(customer)
                .or_not_found(Level::Customer, customer_id)
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn select_subscription(&self, subscription_id: &EntityId) -> ApplicationResult<Arc<Root>> {
        self.update("select_subscription", |root, _| {
            let subscription = root
                .subscription_by_id(subscription_id)
                .or_not_found(Level::Subscription, subscription_id)?;
            root.select_subscription(subscription)
                .or_not_found(Level::Subscription, subscription_id)
        })
    }

    // ------------------------------------------------------------------
    // Checked state
    // ------------------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub fn check_all_customers(&self, value: bool) -> ApplicationResult<Arc<Root>> {
        self.update("check_all_customers", |root, _| {
            Ok(root.check_all_customers(value))
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_customer_checked(
        &self,
        customer_id: &EntityId,
        value: bool,
    ) -> ApplicationResult<Arc<Root>> {
        self.update("set_customer_checked", |root, _| {
            let customer = root
                .customer_by_id(customer_id)
                .or_not_found(Level::Customer, customer_id)?;
            Ok(root.set_customer_checked(customer, value))
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn check_all_subscriptions(
        &self,
        customer_id: &EntityId,
        value: bool,
    ) -> ApplicationResult<Arc<Root>> {
        self.update("check_all_subscriptions", |root, _| {
            let customer = root
                .customer_by_id(customer_id)
                .or_not_found(Level::Customer, customer_id)?;
            Ok(root.check_all_subscriptions(customer, value))
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_subscription_checked(
        &self,
        subscription_id: &EntityId,
        value: bool,
    ) -> ApplicationResult<Arc<Root>> {
        self.update("set_subscription_checked", |root, _| {
            let subscription = root
                .subscription_by_id(subscription_id)
                .or_not_found(Level::Subscription, subscription_id)?;
            Ok(root.set_subscription_checked(subscription, value))
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn check_all_companies(
        &self,
        subscription_id: &EntityId,
        value: bool,
    ) -> ApplicationResult<Arc<Root>> {
        self.update("check_all_companies", |root, _| {
            let subscription = root
                .subscription_by_id(subscription_id)
                .or_not_found(Level::Subscription, subscription_id)?;
            Ok(root.check_all_companies(subscription, value))
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn check_all_environments(
        &self,
        subscription_id: &EntityId,
        value: bool,
    ) -> ApplicationResult<Arc<Root>> {
        self.update("check_all_environments", |root, _| {
            let subscription = root
                .subscription_by_id(subscription_id)
                .or_not_found(Level::Subscription, subscription_id)?;
            Ok(root.check_all_environments(subscription, value))
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_company_checked(
        &self,
        company_id: &EntityId,
        value: bool,
    ) -> ApplicationResult<Arc<Root>> {
        self.update("set_company_checked", |root, _| {
            let company = root
                .company_by_id(company_id)
                .or_not_found(Level::Company, company_id)?;
            Ok(root.set_company_checked(company, value))
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_environment_checked(
        &self,
        environment_id: &EntityId,
        value: bool,
    ) -> ApplicationResult<Arc<Root>> {
        self.update("set_environment_checked", |root, _| {
            let environment = root
                .environment_by_id(environment_id)
                .or_not_found(Level::Environment, environment_id)?;
            Ok(root.set_environment_checked(environment, value))
        })
    }
}
