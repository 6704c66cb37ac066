//! Fresh entity construction for add operations

use crate::domain::entities::{Company, Customer, EntityId, Environment, Subscription};
use crate::domain::ids::IdGenerator;
use serde::{Deserialize, Serialize};

/// Display names used when the engine creates entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub future_customer: String,
    pub future_subscription: String,
    pub future_company: String,
    pub future_environment: String,
    pub customer_prefix: String,
    pub subscription_prefix: String,
    pub company_prefix: String,
    pub environment_prefix: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            future_customer: "Future Customers".into(),
            future_subscription: "Future Subscriptions".into(),
            future_company: "Future Companies".into(),
            future_environment: "Future Environments".into(),
            customer_prefix: "Customer ".into(),
            subscription_prefix: "Subscription ".into(),
            company_prefix: "Company ".into(),
            environment_prefix: "Environment ".into(),
        }
    }
}

/// Builds new entities with fresh ids and their placeholder sub-structure.
///
/// Everything a `Minter` returns already satisfies the future-entity
/// invariant, so no validation is repeated.
#[derive(Clone, Copy)]
pub struct Minter<'a> {
    ids: &'a dyn IdGenerator,
    labels: &'a Labels,
}

impl<'a> Minter<'a> {
    pub fn new(ids: &'a dyn IdGenerator, labels: &'a Labels) -> Self {
        Self { ids, labels }
    }

    /// Bare id, for callers assembling entities by hand.
    pub fn next_id(&self) -> EntityId {
        self.ids.next_id()
    }

    pub fn company(&self) -> Company {
        Company::new(
            self.ids.next_id(),
            self.ids.next_name(&self.labels.company_prefix),
            false,
        )
    }

    pub fn environment(&self) -> Environment {
        Environment::new(
            self.ids.next_id(),
            self.ids.next_name(&self.labels.environment_prefix),
            false,
        )
    }

    pub fn future_company(&self) -> Company {
        Company::new(self.ids.next_id(), self.labels.future_company.clone(), true)
    }

    pub fn future_environment(&self) -> Environment {
        Environment::new(
            self.ids.next_id(),
            self.labels.future_environment.clone(),
            true,
        )
    }

    /// Present subscription holding only its two placeholders.
    pub fn subscription(&self) -> Subscription {
        Subscription::with_placeholders(
            self.ids.next_id(),
            self.ids.next_name(&self.labels.subscription_prefix),
            false,
            self.future_company(),
            self.future_environment(),
        )
    }

    pub fn future_subscription(&self) -> Subscription {
        Subscription::with_placeholders(
            self.ids.next_id(),
            self.labels.future_subscription.clone(),
            true,
            self.future_company(),
            self.future_environment(),
        )
    }

    /// Present customer holding only a future subscription.
    pub fn customer(&self) -> Customer {
        Customer::with_placeholder(
            self.ids.next_id(),
            self.ids.next_name(&self.labels.customer_prefix),
            false,
            self.future_subscription(),
        )
    }

    pub fn future_customer(&self) -> Customer {
        Customer::with_placeholder(
            self.ids.next_id(),
            self.labels.future_customer.clone(),
            true,
            self.future_subscription(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SequentialIds;

    #[test]
    fn given_minter_when_minting_customer_then_placeholders_cascade_down() {
        let ids = SequentialIds::new();
        let labels = Labels::default();
        let minter = Minter::new(&ids, &labels);

        let customer = minter.customer();

        assert!(!customer.is_future());
        assert!(customer.name().starts_with("Customer "));
        assert_eq!(customer.subscriptions().len(), 1);
        let sub = customer.future_subscription();
        assert!(sub.is_future());
        assert_eq!(sub.name(), "Future Subscriptions");
        assert_eq!(sub.future_company().name(), "Future Companies");
        assert_eq!(sub.future_environment().name(), "Future Environments");
    }

    #[test]
    fn given_minter_when_minting_leaves_then_they_are_present_entities() {
        let ids = SequentialIds::new();
        let labels = Labels::default();
        let minter = Minter::new(&ids, &labels);

        let company = minter.company();
        let environment = minter.environment();

        assert!(!company.is_future());
        assert!(!environment.is_future());
        assert_ne!(company.id(), environment.id());
    }
}
