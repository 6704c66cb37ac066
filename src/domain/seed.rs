//! Demo tree: three customers plus the future placeholders at every level

use crate::domain::entities::{Company, Customer, Environment, Subscription};
use crate::domain::error::DomainResult;
use crate::domain::ids::IdGenerator;
use crate::domain::mint::{Labels, Minter};
use crate::domain::root::Root;

/// Present subscription with the given leaf names followed by the placeholders.
fn subscription(
    minter: &Minter<'_>,
    name: &str,
    companies: &[&str],
    environments: &[&str],
) -> DomainResult<Subscription> {
    let mut company_list: Vec<Company> = companies
        .iter()
        .map(|n| Company::new(minter.next_id(), *n, false))
        .collect();
    company_list.push(minter.future_company());
    let mut environment_list: Vec<Environment> = environments
        .iter()
        .map(|n| Environment::new(minter.next_id(), *n, false))
        .collect();
    environment_list.push(minter.future_environment());
    Subscription::new(minter.next_id(), name, false, company_list, environment_list)
}

fn customer(
    minter: &Minter<'_>,
    name: &str,
    mut subscriptions: Vec<Subscription>,
) -> DomainResult<Customer> {
    subscriptions.push(minter.future_subscription());
    Customer::new(minter.next_id(), name, false, subscriptions)
}

/// Build the demo snapshot used by the CLI when no tree is supplied.
pub fn demo_root(ids: &dyn IdGenerator, labels: &Labels) -> DomainResult<Root> {
    let minter = Minter::new(ids, labels);
    let m = &minter;

    let customer_1 = customer(
        m,
        "Customer 1",
        vec![subscription(
            m,
            "Subscription 1.1",
            &["Company 1.1.1"],
            &["Environment 1"],
        )?],
    )?;
    let customer_2 = customer(
        m,
        "Customer 2",
        vec![subscription(
            m,
            "Subscription 2.1",
            &["Company 2.1.1", "Company 2.1.2", "Company 2.1.3", "Company 2.1.4"],
            &["Environment 1", "Environment 2"],
        )?],
    )?;
    let customer_3 = customer(
        m,
        "Customer 3",
        vec![
            subscription(
                m,
                "Subscription 3.1",
                &["Company 3.1.1", "Company 3.1.2", "Company 3.1.3", "Company 3.1.4"],
                &["Environment 1", "Environment 2", "Environment 3", "Environment 4"],
            )?,
            subscription(
                m,
                "Subscription 3.2",
                &["Company 3.2.1", "Company 3.2.2"],
                &["Environment 1"],
            )?,
        ],
    )?;

    Root::new(vec![customer_1, customer_2, customer_3, minter.future_customer()])
}
