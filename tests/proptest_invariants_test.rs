//! Property-based invariant tests for snapshots reachable from the demo tree.
//!
//! Any sequence of engine operations must keep:
//!
//! 1. Exactly one future entity at every level.
//! 2. The selected subscription owned by the selected customer.
//! 3. Checked ids referring to leaves that exist in the tree.
//! 4. Earlier snapshots unchanged.

use proptest::prelude::*;

use seltree::domain::{demo_root, CheckState, Labels, Minter, Root, SequentialIds};

#[derive(Debug, Clone)]
enum Op {
    AddCustomer,
    AddSubscription(usize),
    AddCompany(usize),
    AddEnvironment(usize),
    SelectCustomer(usize),
    SelectSubscription(usize),
    CheckAll(bool),
    CheckCustomer(usize, bool),
    CheckSubscription(usize, bool),
    CheckCompany(usize, bool),
    CheckEnvironment(usize, bool),
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddCustomer),
        any::<usize>().prop_map(Op::AddSubscription),
        any::<usize>().prop_map(Op::AddCompany),
        any::<usize>().prop_map(Op::AddEnvironment),
        any::<usize>().prop_map(Op::SelectCustomer),
        any::<usize>().prop_map(Op::SelectSubscription),
        any::<bool>().prop_map(Op::CheckAll),
        (any::<usize>(), any::<bool>()).prop_map(|(i, v)| Op::CheckCustomer(i, v)),
        (any::<usize>(), any::<bool>()).prop_map(|(i, v)| Op::CheckSubscription(i, v)),
        (any::<usize>(), any::<bool>()).prop_map(|(i, v)| Op::CheckCompany(i, v)),
        (any::<usize>(), any::<bool>()).prop_map(|(i, v)| Op::CheckEnvironment(i, v)),
    ]
}

fn apply(root: &Root, op: &Op, minter: &Minter<'_>) -> Root {
    let customers: Vec<_> = root.customers().cloned().collect();
    let subscriptions: Vec<_> = root.flat_subscriptions().cloned().collect();
    let companies: Vec<_> = root.flat_companies().cloned().collect();
    let environments: Vec<_> = root.flat_environments().cloned().collect();

    match *op {
        Op::AddCustomer => root.add_customer(minter),
        Op::AddSubscription(i) => root
            .add_subscription(&customers[i % customers.len()], minter)
            .expect("customer from this snapshot"),
        Op::AddCompany(i) => root
            .add_company(&subscriptions[i % subscriptions.len()], minter)
            .expect("subscription from this snapshot"),
        Op::AddEnvironment(i) => root
            .add_environment(&subscriptions[i % subscriptions.len()], minter)
            .expect("subscription from this snapshot"),
        Op::SelectCustomer(i) => root
            .select_customer(&customers[i % customers.len()])
            .expect("customer from this snapshot"),
        Op::SelectSubscription(i) => root
            .select_subscription(&subscriptions[i % subscriptions.len()])
            .expect("subscription from this snapshot"),
        Op::CheckAll(v) => root.check_all_customers(v),
        Op::CheckCustomer(i, v) => root.set_customer_checked(&customers[i % customers.len()], v),
        Op::CheckSubscription(i, v) => {
            root.set_subscription_checked(&subscriptions[i % subscriptions.len()], v)
        }
        Op::CheckCompany(i, v) => root.set_company_checked(&companies[i % companies.len()], v),
        Op::CheckEnvironment(i, v) => {
            root.set_environment_checked(&environments[i % environments.len()], v)
        }
    }
}

fn assert_invariants(root: &Root) -> Result<(), TestCaseError> {
    prop_assert_eq!(root.customers().filter(|c| c.is_future()).count(), 1);
    for customer in root.customers() {
        prop_assert_eq!(customer.subscriptions().filter(|s| s.is_future()).count(), 1);
        for s in customer.subscriptions() {
            prop_assert_eq!(s.companies().iter().filter(|c| c.is_future()).count(), 1);
            prop_assert_eq!(s.environments().iter().filter(|e| e.is_future()).count(), 1);
        }
    }

    let selected = root.selected_customer();
    prop_assert!(selected.is_some(), "selected customer missing");
    let owner = root.customer_for_subscription(root.selected_subscription_id());
    prop_assert_eq!(owner.map(|c| c.id()), selected.map(|c| c.id()));

    for id in root.checked_companies() {
        prop_assert!(root.company_by_id(id).is_some(), "dangling company {}", id);
    }
    for id in root.checked_environments() {
        prop_assert!(root.environment_by_id(id).is_some(), "dangling environment {}", id);
    }

    for customer in root.customers() {
        let all = customer.flat_companies().all(|c| root.is_company_checked(c))
            && customer.flat_environments().all(|e| root.is_environment_checked(e));
        prop_assert_eq!(
            root.is_customer_checked(customer) == CheckState::Checked,
            all
        );
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// Reachable snapshots
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_operation_sequences_keep_invariants(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let ids = SequentialIds::new();
        let labels = Labels::default();
        let minter = Minter::new(&ids, &labels);
        let mut root = demo_root(&ids, &labels).expect("demo tree");

        for op in &ops {
            let before = root.clone();
            let next = apply(&root, op, &minter);
            assert_invariants(&next)?;
            prop_assert_eq!(&root, &before, "operation {:?} modified its input", op);
            root = next;
        }
    }

    #[test]
    fn checking_then_unchecking_everything_leaves_nothing_checked(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let ids = SequentialIds::new();
        let labels = Labels::default();
        let minter = Minter::new(&ids, &labels);
        let mut root = demo_root(&ids, &labels).expect("demo tree");
        for op in &ops {
            root = apply(&root, op, &minter);
        }

        let root = root.check_all_customers(true).check_all_customers(false);

        prop_assert!(root.checked_companies().is_empty());
        prop_assert!(root.checked_environments().is_empty());
    }
}
