//! Text tree view of a snapshot
//!
//! ```text
//! selection
//! ├── [-] Customer 1 *
//! │   ├── [-] Subscription 1.1 *
//! │   │   ├── companies
//! │   │   │   ├── [x] Company 1.1.1
//! ```
//!
//! `*` marks the selected customer and subscription.

use termtree::Tree;

use crate::config::RenderSettings;
use crate::domain::{CheckState, Customer, EntityId, Root, Subscription};

/// Anything that can be drawn as a `termtree` tree.
pub trait TreeView {
    fn to_tree_view(&self, opts: &RenderSettings) -> Tree<String>;
}

fn label(
    marker: Option<CheckState>,
    name: &str,
    id: &EntityId,
    selected: bool,
    opts: &RenderSettings,
) -> String {
    let mut out = match marker {
        Some(state) => format!("{} {}", state, name),
        None => name.to_string(),
    };
    if selected {
        out.push_str(" *");
    }
    if opts.show_ids {
        out.push_str(&format!(" ({})", id));
    }
    out
}

fn subscription_tree(root: &Root, subscription: &Subscription, opts: &RenderSettings) -> Tree<String> {
    let companies = subscription
        .companies()
        .iter()
        .filter(|c| opts.show_future || !c.is_future())
        .map(|c| {
            let state = CheckState::from(root.is_company_checked(c));
            Tree::new(label(Some(state), c.name(), c.id(), false, opts))
        });
    let environments = subscription
        .environments()
        .iter()
        .filter(|e| opts.show_future || !e.is_future())
        .map(|e| {
            let state = CheckState::from(root.is_environment_checked(e));
            Tree::new(label(Some(state), e.name(), e.id(), false, opts))
        });

    let selected = subscription.id() == root.selected_subscription_id();
    Tree::new(label(
        Some(root.is_subscription_checked(subscription)),
        subscription.name(),
        subscription.id(),
        selected,
        opts,
    ))
    .with_leaves([
        Tree::new("companies".to_string()).with_leaves(companies),
        Tree::new("environments".to_string()).with_leaves(environments),
    ])
}

fn customer_tree(root: &Root, customer: &Customer, opts: &RenderSettings) -> Tree<String> {
    let subscriptions = customer
        .subscriptions()
        .filter(|s| opts.show_future || !s.is_future())
        .map(|s| subscription_tree(root, s, opts));

    let selected = customer.id() == root.selected_customer_id();
    Tree::new(label(
        Some(root.is_customer_checked(customer)),
        customer.name(),
        customer.id(),
        selected,
        opts,
    ))
    .with_leaves(subscriptions)
}

impl TreeView for Root {
    fn to_tree_view(&self, opts: &RenderSettings) -> Tree<String> {
        let customers = self
            .customers()
            .filter(|c| opts.show_future || !c.is_future())
            .map(|c| customer_tree(self, c, opts));
        Tree::new("selection".to_string()).with_leaves(customers)
    }
}
