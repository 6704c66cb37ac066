//! Tests for operation scripts, end to end through the service and the CLI

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tempfile::TempDir;

use seltree::application::services::SelectionService;
use seltree::application::{ApplicationError, Script};
use seltree::cli::{execute_command, Cli};
use seltree::domain::{demo_root, CheckState, IdGenerator, Labels, SequentialIds, UuidIds};
use seltree::exitcode;
use seltree::infrastructure::traits::InMemoryStore;
use seltree::util::testing;

fn service() -> SelectionService {
    service_with(Arc::new(SequentialIds::new()))
}

fn service_with(ids: Arc<dyn IdGenerator>) -> SelectionService {
    testing::init_test_setup();
    let labels = Labels::default();
    let root = demo_root(ids.as_ref(), &labels).expect("demo tree");
    SelectionService::new(Arc::new(InMemoryStore::new(root)), ids, labels)
}

/// Helper to write a script file for testing
fn create_script(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("ops.seltree");
    fs::write(&path, content).expect("write script");
    path
}

#[test]
fn given_script_when_run_then_applies_steps_in_order() {
    // Arrange
    let service = service();
    let script = Script::parse(
        r#"
# check a whole subscription, then take one company out again
check-subscription "Customer 3/Subscription 3.2" on
check-company "Customer 3/Subscription 3.2/Company 3.2.1" off
select-subscription "Customer 2/Subscription 2.1"
"#,
    )
    .unwrap();

    // Act
    let root = script.run(&service).unwrap();

    // Assert
    let s32 = root
        .flat_subscriptions()
        .find(|s| s.name() == "Subscription 3.2")
        .unwrap();
    assert_eq!(root.is_subscription_checked(s32), CheckState::Indeterminate);
    assert_eq!(root.selected_customer().unwrap().name(), "Customer 2");
    assert!(Arc::ptr_eq(&root, &service.snapshot()));
}

#[test]
fn given_future_company_checked_when_adding_via_script_then_new_company_checked() {
    let service = service();
    let script = Script::parse(
        r#"
check-company "Customer 1/Subscription 1.1/Future Companies" on
add-company "Customer 1/Subscription 1.1"
"#,
    )
    .unwrap();

    let root = script.run(&service).unwrap();

    let sub = root
        .flat_subscriptions()
        .find(|s| s.name() == "Subscription 1.1")
        .unwrap();
    let added = sub.companies().last().unwrap();
    assert!(!added.is_future());
    assert!(root.is_company_checked(added));
}

#[test]
fn given_uuid_ids_when_addressing_added_customer_by_name_then_reaches_new_customer() {
    // Arrange
    let service = service_with(Arc::new(UuidIds::new()));
    let added = Script::parse("add-customer\n").unwrap().run(&service).unwrap();
    let new_customer = added.selected_customer().unwrap().clone();
    let seeded_names: Vec<String> = added
        .customers()
        .filter(|c| c.id() != new_customer.id())
        .map(|c| c.name().to_string())
        .collect();
    assert!(!seeded_names.contains(&new_customer.name().to_string()));

    // Act
    let script = Script::parse(&format!(
        "check-customer \"{}\" on\n",
        new_customer.name()
    ))
    .unwrap();
    let root = script.run(&service).unwrap();

    // Assert
    let customer = root.customer_by_id(new_customer.id()).unwrap();
    assert_eq!(root.is_customer_checked(customer), CheckState::Checked);
    let demo_first = root.customers().find(|c| c.name() == "Customer 1").unwrap();
    assert_eq!(root.is_customer_checked(demo_first), CheckState::Unchecked);
}

#[test]
fn given_unknown_path_when_running_then_script_error_with_line() {
    let service = service();
    let before = service.snapshot();
    let script = Script::parse("check-all on\n\nselect-customer \"Customer 9\"\n").unwrap();

    let err = script.run(&service).unwrap_err();

    match err {
        ApplicationError::Script { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("Customer 9"), "message: {}", message);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // steps before the failing one stay applied
    assert!(!service.snapshot().checked_companies().is_empty());
    assert!(before.checked_companies().is_empty());
}

#[test]
fn given_path_of_wrong_depth_when_running_then_script_error() {
    let service = service();
    let script = Script::parse("add-company \"Customer 1\"\n").unwrap();

    let err = script.run(&service).unwrap_err();

    assert!(matches!(err, ApplicationError::Script { line: 1, .. }));
}

#[test]
fn given_script_file_when_running_cli_then_succeeds() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let path = create_script(
        &temp,
        "add-customer\ncheck-all-subscriptions \"Customer 3\" on\n",
    );

    let cli = Cli::parse_from(["seltree", "run", path.to_str().unwrap(), "--ids"]);

    execute_command(&cli).expect("run script");
}

#[test]
fn given_bad_script_file_when_running_cli_then_data_error() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let path = create_script(&temp, "check-all on\nfrobnicate\n");

    let cli = Cli::parse_from(["seltree", "run", path.to_str().unwrap()]);
    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_missing_script_file_when_running_cli_then_usage_error() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.seltree");

    let cli = Cli::parse_from(["seltree", "run", path.to_str().unwrap()]);
    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}
