//! Configuration resolution.

use guardstack::{GuardedStack, StackConfig, DIAGNOSTICS_ENV};

#[test]
fn from_env_reads_the_switch() {
    // Single test touching the variable, so no other test races it.
    std::env::set_var(DIAGNOSTICS_ENV, "off");
    assert!(!StackConfig::from_env().diagnostics);
    assert_eq!(GuardedStack::<u8>::new().config(), StackConfig::release());
    assert_eq!(GuardedStack::from_elem(3, 'a').config(), StackConfig::release());

    std::env::set_var(DIAGNOSTICS_ENV, "1");
    assert!(StackConfig::from_env().diagnostics);
    assert_eq!(GuardedStack::<u8>::new().config(), StackConfig::diagnostic());

    std::env::set_var(DIAGNOSTICS_ENV, "sometimes");
    assert_eq!(StackConfig::from_env(), StackConfig::default());

    std::env::remove_var(DIAGNOSTICS_ENV);
    assert_eq!(StackConfig::from_env(), StackConfig::default());
}

#[test]
fn config_round_trips_through_json() {
    let json = serde_json::to_string(&StackConfig::release()).unwrap();
    assert_eq!(json, r#"{"diagnostics":false}"#);
    let back: StackConfig = serde_json::from_str(r#"{"diagnostics":true}"#).unwrap();
    assert_eq!(back, StackConfig::diagnostic());
}

#[test]
fn stack_keeps_its_config() {
    let stack = guardstack::testing::release_stack(1, 0u8);
    assert_eq!(stack.config(), StackConfig::release());
    let stack = guardstack::testing::diagnostic_stack::<u8>();
    assert_eq!(stack.config(), StackConfig::diagnostic());
}
