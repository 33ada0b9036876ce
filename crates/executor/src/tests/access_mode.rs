//! Access mode tests: verify read-only mode blocks writes and allows reads.

use crate::types::AccessMode;
use crate::{Command, Error, Executor, Identity, Output, Registry, Session};

fn writer() -> Identity {
    Identity::from("wallet_1")
}

// =============================================================================
// Executor-level tests
// =============================================================================

#[test]
fn test_read_only_blocks_create() {
    let executor = Executor::new_with_mode(Registry::ephemeral("admin"), AccessMode::ReadOnly);

    let result = executor.execute(
        &writer(),
        Command::CreateEntry {
            key: "k".into(),
            value: "v".into(),
        },
    );

    match result {
        Err(Error::AccessDenied { command }) => assert_eq!(command, "CreateEntry"),
        other => panic!("expected AccessDenied, got {:?}", other),
    }
}

#[test]
fn test_read_only_blocks_admin_even_for_admin() {
    let executor = Executor::new_with_mode(Registry::ephemeral("admin"), AccessMode::ReadOnly);
    let result = executor.execute(&Identity::from("admin"), Command::SetPaused { paused: true });
    assert!(matches!(result, Err(Error::AccessDenied { .. })));
    assert!(!executor.registry().is_paused());
}

#[test]
fn test_read_only_blocks_maintenance() {
    let executor = Executor::new_with_mode(Registry::ephemeral("admin"), AccessMode::ReadOnly);
    for cmd in [Command::Flush, Command::Checkpoint] {
        assert!(matches!(
            executor.execute(&writer(), cmd),
            Err(Error::AccessDenied { .. })
        ));
    }
}

#[test]
fn test_read_only_allows_reads() {
    // Write some data via a read-write executor first
    let registry = Registry::ephemeral("admin");
    Executor::new(registry.clone())
        .execute(
            &writer(),
            Command::CreateEntry {
                key: "k".into(),
                value: "hello".into(),
            },
        )
        .unwrap();

    let executor = Executor::new_with_mode(registry, AccessMode::ReadOnly);
    match executor.execute(&writer(), Command::GetEntry { key: "k".into() }) {
        Ok(Output::Entry(info)) => assert_eq!(info.value, "hello"),
        other => panic!("expected Entry, got {:?}", other),
    }
    assert_eq!(
        executor.execute(&writer(), Command::GetKeyCount { owner: writer() }),
        Ok(Output::Uint(1))
    );
    assert!(executor.execute(&writer(), Command::Info).is_ok());
}

#[test]
fn test_access_denied_checked_before_validation() {
    // An invalid write is still reported as a mode violation
    let executor = Executor::new_with_mode(Registry::ephemeral("admin"), AccessMode::ReadOnly);
    let result = executor.execute(
        &writer(),
        Command::CreateEntry {
            key: String::new(),
            value: "v".into(),
        },
    );
    assert!(matches!(result, Err(Error::AccessDenied { .. })));
}

#[test]
fn test_default_mode_is_read_write() {
    let executor = Executor::new(Registry::ephemeral("admin"));
    assert_eq!(executor.access_mode(), AccessMode::ReadWrite);
    assert_eq!(AccessMode::default(), AccessMode::ReadWrite);
}

// =============================================================================
// Session-level tests
// =============================================================================

#[test]
fn test_read_only_session() {
    let registry = Registry::ephemeral("admin");
    Session::new(registry.clone(), "wallet_1")
        .create_entry("k", "v")
        .unwrap();

    let session = Session::read_only(registry, "wallet_1");
    assert_eq!(session.get_entry("k").unwrap().value, "v");
    assert_eq!(
        session.update_entry("k", "w"),
        Err(Error::AccessDenied {
            command: "UpdateEntry".into()
        })
    );
}
