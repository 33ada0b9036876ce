//! Disk-backed executor tests: maintenance commands and reopen.

use crate::types::AccessMode;
use crate::{Command, Error, Executor, Output, Registry, RegistryConfig, Session};
use tempfile::TempDir;

fn open(dir: &TempDir) -> std::sync::Arc<Registry> {
    Registry::open_with_config(dir.path(), RegistryConfig::new("admin").with_durability("always"))
        .unwrap()
}

#[test]
fn test_flush_and_checkpoint_on_disk() {
    let dir = TempDir::new().unwrap();
    {
        let alice = Session::new(open(&dir), "alice");
        alice.create_entry("k1", "v1").unwrap();
        alice.flush().unwrap();
        alice.checkpoint().unwrap();
        alice.create_entry("k2", "v2").unwrap();

        let info = alice.info().unwrap();
        assert_eq!(info.entry_count, 2);
        assert_eq!(info.durability, "Always sync (safest, slowest)");
    }

    let reopened = Session::new(Registry::open(dir.path()).unwrap(), "bob");
    assert_eq!(
        reopened.keys_by_owner("alice").unwrap(),
        vec!["k1".to_string(), "k2".to_string()]
    );
    assert_eq!(reopened.get_entry("k2").unwrap().owner.as_str(), "alice");
}

#[test]
fn test_read_only_executor_cannot_checkpoint() {
    let dir = TempDir::new().unwrap();
    let registry = open(&dir);
    let executor = Executor::new_with_mode(registry, AccessMode::ReadOnly);
    let caller = "admin".into();

    assert!(matches!(
        executor.execute(&caller, Command::Checkpoint),
        Err(Error::AccessDenied { .. })
    ));
    assert!(matches!(
        executor.execute(&caller, Command::Flush),
        Err(Error::AccessDenied { .. })
    ));
    assert_eq!(
        executor.execute(&caller, Command::IsPaused),
        Ok(Output::Bool(false))
    );
}
