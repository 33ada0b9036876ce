//! Session tests: caller binding and the typed helpers.

use crate::{Error, Executor, Identity, Registry, Session};

#[test]
fn test_session_runs_as_bound_caller() {
    let registry = Registry::ephemeral("admin");
    let alice = Session::new(registry.clone(), "alice");
    let bob = Session::new(registry, "bob");

    alice.create_entry("k", "v").unwrap();
    assert_eq!(alice.get_entry("k").unwrap().owner, Identity::from("alice"));

    match bob.update_entry("k", "stolen") {
        Err(Error::Forbidden { caller, .. }) => assert_eq!(caller, "bob"),
        other => panic!("expected Forbidden, got {:?}", other),
    }
}

#[test]
fn test_session_lifecycle_helpers() {
    let registry = Registry::ephemeral("admin");
    let alice = Session::new(registry, "alice");

    alice.create_entry("a", "1").unwrap();
    alice.create_entry("b", "2").unwrap();
    alice.update_entry("a", "1b").unwrap();

    let a = alice.get_entry("a").unwrap();
    assert_eq!(a.value, "1b");
    assert_eq!(a.version, 2);
    assert!(a.updated_at > a.created_at);

    alice.transfer_entry("b", "bob").unwrap();
    assert_eq!(alice.keys_by_owner("alice").unwrap(), vec!["a"]);
    assert_eq!(alice.get_key_by_owner("bob", 0).unwrap(), "b");

    alice.delete_entry("a").unwrap();
    assert_eq!(alice.get_key_count("alice").unwrap(), 0);
    assert_eq!(
        alice.get_entry("a"),
        Err(Error::NotFound { key: "a".into() })
    );
}

#[test]
fn test_session_admin_and_moderation() {
    let registry = Registry::ephemeral("admin");
    let admin = Session::new(registry.clone(), "admin");
    let moderator = Session::new(registry.clone(), "mod");
    let owner = Session::new(registry, "owner");

    owner.create_entry("k", "v").unwrap();
    admin.add_moderator("mod").unwrap();
    assert!(owner.is_moderator("mod").unwrap());

    moderator.set_key_frozen("k", true).unwrap();
    assert_eq!(
        owner.delete_entry("k"),
        Err(Error::Frozen { key: "k".into() })
    );

    admin.set_paused(true).unwrap();
    assert!(owner.is_paused().unwrap());
    assert_eq!(owner.create_entry("other", "v"), Err(Error::AlreadyPaused));

    admin.remove_moderator("mod").unwrap();
    assert!(matches!(
        moderator.set_key_frozen("k", false),
        Err(Error::Forbidden { .. })
    ));
}

#[test]
fn test_session_concat_and_info() {
    let session = Session::new(Registry::ephemeral("admin"), "c");
    assert_eq!(session.concat_keys("hotline:", "region1").unwrap(), "hotline:region1");
    assert!(matches!(
        session.concat_keys("", ""),
        Err(Error::InvalidArgument { .. })
    ));

    session.create_entry("k", "v").unwrap();
    let info = session.info().unwrap();
    assert_eq!(info.admin, Identity::from("admin"));
    assert_eq!(info.entry_count, 1);
    assert_eq!(info.last_sequence, 1);

    // Maintenance commands are no-ops on an ephemeral registry
    session.flush().unwrap();
    session.checkpoint().unwrap();
}

#[test]
fn test_with_executor_shares_registry() {
    let executor = Executor::new(Registry::ephemeral("admin"));
    let a = Session::with_executor(executor.clone(), "a");
    let b = Session::with_executor(executor, "b");
    a.create_entry("x", "1").unwrap();
    assert_eq!(b.get_entry("x").unwrap().owner, *a.caller());
}
