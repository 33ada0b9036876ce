//! Disk-backed registries keep their state across reopen.

use keyreg::{Error, Identity, Registry, RegistryConfig, Session};
use tempfile::TempDir;

#[test]
fn test_reopen_keeps_everything() {
    let dir = TempDir::new().unwrap();
    {
        let cfg = RegistryConfig::new("admin").with_durability("always");
        let registry = Registry::open_with_config(dir.path(), cfg).unwrap();
        let admin = Session::new(registry.clone(), "admin");
        let a = Session::new(registry.clone(), "A");

        a.create_entry("k0", "v").unwrap();
        a.create_entry("k1", "v").unwrap();
        a.update_entry("k0", "v2").unwrap();
        admin.add_moderator("M").unwrap();
        Session::new(registry, "M").set_key_frozen("k1", true).unwrap();
    }

    let registry = Registry::open(dir.path()).unwrap();
    let a = Session::new(registry, "A");
    assert_eq!(a.keys_by_owner("A").unwrap(), vec!["k0", "k1"]);
    assert_eq!(a.get_entry("k0").unwrap().version, 2);
    assert!(a.is_moderator("M").unwrap());
    assert_eq!(a.delete_entry("k1"), Err(Error::Frozen { key: "k1".into() }));
    assert_eq!(a.info().unwrap().admin, Identity::from("admin"));
}

#[test]
fn test_checkpoint_command_then_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let registry = Registry::open_with_config(dir.path(), RegistryConfig::new("admin")).unwrap();
        let a = Session::new(registry, "A");
        a.create_entry("k", "v").unwrap();
        a.checkpoint().unwrap();
        a.update_entry("k", "v2").unwrap();
        a.flush().unwrap();
    }

    let a = Session::new(Registry::open(dir.path()).unwrap(), "A");
    let entry = a.get_entry("k").unwrap();
    assert_eq!(entry.value, "v2");
    assert_eq!(entry.version, 2);
}
