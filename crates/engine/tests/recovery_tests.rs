//! Recovery Tests
//!
//! Verify that a disk-backed registry comes back exactly as it was:
//! - Reopen replays every committed mutation
//! - Checkpoint folds state into the snapshot and truncates the WAL
//! - A torn record at the end of the WAL is cut off, not fatal
//! - A checksum failure inside the WAL is reported as corruption
//! - The admin can never be swapped by editing keyreg.toml

use keyreg_core::{Identity, RegistryError, Version};
use keyreg_durability::wal::wal_path;
use keyreg_durability::WalReader;
use keyreg_engine::{Registry, RegistryConfig, CONFIG_FILE_NAME};
use std::io::Write;
use tempfile::TempDir;

fn id(s: &str) -> Identity {
    Identity::from(s)
}

fn always(admin: &str) -> RegistryConfig {
    RegistryConfig::new(admin).with_durability("always")
}

fn populate(reg: &Registry) {
    reg.add_moderator(&id("admin"), &id("mod")).unwrap();
    reg.create_entry(&id("alice"), "a", "1").unwrap();
    reg.create_entry(&id("alice"), "b", "2").unwrap();
    reg.create_entry(&id("alice"), "c", "3").unwrap();
    reg.update_entry(&id("alice"), "a", "1b").unwrap();
    reg.transfer_entry(&id("alice"), "b", &id("bob")).unwrap();
    reg.set_key_frozen(&id("mod"), "c", true).unwrap();
    reg.set_paused(&id("admin"), true).unwrap();
}

fn assert_populated(reg: &Registry) {
    assert_eq!(reg.admin(), id("admin"));
    assert!(reg.is_paused());
    assert!(reg.is_moderator(&id("mod")));
    assert_eq!(reg.keys_by_owner(&id("alice")), vec!["a", "c"]);
    assert_eq!(reg.keys_by_owner(&id("bob")), vec!["b"]);

    let a = reg.get_entry("a").unwrap();
    assert_eq!(a.value, "1b");
    assert_eq!(a.version, Version::new(2));
    assert!(reg.get_entry("c").unwrap().frozen);
    reg.check_invariants().unwrap();
}

#[test]
fn test_reopen_replays_wal() {
    let dir = TempDir::new().unwrap();
    let last_sequence = {
        let reg = Registry::open_with_config(dir.path(), always("admin")).unwrap();
        populate(&reg);
        reg.last_sequence()
    };

    let reg = Registry::open(dir.path()).unwrap();
    assert_populated(&reg);
    assert_eq!(reg.last_sequence(), last_sequence);
}

#[test]
fn test_markers_keep_increasing_after_reopen() {
    let dir = TempDir::new().unwrap();
    let before = {
        let reg = Registry::open_with_config(dir.path(), always("admin")).unwrap();
        reg.create_entry(&id("alice"), "a", "1").unwrap();
        reg.get_entry("a").unwrap().updated_at
    };

    let reg = Registry::open(dir.path()).unwrap();
    reg.update_entry(&id("alice"), "a", "2").unwrap();
    assert!(reg.get_entry("a").unwrap().updated_at > before);
}

#[test]
fn test_checkpoint_truncates_wal_and_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let reg = Registry::open_with_config(dir.path(), always("admin")).unwrap();
        populate(&reg);
        reg.checkpoint().unwrap();

        let log = WalReader::read_all(dir.path()).unwrap();
        assert!(log.records.is_empty());

        // Commits after the checkpoint go to the fresh log
        reg.set_paused(&id("admin"), false).unwrap();
        reg.create_entry(&id("carol"), "d", "4").unwrap();
        reg.set_paused(&id("admin"), true).unwrap();

        let log = WalReader::read_all(dir.path()).unwrap();
        assert_eq!(log.records.len(), 3);
    }

    let reg = Registry::open(dir.path()).unwrap();
    assert_populated(&reg);
    assert_eq!(reg.keys_by_owner(&id("carol")), vec!["d"]);
}

#[test]
fn test_torn_tail_is_discarded() {
    let dir = TempDir::new().unwrap();
    {
        let reg = Registry::open_with_config(dir.path(), always("admin")).unwrap();
        reg.create_entry(&id("alice"), "a", "1").unwrap();
        reg.create_entry(&id("alice"), "b", "2").unwrap();
    }

    // Half of a record: a length prefix promising more bytes than follow
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(wal_path(dir.path()))
        .unwrap();
    file.write_all(&[200, 0, 0, 0, 1, 9, 9]).unwrap();
    drop(file);

    let reg = Registry::open(dir.path()).unwrap();
    assert_eq!(reg.keys_by_owner(&id("alice")), vec!["a", "b"]);

    // The log is usable again after the cut
    reg.create_entry(&id("alice"), "c", "3").unwrap();
    drop(reg);
    let reg = Registry::open(dir.path()).unwrap();
    assert_eq!(reg.get_key_count(&id("alice")), 3);
}

#[test]
fn test_checksum_failure_is_corruption() {
    let dir = TempDir::new().unwrap();
    {
        let reg = Registry::open_with_config(dir.path(), always("admin")).unwrap();
        reg.create_entry(&id("alice"), "a", "value-one").unwrap();
        reg.create_entry(&id("alice"), "b", "value-two").unwrap();
    }

    let path = wal_path(dir.path());
    let mut bytes = std::fs::read(&path).unwrap();
    // Flip a payload byte inside the first record (header is 8 bytes,
    // record framing adds 21 more before the payload)
    bytes[8 + 21 + 2] ^= 0xFF;
    std::fs::write(&path, bytes).unwrap();

    let err = Registry::open(dir.path()).unwrap_err();
    assert!(matches!(err, RegistryError::Corruption { .. }), "{err:?}");
}

#[test]
fn test_admin_cannot_be_swapped_via_config() {
    let dir = TempDir::new().unwrap();
    drop(Registry::open_with_config(dir.path(), always("admin")).unwrap());

    let err = Registry::open_with_config(dir.path(), always("mallory")).unwrap_err();
    assert!(matches!(err, RegistryError::Config { .. }));

    // The rejected config was not written
    let text = std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert!(text.contains("admin = \"admin\""));
}

#[test]
fn test_open_without_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Registry::open(dir.path()),
        Err(RegistryError::Config { .. })
    ));
}

#[test]
fn test_second_open_is_locked_out() {
    let dir = TempDir::new().unwrap();
    let _reg = Registry::open_with_config(dir.path(), always("admin")).unwrap();
    assert!(matches!(
        Registry::open(dir.path()),
        Err(RegistryError::Storage { .. })
    ));
}

#[test]
fn test_cache_mode_keeps_only_checkpoints() {
    let dir = TempDir::new().unwrap();
    let cfg = RegistryConfig::new("admin").with_durability("cache");
    {
        let reg = Registry::open_with_config(dir.path(), cfg.clone()).unwrap();
        reg.create_entry(&id("alice"), "a", "1").unwrap();
        reg.checkpoint().unwrap();
        reg.create_entry(&id("alice"), "b", "2").unwrap();
        assert_eq!(reg.wal_counters().wal_appends, 0);
    }

    let reg = Registry::open(dir.path()).unwrap();
    assert_eq!(reg.keys_by_owner(&id("alice")), vec!["a"]);
}

#[test]
fn test_standard_mode_flush_and_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let reg = Registry::open_with_config(dir.path(), RegistryConfig::new("admin")).unwrap();
        for i in 0..10 {
            reg.create_entry(&id("alice"), &format!("k{i}"), "v").unwrap();
        }
        reg.flush().unwrap();
        assert_eq!(reg.wal_counters().wal_appends, 10);
    }

    let reg = Registry::open(dir.path()).unwrap();
    assert_eq!(reg.get_key_count(&id("alice")), 10);
    assert_eq!(reg.get_key_by_owner(&id("alice"), 9).unwrap(), "k9");
}

#[test]
fn test_reopen_with_config_keeps_edited_file() {
    let dir = TempDir::new().unwrap();
    drop(Registry::open_with_config(dir.path(), always("admin")).unwrap());

    let path = dir.path().join(CONFIG_FILE_NAME);
    let edited = std::fs::read_to_string(&path)
        .unwrap()
        .replace("max_value_chars = 256", "max_value_chars = 4");
    std::fs::write(&path, &edited).unwrap();

    drop(Registry::open_with_config(dir.path(), always("admin")).unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), edited);

    let reg = Registry::open(dir.path()).unwrap();
    assert_eq!(reg.limits().max_value_chars, 4);
    assert!(matches!(
        reg.create_entry(&id("alice"), "a", "too long"),
        Err(RegistryError::InvalidArgument { .. })
    ));
}

#[test]
fn test_unfrozen_entry_behaves_as_before_after_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let reg = Registry::open_with_config(dir.path(), always("admin")).unwrap();
        reg.add_moderator(&id("admin"), &id("mod")).unwrap();
        reg.create_entry(&id("alice"), "a", "1").unwrap();
        reg.create_entry(&id("alice"), "b", "2").unwrap();
        reg.set_key_frozen(&id("mod"), "a", true).unwrap();
        reg.set_key_frozen(&id("mod"), "b", true).unwrap();
        reg.set_key_frozen(&id("mod"), "a", false).unwrap();
        reg.set_key_frozen(&id("mod"), "b", false).unwrap();
    }

    let reg = Registry::open(dir.path()).unwrap();
    assert!(!reg.get_entry("a").unwrap().frozen);
    reg.update_entry(&id("alice"), "a", "1b").unwrap();
    reg.transfer_entry(&id("alice"), "a", &id("bob")).unwrap();
    reg.delete_entry(&id("alice"), "b").unwrap();

    assert_eq!(reg.get_key_count(&id("alice")), 0);
    assert_eq!(reg.keys_by_owner(&id("bob")), vec!["a"]);
    assert_eq!(reg.get_entry("a").unwrap().version, Version::new(2));
}
