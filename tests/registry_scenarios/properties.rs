//! Authorization, pause and freeze properties.

use crate::common::World;
use keyreg::{Error, Identity};

#[test]
fn test_new_entry_shape() {
    let world = World::new();
    let a = world.as_("A");
    a.create_entry("k", "v").unwrap();

    let entry = a.get_entry("k").unwrap();
    assert_eq!(entry.version, 1);
    assert!(!entry.frozen);
    assert_eq!(entry.owner, Identity::from("A"));
    assert_eq!(entry.created_at, entry.updated_at);
}

#[test]
fn test_reads_need_no_authority() {
    let world = World::new();
    world.as_("A").create_entry("k", "v").unwrap();
    let stranger = world.as_("stranger");
    assert_eq!(stranger.get_entry("k").unwrap().value, "v");
    assert_eq!(stranger.keys_by_owner("A").unwrap(), vec!["k"]);
}

#[test]
fn test_pause_blocks_admin_create_too() {
    let world = World::new();
    let admin = world.admin();
    admin.set_paused(true).unwrap();
    assert_eq!(admin.create_entry("k", "v"), Err(Error::AlreadyPaused));
}

#[test]
fn test_pause_leaves_existing_entries_mutable() {
    let world = World::new();
    let a = world.as_("A");
    a.create_entry("k1", "v").unwrap();
    a.create_entry("k2", "v").unwrap();
    world.admin().add_moderator("M").unwrap();
    world.admin().set_paused(true).unwrap();

    a.update_entry("k1", "v2").unwrap();
    a.transfer_entry("k1", "B").unwrap();
    a.delete_entry("k2").unwrap();
    world.as_("M").set_key_frozen("k1", true).unwrap();
    assert!(a.get_entry("k2").is_err());
}

#[test]
fn test_only_admin_controls_flags_and_moderators() {
    let world = World::new();
    let user = world.as_("user");
    for result in [
        user.set_paused(true),
        user.add_moderator("user"),
        user.remove_moderator("anyone"),
    ] {
        assert!(matches!(result, Err(Error::Forbidden { .. })));
    }
    assert!(!user.is_paused().unwrap());
    assert!(!user.is_moderator("user").unwrap());
}

#[test]
fn test_owner_cannot_freeze_own_entry() {
    let world = World::new();
    let a = world.as_("A");
    a.create_entry("k", "v").unwrap();
    assert!(matches!(
        a.set_key_frozen("k", true),
        Err(Error::Forbidden { .. })
    ));

    // The admin is not a moderator either until added
    assert!(matches!(
        world.admin().set_key_frozen("k", true),
        Err(Error::Forbidden { .. })
    ));
}

#[test]
fn test_add_moderator_is_idempotent() {
    let world = World::new();
    let admin = world.admin();
    admin.add_moderator("M").unwrap();
    admin.add_moderator("M").unwrap();
    assert_eq!(admin.info().unwrap().moderator_count, 1);

    admin.remove_moderator("M").unwrap();
    assert!(!admin.is_moderator("M").unwrap());
}

#[test]
fn test_rejected_calls_change_nothing() {
    let world = World::new();
    let a = world.as_("A");
    a.create_entry("k", "v").unwrap();
    let before = a.info().unwrap();

    let _ = a.create_entry("k", "again");
    let _ = world.as_("B").update_entry("k", "x");
    let _ = world.as_("B").transfer_entry("k", "B");
    let _ = a.create_entry("", "v");

    assert_eq!(a.info().unwrap(), before);
    let entry = a.get_entry("k").unwrap();
    assert_eq!(entry.value, "v");
    assert_eq!(entry.version, 1);
}

#[test]
fn test_index_stable_across_middle_removal() {
    let world = World::new();
    let c = world.as_("C");
    for key in ["a", "b", "c", "d"] {
        c.create_entry(key, "v").unwrap();
    }

    c.delete_entry("b").unwrap();
    assert_eq!(c.keys_by_owner("C").unwrap(), vec!["a", "c", "d"]);
    assert_eq!(c.get_key_by_owner("C", 1).unwrap(), "c");

    c.transfer_entry("c", "D").unwrap();
    assert_eq!(c.keys_by_owner("C").unwrap(), vec!["a", "d"]);
    assert_eq!(c.get_key_count("D").unwrap(), 1);
}
