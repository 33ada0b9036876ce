//! The reference scenarios, step by step.

use crate::common::World;
use keyreg::{Error, Identity};

#[test]
fn scenario_ownership_follows_transfer() {
    let world = World::new();
    let a = world.as_("A");
    let b = world.as_("B");

    a.create_entry("k1", "v1").unwrap();
    assert_eq!(a.get_entry("k1").unwrap().version, 1);

    a.update_entry("k1", "v2").unwrap();
    assert_eq!(a.get_entry("k1").unwrap().version, 2);

    a.transfer_entry("k1", "B").unwrap();
    b.update_entry("k1", "v3").unwrap();
    let entry = b.get_entry("k1").unwrap();
    assert_eq!(entry.version, 3);
    assert_eq!(entry.value, "v3");
    assert_eq!(entry.owner, Identity::from("B"));

    assert!(matches!(
        a.update_entry("k1", "v4"),
        Err(Error::Forbidden { .. })
    ));
    assert_eq!(b.get_entry("k1").unwrap().version, 3);
}

#[test]
fn scenario_enumerate_three_keys() {
    let world = World::new();
    let c = world.as_("C");
    for key in ["c0", "c1", "c2"] {
        c.create_entry(key, "v").unwrap();
    }

    assert_eq!(c.get_key_count("C").unwrap(), 3);
    for i in 0..3 {
        let key = c.get_key_by_owner("C", i).unwrap();
        assert_eq!(c.get_entry(&key).unwrap().owner, Identity::from("C"));
    }
    assert_eq!(
        c.get_key_by_owner("C", 3),
        Err(Error::OutOfRange {
            owner: "C".into(),
            index: 3,
            count: 3
        })
    );
}

#[test]
fn scenario_pause_blocks_then_allows_create() {
    let world = World::new();
    let admin = world.admin();
    let user = world.as_("user");

    admin.set_paused(true).unwrap();
    assert_eq!(user.create_entry("k", "v"), Err(Error::AlreadyPaused));

    admin.set_paused(false).unwrap();
    user.create_entry("k", "v").unwrap();
    assert_eq!(user.get_entry("k").unwrap().version, 1);
}

#[test]
fn scenario_moderator_freeze_and_unfreeze() {
    let world = World::new();
    let d = world.as_("D");
    let e = world.as_("E");

    e.create_entry("ek", "v").unwrap();
    world.admin().add_moderator("D").unwrap();
    d.set_key_frozen("ek", true).unwrap();

    let frozen = Err(Error::Frozen { key: "ek".into() });
    assert_eq!(e.update_entry("ek", "v2"), frozen);
    assert_eq!(e.delete_entry("ek"), frozen);
    assert_eq!(e.transfer_entry("ek", "F"), frozen);

    d.set_key_frozen("ek", false).unwrap();
    e.update_entry("ek", "v2").unwrap();
    assert_eq!(e.get_entry("ek").unwrap().version, 2);

    // Delete and transfer work again too
    e.create_entry("ek2", "w").unwrap();
    d.set_key_frozen("ek2", true).unwrap();
    d.set_key_frozen("ek2", false).unwrap();
    e.delete_entry("ek2").unwrap();
    e.transfer_entry("ek", "F").unwrap();
    assert_eq!(e.get_key_count("E").unwrap(), 0);
    assert_eq!(world.as_("F").get_key_by_owner("F", 0).unwrap(), "ek");
}
