//! Input validation at the call surface.

use crate::common::World;
use keyreg::{Command, Error, Limits, ManualClock, Registry, Session, Timestamp};
use std::sync::Arc;

#[test]
fn test_empty_key_rejected() {
    let world = World::new();
    assert!(matches!(
        world.as_("A").create_entry("", "v"),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_oversized_value_rejected() {
    let world = World::new();
    let a = world.as_("A");
    let too_long = "x".repeat(Limits::default().max_value_chars + 1);
    assert!(matches!(
        a.create_entry("k", &too_long),
        Err(Error::InvalidArgument { .. })
    ));

    a.create_entry("k", "v").unwrap();
    assert!(matches!(
        a.update_entry("k", &too_long),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_limits_count_characters_not_bytes() {
    let limits = Limits {
        max_key_chars: 4,
        max_value_chars: 4,
    };
    let clock = Arc::new(ManualClock::new(Timestamp::from(0)));
    let registry = Registry::ephemeral_with("admin", limits, clock);
    let a = Session::new(registry, "A");

    a.create_entry("ключ", "東京駅前").unwrap();
    assert!(matches!(
        a.create_entry("ключи", "v"),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_validation_runs_before_pause() {
    let world = World::new();
    world.admin().set_paused(true).unwrap();
    assert!(matches!(
        world.as_("A").create_entry("", "v"),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_concat_respects_key_limit() {
    let world = World::new();
    let a = world.as_("A");
    let half = "k".repeat(Limits::default().max_key_chars / 2 + 1);
    assert!(matches!(
        a.concat_keys(&half, &half),
        Err(Error::InvalidArgument { .. })
    ));
    let key = a.concat_keys("user:", "42").unwrap();
    a.execute(Command::CreateEntry {
        key,
        value: "v".into(),
    })
    .unwrap();
    assert_eq!(a.keys_by_owner("A").unwrap(), vec!["user:42"]);
}
