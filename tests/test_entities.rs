use monster_arena::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn held_flags_default_to_released() {
    let held = Held::default();
    assert!(!held.up && !held.down && !held.left && !held.right);
}

#[test]
fn monster_kind_roster_has_six_entries() {
    assert_eq!(MonsterKind::ALL.len(), 6);
}

#[test]
fn has_alive_enemies_reflects_the_roster() {
    let mut world =
        monster_arena::compute::init_world(800.0, 480.0, &mut StdRng::seed_from_u64(42));
    assert!(world.has_alive_enemies());
    for e in &mut world.enemies {
        e.alive = false;
    }
    assert!(!world.has_alive_enemies());
}
