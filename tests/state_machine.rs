//! Transition bookkeeping of the monster state machine, observed through the
//! event outbox.

use rstest::{fixture, rstest};
use skitter::{MonsterConfig, MonsterEvent, StateKind};
use test_utils::Arena;

#[fixture]
fn arena() -> Arena {
    Arena::flat(MonsterConfig::default())
}

fn transitions(arena: &Arena) -> Vec<MonsterEvent> {
    arena
        .events()
        .iter()
        .copied()
        .filter(|e| matches!(e, MonsterEvent::StateEntered(_) | MonsterEvent::StateExited(_)))
        .collect()
}

#[rstest]
fn idle_entry_is_deferred_until_first_tick(mut arena: Arena) {
    assert_eq!(arena.monster.state(), StateKind::Idle);
    assert!(arena.events().is_empty());
    arena.tick();
    assert_eq!(
        transitions(&arena),
        vec![MonsterEvent::StateEntered(StateKind::Idle)]
    );
}

#[rstest]
#[case(StateKind::Chase)]
#[case(StateKind::Charge)]
#[case(StateKind::Attack)]
#[case(StateKind::Kamikaze)]
#[case(StateKind::Hurt)]
#[case(StateKind::Dive)]
#[case(StateKind::Held)]
#[case(StateKind::Dead)]
#[case(StateKind::Wander)]
fn exit_is_reported_before_enter(mut arena: Arena, #[case] next: StateKind) {
    arena.tick();
    arena.clear_events();
    assert!(arena.set_state(next));
    assert_eq!(arena.monster.state(), next);
    assert_eq!(
        transitions(&arena),
        vec![
            MonsterEvent::StateExited(StateKind::Idle),
            MonsterEvent::StateEntered(next),
        ]
    );
}

#[rstest]
fn requesting_the_active_state_changes_nothing(mut arena: Arena) {
    arena.tick();
    arena.clear_events();
    assert!(!arena.set_state(StateKind::Idle));
    assert!(arena.events().is_empty());

    assert!(arena.set_state(StateKind::Hurt));
    arena.clear_events();
    assert!(!arena.set_state(StateKind::Hurt));
    assert!(arena.events().is_empty());
    assert_eq!(arena.monster.state(), StateKind::Hurt);
}

#[rstest]
fn dead_ignores_requests_damage_and_grabs(mut arena: Arena) {
    arena.tick();
    assert!(arena.set_state(StateKind::Dead));
    assert!(arena.monster.health().is_dead());
    arena.clear_events();

    assert!(!arena.set_state(StateKind::Idle));
    assert!(!arena.set_state(StateKind::Hurt));
    assert_eq!(arena.damage(25.0), 0.0);
    assert!(!arena.pickup());
    assert!(!arena.monster.is_grabbable());

    arena.run_for(0.5);
    assert_eq!(arena.monster.state(), StateKind::Dead);
    assert!(transitions(&arena).is_empty());
}

#[rstest]
fn dead_body_shrinks_then_reports_pool_once(mut arena: Arena) {
    arena.tick();
    arena.set_state(StateKind::Dead);
    assert_eq!(arena.count(|e| *e == MonsterEvent::Died), 1);

    arena.run_for(0.9);
    assert_eq!(arena.monster.scale(), 1.0);

    arena.run_for(1.0);
    assert_eq!(arena.monster.scale(), 0.0);
    arena.run_for(0.5);
    assert_eq!(arena.count(|e| *e == MonsterEvent::ReadyForPool), 1);
}

#[rstest]
fn reset_leaves_dead_for_a_fresh_idle(mut arena: Arena) {
    arena.tick();
    arena.set_state(StateKind::Dead);
    arena.run_for(2.0);
    arena.clear_events();

    arena.reset();
    assert_eq!(arena.monster.state(), StateKind::Idle);
    assert_eq!(
        transitions(&arena),
        vec![
            MonsterEvent::StateExited(StateKind::Dead),
            MonsterEvent::StateEntered(StateKind::Idle),
        ]
    );
    assert_eq!(arena.monster.health().current(), arena.monster.health().max());
    assert_eq!(arena.monster.scale(), 1.0);
    assert!(arena.monster.is_grabbable());
}

#[rstest]
fn reset_re_enters_idle_even_when_idle(mut arena: Arena) {
    arena.tick();
    arena.clear_events();
    arena.reset();
    assert_eq!(
        transitions(&arena),
        vec![
            MonsterEvent::StateExited(StateKind::Idle),
            MonsterEvent::StateEntered(StateKind::Idle),
        ]
    );
}
