//! Behaviour specs for a monster hunting a player, using rust-rspec.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use skitter::{MonsterConfig, MonsterEvent, StateKind, TargetId};
use test_utils::Arena;

#[derive(Clone)]
struct HuntFixture {
    arena: Arc<Mutex<Arena>>,
    player: Arc<Mutex<Option<TargetId>>>,
}

impl fmt::Debug for HuntFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuntFixture")
            .field("state", &self.guard().monster.state())
            .finish_non_exhaustive()
    }
}

impl HuntFixture {
    fn new() -> Self {
        Self {
            arena: Arc::new(Mutex::new(Arena::flat(MonsterConfig::default()))),
            player: Arc::new(Mutex::new(None)),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Arena> {
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh grounded monster with a player `distance` metres ahead.
    fn rebuild(&self, distance: f32) {
        let mut arena = self.guard();
        *arena = Arena::flat(MonsterConfig::default());
        arena.tick();
        let id = arena.add_player_ahead(distance);
        arena.clear_events();
        *self.player.lock().unwrap_or_else(PoisonError::into_inner) = Some(id);
    }

    fn player(&self) -> TargetId {
        self.player
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .expect("player placed")
    }

    fn run_for(&self, seconds: f32) {
        self.guard().run_for(seconds);
    }

    fn state(&self) -> StateKind {
        self.guard().monster.state()
    }

    fn move_player(&self, position: Vec3) {
        let player = self.player();
        self.guard().targets.set_position(player, position);
    }

    fn count(&self, event: MonsterEvent) -> usize {
        self.guard().count(|e| *e == event)
    }
}

#[test]
fn monster_hunts_a_nearby_player() {
    run_serial(&rspec::given(
        "a grounded monster with a player six metres ahead",
        HuntFixture::new(),
        |scenario: &mut Scenario<HuntFixture>| {
            scenario.before_each(|fixture| fixture.rebuild(6.0));

            scenario.when("a moment passes", |scenario| {
                scenario.before_each(|fixture| fixture.run_for(0.2));

                scenario.then("it is chasing the player", |fixture| {
                    assert_eq!(fixture.state(), StateKind::Chase);
                    assert_eq!(fixture.guard().monster.target(), Some(fixture.player()));
                });

                scenario.then("it has started walking", |fixture| {
                    assert!(fixture.guard().monster.velocity().length() > 0.0);
                });
            });

            scenario.when("the player runs out of range", |scenario| {
                scenario.before_each(|fixture| {
                    fixture.run_for(0.2);
                    fixture.move_player(Vec3::new(0.0, 0.0, 40.0));
                    fixture.run_for(0.1);
                });

                scenario.then("it gives up and idles", |fixture| {
                    assert_eq!(fixture.state(), StateKind::Idle);
                });
            });

            scenario.when("it reaches the player", |scenario| {
                scenario.before_each(|fixture| fixture.run_for(8.0));

                scenario.then("it has attacked at least once", |fixture| {
                    let player = fixture.player();
                    assert!(fixture.count(MonsterEvent::AttackHit { target: player }) >= 1);
                    assert!(fixture.count(MonsterEvent::StateEntered(StateKind::Charge)) >= 1);
                });
            });
        },
    ));
}

#[test]
fn monster_self_destructs_when_beaten() {
    run_serial(&rspec::given(
        "a monster fighting a player at arm's length",
        HuntFixture::new(),
        |scenario: &mut Scenario<HuntFixture>| {
            scenario.before_each(|fixture| {
                fixture.rebuild(1.5);
                fixture.guard().damage(125.0);
            });

            scenario.then("it switches to kamikaze at once", |fixture| {
                assert_eq!(fixture.state(), StateKind::Kamikaze);
            });

            scenario.when("the fuse burns down", |scenario| {
                scenario.before_each(|fixture| fixture.run_for(1.5));

                scenario.then("the player takes explosion damage", |fixture| {
                    let player = fixture.player();
                    let amount = fixture.guard().monster.config().combat.explosion_damage;
                    assert_eq!(
                        fixture.count(MonsterEvent::DealtDamage {
                            target: player,
                            amount
                        }),
                        1
                    );
                });

                scenario.then("the monster is dead", |fixture| {
                    assert_eq!(fixture.state(), StateKind::Dead);
                    assert_eq!(fixture.count(MonsterEvent::Died), 1);
                });
            });
        },
    ));
}
