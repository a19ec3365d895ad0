//! Navigation and animation calls made by the states, checked with mocks.

use glam::Vec3;
use mockall::mock;
use mockall::predicate::eq;
use skitter::collaborators::params;
use skitter::{Animator, Monster, MonsterConfig, NavAgent, Pose, StateKind, TargetTag};
use test_utils::{Arena, RecordingAgent, RecordingAnimator};

mock! {
    pub Agent {}
    impl NavAgent for Agent {
        fn set_enabled(&mut self, enabled: bool);
        fn is_enabled(&self) -> bool;
        fn set_destination(&mut self, destination: Vec3);
        fn stop(&mut self);
        fn resume(&mut self);
        fn is_stopped(&self) -> bool;
        fn remaining_distance(&self) -> f32;
        fn path_pending(&self) -> bool;
        fn next_waypoint(&self) -> Option<Vec3>;
        fn speed(&self) -> f32;
    }
}

mock! {
    pub Anim {}
    impl Animator for Anim {
        fn set_bool(&mut self, name: &str, value: bool);
        fn set_trigger(&mut self, name: &str);
        fn reset_trigger(&mut self, name: &str);
        fn is_in_state(&self, name: &str) -> bool;
        fn normalized_time(&self) -> f32;
    }
}

fn arena_with(monster: Monster) -> Arena {
    Arena::new(test_utils::flat_floor(), monster)
}

#[test]
fn chase_steers_the_agent_at_the_player() {
    let player = Vec3::new(0.0, 0.0, 6.0);
    let mut agent = MockAgent::new();
    agent.expect_stop().times(1..).return_const(());
    agent.expect_is_enabled().return_const(true);
    agent.expect_is_stopped().return_const(false);
    agent.expect_set_enabled().return_const(());
    agent.expect_resume().return_const(());
    agent
        .expect_set_destination()
        .with(eq(player))
        .times(1..)
        .return_const(());
    agent.expect_next_waypoint().return_const(Some(player));
    agent.expect_speed().return_const(1.0_f32);
    agent.expect_remaining_distance().return_const(6.0_f32);
    agent.expect_path_pending().return_const(false);

    let mut arena = arena_with(Monster::new(MonsterConfig::default(), Pose::IDENTITY).with_agent(agent));
    arena.add_target(TargetTag::Player, player);
    arena.tick();
    assert!(arena.run_until(StateKind::Chase, 0.1));
    arena.run_for(0.2);
    assert!(arena.monster.pose().position.z > 0.0);
}

#[test]
fn idle_dive_fires_one_trigger() {
    let mut anim = MockAnim::new();
    anim.expect_set_bool().returning(|_, _| ());
    anim.expect_reset_trigger().returning(|_| ());
    anim.expect_set_trigger()
        .withf(|name: &str| name == params::DIVE)
        .times(1)
        .returning(|_| ());
    anim.expect_is_in_state().return_const(false);
    anim.expect_normalized_time().return_const(0.0_f32);

    let mut arena =
        arena_with(Monster::new(MonsterConfig::default(), Pose::IDENTITY).with_animator(anim));
    assert!(arena.run_until(StateKind::Dive, 5.5));
    assert!(arena.run_until(StateKind::Idle, 2.0));
}

#[test]
fn held_disables_and_restores_the_agent() {
    let agent = RecordingAgent::default();
    let animator = RecordingAnimator::default();
    let monster = Monster::new(MonsterConfig::default(), Pose::IDENTITY)
        .with_agent(agent.clone())
        .with_animator(animator.clone());
    let mut arena = arena_with(monster);
    arena.tick();
    assert_eq!(animator.bool_param(params::GROUNDED), Some(true));
    assert_eq!(animator.bool_param(params::MOVING), Some(false));

    arena.pickup();
    assert!(!agent.log().enabled);
    assert_eq!(animator.bool_param(params::HELD), Some(true));
    assert_eq!(animator.bool_param(params::GROUNDED), Some(false));

    arena.release();
    assert_eq!(arena.monster.state(), StateKind::Idle);
    assert!(agent.log().enabled);
    assert_eq!(animator.bool_param(params::HELD), Some(false));
}

#[test]
fn kamikaze_waits_for_the_animation() {
    let animator = RecordingAnimator::default();
    animator.script(|log| {
        log.current_state = Some(params::KAMIKAZE.to_owned());
        log.normalized_time = 0.5;
    });
    let monster = Monster::new(MonsterConfig::default(), Pose::IDENTITY)
        .with_animator(animator.clone());
    let mut arena = arena_with(monster);
    arena.tick();
    arena.damage(125.0);
    assert_eq!(animator.trigger_count(params::KAMIKAZE), 1);

    arena.run_for(1.5);
    assert_eq!(arena.monster.state(), StateKind::Kamikaze);

    animator.script(|log| log.normalized_time = 1.0);
    assert!(arena.run_until(StateKind::Dead, 0.1));
    assert_eq!(animator.trigger_count(params::DEAD), 1);
}

#[test]
fn stalled_agent_abandons_the_chase() {
    let agent = RecordingAgent::default();
    agent.script(|log| log.speed = 0.0);
    let monster =
        Monster::new(MonsterConfig::default(), Pose::IDENTITY).with_agent(agent.clone());
    let mut arena = arena_with(monster);
    arena.add_target(TargetTag::Player, Vec3::new(0.0, 0.0, 8.0));
    arena.tick();
    assert!(arena.run_until(StateKind::Chase, 0.1));
    assert!(agent.log().destinations_set >= 1);

    assert!(arena.run_until(StateKind::Idle, 3.2));
}
