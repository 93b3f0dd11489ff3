mod common;

use common::*;
use nalgebra::{UnitQuaternion, Vector3};
use pretty_assertions::assert_eq;
use rotorsim::physics::{CollisionInfo, ExternalPhysicsEngine, FastPhysicsEngine};
use rotorsim::state::Pose;
use rotorsim::utils::{Clock, SteppableClock};
use rotorsim::vehicles::DirectActuation;
use rotorsim::{PhysicsWorld, WorldCommand, WorldError};
use std::sync::Arc;
use std::thread;

fn fast_world(step_seconds: f64) -> PhysicsWorld {
    PhysicsWorld::new(
        Some(Box::new(FastPhysicsEngine::default())),
        Arc::new(SteppableClock::new(step_seconds)),
        1_000_000,
    )
}

#[test]
fn test_async_continue_for_time_blocks_until_paused() {
    let mut world = fast_world(0.01);
    let id = world.add_body(create_test_ball(Pose::zero())).unwrap();
    world.pause(true);
    world.start_async_updater().unwrap();

    let start = world.clock().now_nanos();
    world.continue_for_time(0.1);

    assert!(world.is_paused());
    assert!(world.clock().now_nanos() - start >= 100_000_000);
    assert!(world.frame_count() >= 10);

    // no further integration while paused
    let paused_pose = world.pose(id).unwrap();
    thread::sleep(std::time::Duration::from_millis(20));
    assert_eq!(world.pose(id).unwrap(), paused_pose);

    world.stop_async_updater();
    assert!(!world.is_async_updater_running());
}

#[test]
fn test_second_updater_rejected() {
    let mut world = fast_world(0.01);
    world.start_async_updater().unwrap();
    assert!(matches!(
        world.start_async_updater(),
        Err(WorldError::UpdaterRunning)
    ));
    world.stop_async_updater();
}

#[test]
fn test_continue_for_frames_on_caller_thread() {
    let world = fast_world(0.01);
    let id = world.add_body(create_test_ball(Pose::zero())).unwrap();
    world.pause(true);

    world.continue_for_frames(3);
    assert_eq!(world.frame_count(), 3);
    world.continue_for_frames(2);
    assert_eq!(world.frame_count(), 5);

    let kin = world.kinematics(id).unwrap();
    assert_kinematics_finite(&kin);
    assert!(kin.pose.position.z > 0.0);
}

#[test]
fn test_commands_from_another_thread() {
    let world = fast_world(0.01);
    let id = world.add_body(create_test_ball(Pose::zero())).unwrap();
    world.pause(true);

    let sender = world.command_sender();
    let target = Pose::new(
        Vector3::new(3.0, 4.0, -20.0),
        UnitQuaternion::from_euler_angles(0.0, 0.0, 0.5),
    );
    thread::spawn(move || {
        sender
            .send(WorldCommand::SetPose { body: id, pose: target })
            .unwrap();
    })
    .join()
    .unwrap();

    world.update();
    assert_pose_eq(&world.pose(id).unwrap(), &target, 1e-12);
}

#[test]
fn test_reset_is_applied_before_pose_overrides() {
    let world = fast_world(0.01);
    let id = world.add_body(create_test_ball(Pose::zero())).unwrap();
    world.continue_for_frames(10);
    assert!(world.pose(id).unwrap().position.z > 0.0);

    let target = Pose::new(Vector3::new(0.0, 0.0, -5.0), UnitQuaternion::identity());
    world.set_pose(id, target).unwrap();
    world.reset();
    world.pause(true);
    world.update();

    // the reset queued after the pose still runs first
    assert_eq!(world.pose(id).unwrap(), target);
    assert_eq!(world.collision_response(id).unwrap().collision_count_raw, 0);
}

#[test]
fn test_ground_contact_through_world() {
    let world = fast_world(0.01);
    let id = world.add_body(create_test_ball(Pose::zero())).unwrap();
    world.continue_for_frames(10);

    let position = world.pose(id).unwrap().position;
    world
        .set_collision_info(
            id,
            CollisionInfo::new(
                Vector3::new(0.0, 0.0, -1.0),
                position + Vector3::new(0.0, 0.0, 0.1),
                position,
                0.0,
                world.clock().now_nanos(),
            ),
        )
        .unwrap();
    world.continue_for_frames(2);

    assert!(world.is_grounded(id).unwrap());
    assert_eq!(world.collision_response(id).unwrap().collision_count_raw, 2);
}

#[test]
fn test_external_engine_leaves_pose_to_host() {
    let controller = DirectActuation::new(9);
    let handle = controller.handle();
    let world = PhysicsWorld::new(
        Some(Box::new(ExternalPhysicsEngine::new())),
        Arc::new(SteppableClock::new(0.01)),
        1_000_000,
    );
    let id = world.add_body(create_tiltrotor(controller)).unwrap();

    handle.set(3, 1.0);
    world.continue_for_frames(5);
    assert_eq!(world.pose(id).unwrap(), Pose::zero());

    // actuators still run
    let throttle = world
        .with_body(id, |body| body.wrench_vertex(1).clone())
        .unwrap();
    match throttle {
        rotorsim::vehicles::WrenchVertex::TiltableRotor(rotor) => {
            assert_eq!(rotor.output().rotor_output.control_signal_input, 1.0)
        }
        other => panic!("unexpected vertex {}", other.kind()),
    }
}

#[test]
fn test_world_without_engine_still_reports() {
    let world = PhysicsWorld::new(None, Arc::new(SteppableClock::new(0.01)), 1_000_000);
    let id = world.add_body(create_test_ball(Pose::zero())).unwrap();
    world.continue_for_frames(4);

    assert_eq!(world.pose(id).unwrap(), Pose::zero());

    world.update_state_report();
    let report = world.get_debug_report();
    assert!(report.starts_with("Frame: 4\n"));
    assert!(report.contains("ball:"));
}
