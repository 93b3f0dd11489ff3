use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::{Accelerations, KinematicsState, Twist, Wrench};
use crate::utils::{is_approximately_equal, TimePoint};

/// Tolerance on |normal_body.z| == 1 when classifying a ground hit.
pub const AXIS_TOLERANCE: f64 = 0.25;
/// Speeds at or below this are treated as resting contact.
pub const RESTING_VELOCITY_MAX: f64 = 0.1;
/// Integration cycles of travel added to the anti-penetration offset.
pub const COLLISION_RESPONSE_CYCLES: f64 = 1.0;
/// Ad hoc rolling friction applied to angular velocity after an impulse.
pub const ANGULAR_DAMPING: f64 = 0.9;

const MIN_IMPULSE_DENOMINATOR: f64 = 1e-12;
const MIN_TANGENT_SPEED: f64 = 1e-9;

/// Contact reported by the host's collision detection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionInfo {
    pub has_collided: bool,
    /// Contact normal, world frame, pointing away from the obstacle.
    pub normal: Vector3<f64>,
    /// Point of impact on the body, world frame.
    pub impact_point: Vector3<f64>,
    /// Body position at the time of contact, world frame.
    pub position: Vector3<f64>,
    pub penetration_depth: f64,
    /// Monotonic, used to tell new contacts from ones already handled.
    pub time_stamp: TimePoint,
    pub object_name: String,
    pub object_id: i32,
}

impl CollisionInfo {
    pub fn new(
        normal: Vector3<f64>,
        impact_point: Vector3<f64>,
        position: Vector3<f64>,
        penetration_depth: f64,
        time_stamp: TimePoint,
    ) -> Self {
        Self {
            has_collided: true,
            normal,
            impact_point,
            position,
            penetration_depth,
            time_stamp,
            object_name: String::new(),
            object_id: -1,
        }
    }
}

/// Cumulative diagnostics, mutated only by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionResponse {
    pub collision_time_stamp: TimePoint,
    pub collision_count_raw: u32,
    pub collision_count_non_resting: u32,
}

impl CollisionResponse {
    /// True when `info` describes a contact not yet responded to.
    pub fn is_new(&self, info: &CollisionInfo) -> bool {
        info.has_collided && info.time_stamp > self.collision_time_stamp
    }

    pub fn record(&mut self, info: &CollisionInfo, next: &KinematicsState, responded: bool) {
        self.collision_time_stamp = info.time_stamp;
        self.collision_count_raw += 1;

        if responded
            && next.twist.linear.norm_squared() > RESTING_VELOCITY_MAX * RESTING_VELOCITY_MAX
        {
            self.collision_count_non_resting += 1;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The body properties the impulse response needs.
#[derive(Debug, Clone, Copy)]
pub struct ContactProperties {
    pub mass: f64,
    pub inertia_inv: Matrix3<f64>,
    pub restitution: f64,
    pub friction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionResolution {
    /// The collision-free state was replaced.
    pub responded: bool,
    /// Ground lock engaged; the body should be marked grounded.
    pub grounded: bool,
}

/// Impulse response against a static obstacle with Coulomb friction.
///
/// `next` holds the collision-free candidate on entry and is overwritten when a
/// response is generated.
pub fn resolve_collision(
    dt: f64,
    info: &CollisionInfo,
    body: &ContactProperties,
    current: &KinematicsState,
    next: &mut KinematicsState,
    next_wrench: &mut Wrench,
    enable_ground_lock: bool,
) -> CollisionResolution {
    // moving away from the contact already
    if info.normal.dot(&next.twist.linear) >= 0.0 {
        return CollisionResolution::default();
    }

    let orientation = current.pose.orientation;
    let vcur_avg = current.twist.linear + current.accelerations.linear * dt;
    let angular_avg = current.twist.angular + current.accelerations.angular * dt;

    let r = orientation.inverse_transform_vector(&(info.impact_point - info.position));
    let normal_body = orientation.inverse_transform_vector(&info.normal);

    let is_ground_normal = is_approximately_equal(normal_body.z.abs(), 1.0, AXIS_TOLERANCE);
    let z_vel = vcur_avg.z;
    let is_landing = z_vel > vcur_avg.x.abs() && z_vel > vcur_avg.y.abs();
    let ground_collision = is_ground_normal && is_landing;

    let (restitution, friction) = if ground_collision {
        (0.0, 1.0)
    } else {
        (body.restitution, body.friction)
    };

    let vcur_avg_body = orientation.inverse_transform_vector(&vcur_avg);
    let contact_vel_body = vcur_avg_body + angular_avg.cross(&r);

    let impulse_denom = impulse_denominator(body, &r, &normal_body);
    if !impulse_denom.is_finite() || impulse_denom.abs() < MIN_IMPULSE_DENOMINATOR {
        warn!(impulse_denom, "degenerate collision impulse, keeping free motion");
        return CollisionResolution::default();
    }
    let impulse_mag = -contact_vel_body.dot(&normal_body) * (1.0 + restitution) / impulse_denom;

    let mut linear = vcur_avg + info.normal * (impulse_mag / body.mass);
    let mut angular = angular_avg + body.inertia_inv * r.cross(&normal_body) * impulse_mag;

    let contact_tang_body = contact_vel_body - normal_body * normal_body.dot(&contact_vel_body);
    let tangent_speed = contact_tang_body.norm();
    if tangent_speed > MIN_TANGENT_SPEED {
        let tang_unit_body = contact_tang_body / tangent_speed;
        let friction_denom = impulse_denominator(body, &r, &tang_unit_body);
        if friction_denom.is_finite() && friction_denom.abs() >= MIN_IMPULSE_DENOMINATOR {
            // Coulomb: tangential impulse bounded by friction times normal impulse
            let friction_mag = -(tangent_speed / friction_denom).min(friction * impulse_mag.abs());
            let tang_unit = orientation.transform_vector(&tang_unit_body);

            linear += tang_unit * (friction_mag / body.mass);
            angular += body.inertia_inv * r.cross(&tang_unit_body) * friction_mag;
        }
    }

    angular *= ANGULAR_DAMPING;

    next.twist = Twist { linear, angular };
    next.accelerations = Accelerations::zero();
    next.pose = current.pose;

    let mut grounded = false;
    if enable_ground_lock && ground_collision {
        let (_, _, yaw) = next.pose.orientation.euler_angles();
        next.pose.orientation = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw);
        next.twist = Twist::zero();
        next.pose.position = info.position;
        // small bump opposite the impact velocity
        next.accelerations.linear = -0.5 * vcur_avg;
        grounded = true;
    } else {
        next.pose.position = info.position
            + info.normal * info.penetration_depth
            + next.twist.linear * (dt * COLLISION_RESPONSE_CYCLES);
    }

    *next_wrench = Wrench::zero();

    CollisionResolution {
        responded: true,
        grounded,
    }
}

/// `1/m + ((I⁻¹ (r × n)) × r) · n`
fn impulse_denominator(body: &ContactProperties, r: &Vector3<f64>, n: &Vector3<f64>) -> f64 {
    1.0 / body.mass + (body.inertia_inv * r.cross(n)).cross(r).dot(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Pose;
    use approx::assert_relative_eq;

    fn unit_body(restitution: f64, friction: f64) -> ContactProperties {
        ContactProperties {
            mass: 1.0,
            inertia_inv: Matrix3::identity(),
            restitution,
            friction,
        }
    }

    fn moving(linear: Vector3<f64>) -> KinematicsState {
        KinematicsState {
            twist: Twist {
                linear,
                angular: Vector3::zeros(),
            },
            ..KinematicsState::default()
        }
    }

    #[test]
    fn test_moving_away_is_ignored() {
        let current = moving(Vector3::new(0.0, 0.0, -1.0));
        let mut next = current;
        let mut wrench = Wrench::new(Vector3::new(1.0, 0.0, 0.0), Vector3::zeros());
        let info = CollisionInfo::new(
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::zeros(),
            Vector3::zeros(),
            0.0,
            1,
        );

        let resolution = resolve_collision(
            0.01,
            &info,
            &unit_body(0.5, 0.5),
            &current,
            &mut next,
            &mut wrench,
            true,
        );

        assert!(!resolution.responded);
        assert_eq!(next, current);
        assert_eq!(wrench.force.x, 1.0);
    }

    #[test]
    fn test_ground_hit_locks_body() {
        let orientation = UnitQuaternion::from_euler_angles(0.1, -0.05, 1.2);
        let current = KinematicsState {
            pose: Pose::new(Vector3::new(0.0, 0.0, -0.1), orientation),
            twist: Twist {
                linear: Vector3::new(0.0, 0.0, 3.0),
                angular: Vector3::new(0.2, 0.0, 0.0),
            },
            ..KinematicsState::default()
        };
        let mut next = current;
        let mut wrench = Wrench::zero();
        let contact = Vector3::new(0.0, 0.0, 0.0);
        let info = CollisionInfo::new(
            Vector3::new(0.0, 0.0, -1.0),
            contact + Vector3::new(0.0, 0.0, 0.05),
            contact,
            0.01,
            5,
        );

        let resolution = resolve_collision(
            0.003,
            &info,
            &unit_body(0.55, 0.5),
            &current,
            &mut next,
            &mut wrench,
            true,
        );

        assert!(resolution.responded);
        assert!(resolution.grounded);
        assert_eq!(next.twist, Twist::zero());
        assert_eq!(next.pose.position, contact);
        let (roll, pitch, yaw) = next.pose.orientation.euler_angles();
        assert_relative_eq!(roll, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pitch, 0.0, epsilon = 1e-12);
        assert_relative_eq!(yaw, 1.2, epsilon = 1e-9);
        assert_relative_eq!(next.accelerations.linear.z, -1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_wall_hit_rebounds_with_restitution() {
        let current = moving(Vector3::new(-4.0, 0.0, 0.0));
        let mut next = current;
        let mut wrench = Wrench::zero();
        let info = CollisionInfo::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::zeros(),
            Vector3::zeros(),
            0.02,
            1,
        );

        let resolution = resolve_collision(
            0.01,
            &info,
            &unit_body(0.5, 0.3),
            &current,
            &mut next,
            &mut wrench,
            true,
        );

        assert!(resolution.responded);
        assert!(!resolution.grounded);
        assert_relative_eq!(next.twist.linear.x, 2.0, epsilon = 1e-12);
        assert_eq!(next.twist.angular, Vector3::zeros());
        // penetration depth plus one cycle of travel
        assert_relative_eq!(next.pose.position.x, 0.02 + 2.0 * 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_friction_impulse_is_capped() {
        let current = moving(Vector3::new(-1.0, 1.0, 0.0));
        let mut next = current;
        let mut wrench = Wrench::zero();
        let info = CollisionInfo::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::zeros(),
            Vector3::zeros(),
            0.0,
            1,
        );

        resolve_collision(
            0.01,
            &info,
            &unit_body(0.0, 0.5),
            &current,
            &mut next,
            &mut wrench,
            true,
        );

        assert_relative_eq!(next.twist.linear.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(next.twist.linear.y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_off_center_hit_spins_body() {
        let current = moving(Vector3::new(-1.0, 0.0, 0.0));
        let mut next = current;
        let mut wrench = Wrench::zero();
        let info = CollisionInfo::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-0.5, 0.5, 0.0),
            Vector3::zeros(),
            0.0,
            1,
        );

        resolve_collision(
            0.01,
            &info,
            &unit_body(1.0, 0.0),
            &current,
            &mut next,
            &mut wrench,
            true,
        );

        // r x n = (-0.5, 0.5, 0) x (1, 0, 0) = (0, 0, -0.5)
        assert!(next.twist.angular.z < 0.0);
        assert!(next.twist.linear.x > 0.0);
    }

    #[test]
    fn test_response_counters() {
        let mut response = CollisionResponse::default();
        let info = CollisionInfo::new(Vector3::z(), Vector3::zeros(), Vector3::zeros(), 0.0, 7);
        assert!(response.is_new(&info));

        response.record(&info, &moving(Vector3::new(1.0, 0.0, 0.0)), true);
        response.record(&info, &moving(Vector3::new(0.05, 0.0, 0.0)), true);
        response.record(&info, &moving(Vector3::new(3.0, 0.0, 0.0)), false);

        assert_eq!(response.collision_count_raw, 3);
        assert_eq!(response.collision_count_non_resting, 1);
        assert_eq!(response.collision_time_stamp, 7);
        assert!(!response.is_new(&info));
    }
}
