use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spaceport::camera::*;
use spaceport::core::{Button, CursorMode, KeyAction};
use spaceport::math::transform::transform_point;
use std::f32::consts::{FRAC_PI_2, TAU};

const EPS: f32 = 1e-4;

fn aiming_camera() -> Camera {
    let mut camera = Camera::new(Vec3::ZERO);
    camera.update_mouse_movement(0.0, 0.0);
    camera.update_mouse_button(LOOK_BUTTON, KeyAction::Press);
    camera
}

#[cfg(test)]
mod point_at_tests {
    use super::*;

    #[test]
    fn test_point_at_straight_ahead() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.point_at(Vec3::new(0.0, 0.0, -5.0));

        assert!(camera.pitch().abs() < EPS);
        assert!(camera.yaw().abs() < EPS);
        assert!(camera.forward().z < 0.0);
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn test_point_at_along_x() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.point_at(Vec3::new(5.0, 0.0, 0.0));

        assert!((camera.yaw() - FRAC_PI_2).abs() < EPS);
        assert!(camera.forward().abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn test_forward_faces_random_targets() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let eye = Vec3::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            );
            let target = eye
                + Vec3::new(
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                );
            if target.distance(eye) < 0.1 {
                continue;
            }

            let mut camera = Camera::new(eye);
            camera.point_at(target);

            let expected = (target - eye).normalize();
            assert!(
                camera.forward().abs_diff_eq(expected, 1e-3),
                "looking at {:?} from {:?} gave {:?}",
                target,
                eye,
                camera.forward()
            );
            assert!(camera.yaw() >= 0.0 && camera.yaw() < TAU);
        }
    }

    #[test]
    fn test_target_lands_on_view_axis() {
        let mut camera = Camera::new(Vec3::new(-3.0, 0.2, 5.0));
        let target = Vec3::new(-5.0, 1.5, 3.5);
        camera.point_at(target);

        let in_view = transform_point(&camera.view_matrix(), target);
        assert!(in_view.x.abs() < EPS);
        assert!(in_view.y.abs() < EPS);
        assert!(in_view.z < 0.0);
    }

    #[test]
    fn test_point_at_keeps_position() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let mut camera = Camera::new(start);
        camera.point_at(Vec3::new(-4.0, 0.0, 9.0));
        assert_eq!(camera.position(), start);
    }
}

#[cfg(test)]
mod tracking_tests {
    use super::*;

    #[test]
    fn test_track_applies_fixed_offset() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.track(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(camera.position(), Vec3::new(2.0, 3.0, 5.0));
    }

    #[test]
    fn test_track_leaves_orientation_alone() {
        let mut camera = aiming_camera();
        camera.update_mouse_movement(20.0, 10.0);
        let (pitch, yaw) = (camera.pitch(), camera.yaw());

        camera.track(Vec3::new(-7.0, 1.0, 0.5));
        assert_eq!(camera.pitch(), pitch);
        assert_eq!(camera.yaw(), yaw);
    }
}

#[cfg(test)]
mod mouse_look_tests {
    use super::*;

    #[test]
    fn test_pitch_bounded_under_random_motion() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut camera = aiming_camera();
        let (mut x, mut y) = (0.0_f64, 0.0_f64);

        for _ in 0..1000 {
            x += rng.random_range(-500.0..500.0);
            y += rng.random_range(-500.0..500.0);
            camera.update_mouse_movement(x, y);

            assert!(camera.pitch() >= -PITCH_LIMIT && camera.pitch() <= PITCH_LIMIT);
            assert!(camera.yaw() >= 0.0 && camera.yaw() < TAU);
        }
    }

    #[test]
    fn test_pitch_saturates_at_limit() {
        let mut camera = aiming_camera();
        camera.update_mouse_movement(0.0, 10_000.0);
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        camera.update_mouse_movement(0.0, -10_000.0);
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn test_negative_yaw_wraps_high() {
        let mut camera = aiming_camera();
        camera.update_mouse_movement(-10.0, 0.0);
        assert!((camera.yaw() - (TAU - 10.0 * MOUSE_SENSITIVITY)).abs() < EPS);
    }

    #[test]
    fn test_aim_toggle_restores_cursor_and_clears_flags() {
        let mut camera = Camera::new(Vec3::ZERO);
        assert_eq!(
            camera.update_mouse_button(LOOK_BUTTON, KeyAction::Press),
            Some(CursorMode::Captured)
        );
        assert_eq!(camera.cursor_mode(), CursorMode::Captured);

        camera.update_key_action(Button::KeyW, KeyAction::Press);
        camera.update_key_action(Button::Shift, KeyAction::Press);
        assert!(camera.movement().forward);

        assert_eq!(
            camera.update_mouse_button(LOOK_BUTTON, KeyAction::Press),
            Some(CursorMode::Normal)
        );
        assert!(!camera.is_aiming());
        assert_eq!(camera.cursor_mode(), CursorMode::Normal);
        assert_eq!(camera.movement(), MovementState::default());
    }

    #[test]
    fn test_reset_state_drops_everything() {
        let mut camera = aiming_camera();
        camera.update_key_action(Button::KeyA, KeyAction::Press);
        camera.reset_state();

        assert!(!camera.is_aiming());
        assert_eq!(camera.cursor_mode(), CursorMode::Normal);
        assert_eq!(camera.movement(), MovementState::default());

        camera.update_state(1.0);
        assert_eq!(camera.position(), Vec3::ZERO);
    }
}

#[cfg(test)]
mod movement_tests {
    use super::*;

    #[test]
    fn test_forward_follows_yaw() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.point_at(Vec3::new(5.0, 0.0, 0.0));
        camera.update_key_action(Button::KeyW, KeyAction::Press);
        camera.update_state(2.0);
        assert!(camera.position().abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_forward_follows_pitch() {
        let mut camera = Camera::new(Vec3::ZERO);
        let target = Vec3::new(0.0, 3.0, -4.0);
        camera.point_at(target);
        camera.step(
            MovementState {
                forward: true,
                ..Default::default()
            },
            5.0,
        );
        assert!(camera.position().abs_diff_eq(target, 1e-3));
    }

    #[test]
    fn test_speed_modifiers_scale_step() {
        let mut fast = Camera::new(Vec3::ZERO);
        fast.step(
            MovementState {
                forward: true,
                speed_up: true,
                ..Default::default()
            },
            1.0,
        );
        assert!((fast.position().z + SPEED_UP_FACTOR).abs() < EPS);

        let mut slow = Camera::new(Vec3::ZERO);
        slow.step(
            MovementState {
                backward: true,
                slow_down: true,
                ..Default::default()
            },
            1.0,
        );
        assert!((slow.position().z - SLOW_DOWN_FACTOR).abs() < EPS);
    }

    #[test]
    fn test_zero_dt_does_not_move() {
        let mut camera = Camera::new(Vec3::new(1.0, 1.0, 1.0));
        camera.update_key_action(Button::KeyE, KeyAction::Press);
        camera.update_state(0.0);
        assert_eq!(camera.position(), Vec3::new(1.0, 1.0, 1.0));
    }
}

#[cfg(test)]
mod projection_tests {
    use super::*;

    #[test]
    fn test_projection_maps_frustum_depth() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        let proj = camera.projection(16.0 / 9.0);

        let near = transform_point(&proj, Vec3::new(0.0, 0.0, 10.0 - NEAR_PLANE));
        let far = transform_point(&proj, Vec3::new(0.0, 0.0, 10.0 - FAR_PLANE));
        assert!((near.z + 1.0).abs() < 1e-3);
        assert!((far.z - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_projection_centres_view_axis() {
        let mut camera = Camera::new(Vec3::new(-3.0, 0.2, 5.0));
        let target = Vec3::new(-5.0, 0.1, 3.5);
        camera.point_at(target);

        let ndc = transform_point(&camera.projection(1.5), target);
        assert!(ndc.x.abs() < 1e-3);
        assert!(ndc.y.abs() < 1e-3);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }
}
