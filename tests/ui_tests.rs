use glam::{Vec2, Vec4};
use spaceport::core::{Button, KeyAction};
use spaceport::frame::World;
use spaceport::ui::*;
use spaceport::vehicle::{AnimationState, Vehicle};

fn world() -> World {
    World::new(Vehicle::default())
}

fn find<'a>(hud: &'a mut [HudButton], label: &str) -> &'a mut HudButton {
    hud.iter_mut()
        .find(|b| b.label() == label)
        .unwrap_or_else(|| panic!("no '{}' button", label))
}

#[cfg(test)]
mod layout_tests {
    use super::*;

    #[test]
    fn test_layout_is_idempotent() {
        let mut hud = default_hud();
        for button in &mut hud {
            assert!(button.update_size(1920.0, 1080.0));
        }
        let first: Vec<ScreenRect> = hud.iter().map(|b| b.rect()).collect();

        for button in &mut hud {
            assert!(!button.update_size(1920.0, 1080.0));
        }
        let second: Vec<ScreenRect> = hud.iter().map(|b| b.rect()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_buttons_stay_inside_framebuffer() {
        let mut hud = default_hud();
        for (w, h) in [(640.0, 480.0), (1280.0, 720.0), (3840.0, 2160.0)] {
            for button in &mut hud {
                button.update_size(w, h);
                let rect = button.rect();
                assert!(rect.min.x >= 0.0 && rect.min.y >= 0.0);
                assert!(rect.max.x <= w && rect.max.y <= h);
            }
        }
    }

    #[test]
    fn test_launch_and_reset_straddle_centre() {
        let mut hud = default_hud();
        let launch = find(&mut hud, "Launch");
        launch.update_size(1000.0, 800.0);
        assert!(launch.rect().max.x < 500.0);

        let reset = find(&mut hud, "Reset");
        reset.update_size(1000.0, 800.0);
        assert!(reset.rect().min.x > 500.0);
    }

    #[test]
    fn test_rect_edges_are_inclusive() {
        let rect = ScreenRect::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 30.0));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(20.0, 30.0)));
        assert!(!rect.contains(Vec2::new(20.1, 15.0)));
    }
}

#[cfg(test)]
mod command_tests {
    use super::*;

    #[test]
    fn test_launch_command_toggles_vehicle() {
        let mut world = world();
        let mut hud = default_hud();
        let launch = find(&mut hud, "Launch");

        launch.trigger(&mut world);
        assert_eq!(world.vehicle.state(), AnimationState::Running);
        launch.trigger(&mut world);
        assert_ne!(world.vehicle.state(), AnimationState::Running);
    }

    #[test]
    fn test_reset_command_returns_to_pad() {
        let mut world = world();
        world.vehicle.toggle_run();
        world.vehicle.advance(2.0);

        let mut hud = default_hud();
        find(&mut hud, "Reset").trigger(&mut world);
        assert_eq!(world.vehicle.state(), AnimationState::Reset);
    }

    #[test]
    fn test_altitude_readout_is_inert() {
        let mut world = world();
        let mut hud = default_hud();
        find(&mut hud, "Altitude: ").trigger(&mut world);
        assert_eq!(world.vehicle.state(), AnimationState::Reset);
    }

    #[test]
    fn test_view_reflects_state_and_readout() {
        let mut world = world();
        world.vehicle.toggle_run();
        world.vehicle.advance(1.0);

        let mut hud = default_hud();
        let launch = find(&mut hud, "Launch");
        launch.update_size(1280.0, 720.0);
        let idle = launch.view(&world).fill;

        launch.update_mouse_move(530.0, 650.0);
        launch.update_mouse_press(Button::MouseLeft, KeyAction::Press);
        let view = launch.view(&world);
        assert_eq!(view.fill, Vec4::ONE);
        assert_ne!(view.fill, idle);
        assert_eq!(view.caption, "Launch");

        let altitude = find(&mut hud, "Altitude: ");
        assert_eq!(altitude.caption(&world), "Altitude: 0.08");
    }
}
