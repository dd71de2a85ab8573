//! Per tick movement of the player against the single static platform.
use crate::config::PlatformConfig;
use crate::engine::input::KeyState;
use crate::engine::{Rect, Size};
use crate::sprite::player::Player;
use crate::sprite::state::Direction;

mod keys {
    pub const LEFT: &str = "ArrowLeft";
    pub const RIGHT: &str = "ArrowRight";
    pub const UP: &str = "ArrowUp";
    pub const JUMP: &str = "Space";
    pub const DOWN: &str = "ArrowDown";
}

/// Logical controls for one tick, decoupled from key codes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub down: bool,
}

impl Controls {
    pub fn from_keys(keystate: &KeyState) -> Self {
        Controls {
            left: keystate.is_pressed(keys::LEFT),
            right: keystate.is_pressed(keys::RIGHT),
            jump: keystate.is_pressed(keys::UP) || keystate.is_pressed(keys::JUMP),
            down: keystate.is_pressed(keys::DOWN),
        }
    }

    pub fn moving(&self) -> bool {
        self.left || self.right
    }
}

/// The play area: a fixed size rectangle anchored bottom-center
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Platform {
    pub rect: Rect,
}

impl Platform {
    pub fn anchored(viewport: Size, config: &PlatformConfig) -> Self {
        Platform {
            rect: Rect::new_from_x_y(
                (viewport.width - config.width) / 2.0,
                viewport.height - config.height - config.bottom_margin,
                config.width,
                config.height,
            ),
        }
    }

    pub fn top(&self) -> f32 {
        self.rect.y()
    }
}

/// Swept landing test: did the bottom edge cross `top` while moving down
/// during this tick's vertical displacement
pub fn crossed_top(previous_bottom: f32, bottom: f32, top: f32) -> bool {
    previous_bottom <= top && bottom >= top
}

/// Advances the player one tick
/// - horizontal : direct position delta, left and right add up
/// - jump       : only from the ground
/// - vertical   : gravity, then position
/// - landing    : snap onto the platform top
/// - falling below the viewport kills
pub fn step(player: &mut Player, platform: &Platform, controls: &Controls, viewport: Size) {
    if controls.right {
        player.position.x += player.walk_speed;
        player.direction = Direction::Right;
    }
    if controls.left {
        player.position.x -= player.walk_speed;
        player.direction = Direction::Left;
    }
    if controls.jump && player.on_ground {
        player.speed_y = player.jump_strength;
        player.on_ground = false;
    }

    let previous_bottom = player.bottom();
    player.speed_y += player.gravity;
    player.position.y += player.speed_y;

    player.on_ground = false;
    if player.bounding_box().overlaps_horizontally(&platform.rect)
        && crossed_top(previous_bottom, player.bottom(), platform.top())
    {
        player.stand_on(platform.top());
        player.speed_y = 0.0;
        player.on_ground = true;
    }

    if player.position.y > viewport.height {
        player.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use approx::assert_relative_eq;

    const VIEWPORT: Size = Size {
        width: 800.0,
        height: 600.0,
    };

    fn setup() -> (Player, Platform) {
        let config = GameConfig::default();
        let platform = Platform::anchored(VIEWPORT, &config.platform);
        let player = Player::new(&config, VIEWPORT, &platform.rect);
        (player, platform)
    }

    #[test]
    fn platform_is_anchored_bottom_center() {
        let (_, platform) = setup();
        assert_relative_eq!(platform.rect.x(), 125.0);
        assert_relative_eq!(platform.rect.y(), 150.0);
    }

    #[test]
    fn standing_player_stays_grounded() {
        let (mut player, platform) = setup();
        for _ in 0..10 {
            step(&mut player, &platform, &Controls::default(), VIEWPORT);
            assert!(player.on_ground);
            assert_relative_eq!(player.bottom(), platform.top());
            assert_relative_eq!(player.speed_y, 0.0);
        }
    }

    #[test]
    fn left_and_right_cancel_out() {
        let (mut player, platform) = setup();
        let start = player.position.x;
        let controls = Controls {
            left: true,
            right: true,
            ..Controls::default()
        };
        step(&mut player, &platform, &controls, VIEWPORT);
        assert_relative_eq!(player.position.x, start);
        assert_eq!(player.direction, Direction::Left);
        assert!(controls.moving());
    }

    #[test]
    fn jump_leaves_the_ground_once() {
        let (mut player, platform) = setup();
        let jump = Controls {
            jump: true,
            ..Controls::default()
        };
        step(&mut player, &platform, &jump, VIEWPORT);
        assert!(!player.on_ground);
        assert_relative_eq!(player.speed_y, -11.5);

        // holding jump in the air does not jump again
        step(&mut player, &platform, &jump, VIEWPORT);
        assert_relative_eq!(player.speed_y, -11.0);
    }

    #[test]
    fn jump_lands_back_on_the_platform() {
        let (mut player, platform) = setup();
        let jump = Controls {
            jump: true,
            ..Controls::default()
        };
        step(&mut player, &platform, &jump, VIEWPORT);
        let mut ticks = 1;
        while !player.on_ground {
            assert!(player.bottom() < platform.top());
            step(&mut player, &platform, &Controls::default(), VIEWPORT);
            ticks += 1;
            assert!(ticks < 100, "never landed");
        }
        assert_relative_eq!(player.position.y, platform.top() - player.size.height);
        assert_relative_eq!(player.speed_y, 0.0);
    }

    #[test]
    fn falling_onto_platform_snaps_exactly() {
        let (mut player, platform) = setup();
        player.on_ground = false;
        player.position.y = platform.top() - player.size.height - 3.0;
        player.speed_y = 6.0;

        step(&mut player, &platform, &Controls::default(), VIEWPORT);

        assert_relative_eq!(player.position.y, platform.top() - player.size.height);
        assert_relative_eq!(player.speed_y, 0.0);
        assert!(player.on_ground);
    }

    #[test]
    fn moving_up_through_platform_does_not_land() {
        let (mut player, platform) = setup();
        player.on_ground = false;
        // feet below the top, rising
        player.position.y = platform.top() - player.size.height + 20.0;
        player.speed_y = -10.0;

        step(&mut player, &platform, &Controls::default(), VIEWPORT);

        assert!(!player.on_ground);
        assert_relative_eq!(player.speed_y, -9.5);
    }

    #[test]
    fn walking_off_the_edge_falls_to_death() {
        let (mut player, platform) = setup();
        player.position.x = platform.rect.right();
        let mut ticks = 0;
        while player.alive {
            step(&mut player, &platform, &Controls::default(), VIEWPORT);
            assert!(!player.on_ground);
            ticks += 1;
            assert!(ticks < 1000, "never died");
        }
        assert!(player.position.y > VIEWPORT.height);
    }

    fn controls_for(codes: &[&str]) -> Controls {
        let mut keystate = KeyState::new();
        for code in codes {
            keystate.set_pressed(code);
        }
        Controls::from_keys(&keystate)
    }

    #[test]
    fn arrow_up_and_space_both_jump() {
        let jump = Controls {
            jump: true,
            ..Controls::default()
        };
        assert_eq!(controls_for(&["ArrowUp"]), jump);
        assert_eq!(controls_for(&["Space"]), jump);
    }

    #[test]
    fn arrows_map_to_walk_and_dock() {
        assert_eq!(
            controls_for(&["ArrowLeft"]),
            Controls {
                left: true,
                ..Controls::default()
            }
        );
        assert_eq!(
            controls_for(&["ArrowRight"]),
            Controls {
                right: true,
                ..Controls::default()
            }
        );
        assert_eq!(
            controls_for(&["ArrowDown"]),
            Controls {
                down: true,
                ..Controls::default()
            }
        );
        assert_eq!(
            controls_for(&["Space", "ArrowDown"]),
            Controls {
                jump: true,
                down: true,
                ..Controls::default()
            }
        );
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        assert_eq!(controls_for(&["KeyA", "Enter"]), Controls::default());
    }

    #[test]
    fn crossing_test_is_one_sided() {
        assert!(crossed_top(99.0, 101.0, 100.0));
        assert!(crossed_top(100.0, 100.5, 100.0));
        assert!(!crossed_top(101.0, 99.0, 100.0));
        assert!(!crossed_top(90.0, 95.0, 100.0));
    }
}
