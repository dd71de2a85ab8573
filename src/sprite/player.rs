use crate::config::GameConfig;
use crate::engine::{Point, Rect, Size};
use crate::sprite::state::{Animation, Direction, PlayerState};

/// The one player of a session: physics, animation and health in one place.
/// Restart throws the whole value away and builds a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Point,
    pub size: Size,
    pub speed_y: f32,
    pub gravity: f32,
    pub jump_strength: f32,
    pub walk_speed: f32,
    pub on_ground: bool,
    pub direction: Direction,
    pub animation: Animation,
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,
    dock_height_ratio: f32,
}

impl Player {
    /// Centered in the viewport, standing on `platform`
    pub fn new(config: &GameConfig, viewport: Size, platform: &Rect) -> Self {
        let side = config.player_size();
        Player {
            position: Point {
                x: (viewport.width - side) / 2.0,
                y: platform.y() - side,
            },
            size: Size::new(side, side),
            speed_y: 0.0,
            gravity: config.physics.gravity,
            jump_strength: config.physics.jump_strength,
            walk_speed: config.physics.walk_speed,
            on_ground: true,
            direction: Direction::Right,
            animation: Animation::new(config.player.frame_speed),
            hp: config.player.max_hp,
            max_hp: config.player.max_hp,
            alive: true,
            dock_height_ratio: config.player.dock_height_ratio,
        }
    }

    /// Collision geometry, unaffected by docking
    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    /// Where the sprite is drawn: docking squashes it to a fraction of its
    /// height while keeping the feet in place
    pub fn draw_box(&self) -> Rect {
        if self.state() == PlayerState::Dock {
            let height = self.size.height * self.dock_height_ratio;
            Rect::new_from_x_y(
                self.position.x,
                self.position.y + (self.size.height - height),
                self.size.width,
                height,
            )
        } else {
            self.bounding_box()
        }
    }

    pub fn state(&self) -> PlayerState {
        self.animation.state
    }

    pub fn current_frame_key(&self) -> String {
        self.animation.current_frame_key(self.direction)
    }

    pub fn animate(&mut self, next: PlayerState) {
        self.animation = self.animation.update(next, self.direction);
    }

    /// Puts the feet exactly on `top`
    pub fn stand_on(&mut self, top: f32) {
        self.position.y = top - self.size.height;
    }

    /// A hit that empties hp kills
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
        if self.hp == 0 {
            self.kill();
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn kill(&mut self) {
        self.alive = false;
        self.animation = self.animation.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn player() -> Player {
        let platform = Rect::new_from_x_y(25.0, 150.0, 550.0, 400.0);
        Player::new(&GameConfig::default(), Size::new(600.0, 600.0), &platform)
    }

    #[test]
    fn spawns_centered_on_platform() {
        let player = player();
        assert_relative_eq!(player.position.x, 236.0);
        assert_relative_eq!(player.bottom(), 150.0);
        assert_eq!(player.hp, 100);
        assert!(player.alive);
        assert!(player.on_ground);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn hp_is_clamped_to_max() {
        let mut player = player();
        player.take_damage(10);
        player.heal(20);
        assert_eq!(player.hp, 100);
    }

    #[test]
    fn hp_never_goes_negative() {
        let mut player = player();
        player.hp = 5;
        player.take_damage(10);
        assert_eq!(player.hp, 0);
        assert!(!player.alive);
    }

    #[test]
    fn docking_shrinks_only_the_drawn_sprite() {
        let mut player = player();
        player.animate(PlayerState::Dock);

        let drawn = player.draw_box();
        assert_relative_eq!(drawn.height(), 128.0 * 0.6);
        assert_relative_eq!(drawn.bottom(), player.bottom());
        assert_eq!(player.bounding_box().size, player.size);
    }
}
