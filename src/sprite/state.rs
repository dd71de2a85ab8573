/// Animation state of the player, re-derived from physics and input on every
/// tick rather than driven by events.
///
/// ELI5:
/// ┌──────────────── State Selection (first match wins) ─────────────┐
/// │  not on ground        →  Jump                                   │
/// │  down held            →  Dock                                   │
/// │  left or right held   →  Walk                                   │
/// │  otherwise            →  Idle                                   │
/// └─────────────────────────────────────────────────────────────────┘
use crate::sprite::FrameSequence;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Walk,
    Jump,
    Dock,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl PlayerState {
    pub fn derive(on_ground: bool, down_held: bool, moving: bool) -> Self {
        if !on_ground {
            PlayerState::Jump
        } else if down_held {
            PlayerState::Dock
        } else if moving {
            PlayerState::Walk
        } else {
            PlayerState::Idle
        }
    }

    pub fn sequence(self, direction: Direction) -> FrameSequence {
        match (self, direction) {
            (PlayerState::Idle, _) => FrameSequence::Idle,
            (PlayerState::Walk, Direction::Right) => FrameSequence::WalkRight,
            (PlayerState::Walk, Direction::Left) => FrameSequence::WalkLeft,
            (PlayerState::Jump, _) => FrameSequence::Jump,
            (PlayerState::Dock, _) => FrameSequence::Dock,
        }
    }
}

/// Frame sequencing for the current state
/// - looping states wrap around their sequence
/// - Dock plays once and holds its last frame (`dock_finished`)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Animation {
    pub state: PlayerState,
    prev_state: PlayerState,
    pub frame_index: u8,
    pub frame_timer: u32,
    frame_speed: u32,
    pub dock_finished: bool,
}

impl Animation {
    pub fn new(frame_speed: u32) -> Self {
        Animation {
            state: PlayerState::Idle,
            prev_state: PlayerState::Idle,
            frame_index: 0,
            frame_timer: 0,
            frame_speed,
            dock_finished: false,
        }
    }

    /// ::update per tick
    /// - switch to `next`, restarting the sequence if it differs
    /// - advance the frame timer and, every `frame_speed` ticks, the frame
    pub fn update(self, next: PlayerState, direction: Direction) -> Self {
        self.with_state(next).advance(direction)
    }

    /// Death resets playback to the first idle frame
    pub fn reset(mut self) -> Self {
        self.state = PlayerState::Idle;
        self.prev_state = PlayerState::Idle;
        self.frame_index = 0;
        self.frame_timer = 0;
        self.dock_finished = false;
        self
    }

    pub fn sequence(&self, direction: Direction) -> FrameSequence {
        self.state.sequence(direction)
    }

    pub fn current_frame_key(&self, direction: Direction) -> String {
        self.sequence(direction).frame_key(self.frame_index)
    }

    fn with_state(mut self, next: PlayerState) -> Self {
        self.state = next;
        if self.state != self.prev_state {
            self = self.on_state_transition();
        }
        self.prev_state = self.state;
        self
    }

    /// ::on_state_transition -> we must :
    /// - WARN: prevent RUNTIME ERROR
    ///     - Reset to frame 0 on transition :
    ///         - because each state has its own frame count
    ///         - else we risk indexing past the end of the new sequence
    /// - re-arm the one-shot dock animation when leaving it
    fn on_state_transition(mut self) -> Self {
        self.frame_index = 0;
        self.frame_timer = 0;
        if self.state != PlayerState::Dock {
            self.dock_finished = false;
        }
        self
    }

    fn advance(mut self, direction: Direction) -> Self {
        let total_frames = self.sequence(direction).total_frames();
        if self.state == PlayerState::Dock {
            // a finished dock holds, its timer stops too
            if self.dock_finished {
                return self;
            }
            self.frame_timer += 1;
            if self.frame_timer >= self.frame_speed {
                self.frame_timer = 0;
                if self.frame_index + 1 < total_frames {
                    self.frame_index += 1;
                } else {
                    self.dock_finished = true;
                }
            }
        } else {
            self.frame_timer += 1;
            if self.frame_timer >= self.frame_speed {
                self.frame_timer = 0;
                self.frame_index = (self.frame_index + 1) % total_frames;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_SPEED: u32 = 8;

    fn run(mut animation: Animation, state: PlayerState, ticks: u32) -> Animation {
        for _ in 0..ticks {
            animation = animation.update(state, Direction::Right);
        }
        animation
    }

    #[test]
    fn airborne_overrides_everything() {
        assert_eq!(PlayerState::derive(false, true, true), PlayerState::Jump);
        assert_eq!(PlayerState::derive(true, true, true), PlayerState::Dock);
        assert_eq!(PlayerState::derive(true, false, true), PlayerState::Walk);
        assert_eq!(PlayerState::derive(true, false, false), PlayerState::Idle);
    }

    #[test]
    fn walk_sequence_follows_direction() {
        assert_eq!(PlayerState::Walk.sequence(Direction::Left), FrameSequence::WalkLeft);
        assert_eq!(PlayerState::Walk.sequence(Direction::Right), FrameSequence::WalkRight);
        assert_eq!(PlayerState::Jump.sequence(Direction::Left), FrameSequence::Jump);
    }

    #[test]
    fn frame_advances_every_frame_speed_ticks() {
        let animation = run(Animation::new(FRAME_SPEED), PlayerState::Walk, FRAME_SPEED - 1);
        assert_eq!(animation.frame_index, 0);
        let animation = animation.update(PlayerState::Walk, Direction::Right);
        assert_eq!(animation.frame_index, 1);
        assert_eq!(animation.frame_timer, 0);
    }

    #[test]
    fn looping_states_wrap_around() {
        // 5 walk frames: after 5 advances we are back at frame 0
        let animation = run(Animation::new(FRAME_SPEED), PlayerState::Walk, FRAME_SPEED * 5);
        assert_eq!(animation.frame_index, 0);
        let animation = run(animation, PlayerState::Walk, FRAME_SPEED * 2);
        assert_eq!(animation.frame_index, 2);
    }

    #[test]
    fn idle_holds_its_single_frame() {
        let animation = run(Animation::new(FRAME_SPEED), PlayerState::Idle, FRAME_SPEED * 3);
        assert_eq!(animation.frame_index, 0);
        assert_eq!(animation.current_frame_key(Direction::Left), "idle-1");
    }

    #[test]
    fn state_change_restarts_sequence() {
        let animation = run(Animation::new(FRAME_SPEED), PlayerState::Jump, FRAME_SPEED * 3 + 2);
        assert_eq!(animation.frame_index, 3);

        let animation = animation.update(PlayerState::Walk, Direction::Right);
        assert_eq!(animation.frame_index, 0);
        // the transition tick itself counts
        assert_eq!(animation.frame_timer, 1);
    }

    #[test]
    fn dock_plays_once_and_holds_last_frame() {
        // 4 advances reach the last frame, the 5th marks it finished
        let animation = run(Animation::new(FRAME_SPEED), PlayerState::Dock, FRAME_SPEED * 4);
        assert_eq!(animation.frame_index, 4);
        assert!(!animation.dock_finished);

        let animation = run(animation, PlayerState::Dock, FRAME_SPEED);
        assert!(animation.dock_finished);
        assert_eq!(animation.frame_index, 4);

        let held = run(animation, PlayerState::Dock, FRAME_SPEED * 10);
        assert_eq!(held.frame_index, 4);
        assert!(held.dock_finished);
    }

    #[test]
    fn held_dock_stops_counting_ticks() {
        let finished = run(Animation::new(FRAME_SPEED), PlayerState::Dock, FRAME_SPEED * 5);
        assert!(finished.dock_finished);
        let timer = finished.frame_timer;

        let held = run(finished, PlayerState::Dock, 1000);
        assert_eq!(held.frame_timer, timer);
        assert_eq!(held.frame_index, 4);
    }

    #[test]
    fn re_entering_dock_restarts_the_one_shot() {
        let finished = run(Animation::new(FRAME_SPEED), PlayerState::Dock, FRAME_SPEED * 6);
        assert!(finished.dock_finished);

        let standing = finished.update(PlayerState::Idle, Direction::Right);
        assert!(!standing.dock_finished);

        let docking = standing.update(PlayerState::Dock, Direction::Right);
        assert_eq!(docking.frame_index, 0);
        assert!(!docking.dock_finished);
    }

    #[test]
    fn reset_returns_to_first_idle_frame() {
        let animation = run(Animation::new(FRAME_SPEED), PlayerState::Jump, FRAME_SPEED * 2 + 3).reset();
        assert_eq!(animation.state, PlayerState::Idle);
        assert_eq!(animation.frame_index, 0);
        assert_eq!(animation.frame_timer, 0);
    }
}
