// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                      Directory Structure Analogy                         │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ Code Directory    │          Photoshop Equivalent                        │
// ├───────────────────┼──────────────────────────────────────────────────────┤
// │ src/              │ Project Root                                         │
// │ ├── lib.rs        │ Project Manager/Asset Organization                   │
// │ ├── game.rs       │ Main Composition Where Animations Are Used           │
// │ ├── world.rs      │ Timeline: one tick of the whole scene                │
// │ └── sprite/       │ Character Asset Library                              │
// │     ├── mod.rs    │ Frame Sequences (Layer Groups)                       │
// │     ├── state.rs  │ Animation Playback (Timeline Scrubber)               │
// │     └── player.rs │ Character-Specific Settings (Layer Comps)            │
// └───────────────────┴──────────────────────────────────────────────────────┘
pub mod player;
pub mod state;

use once_cell::sync::Lazy;

/// Static description of one frame sequence
/// - `prefix`      : asset name stem, frames are `<prefix>-<n>` (1 based)
/// - `frame_count` : number of frames on disk
#[derive(Debug)]
pub struct SpriteMetadata {
    pub prefix: &'static str,
    pub frame_count: u8,
}

pub trait SpriteState {
    fn metadata() -> &'static SpriteMetadata;

    fn total_frames() -> u8 {
        Self::metadata().frame_count
    }

    /// asset key of the zero based frame `index`
    fn frame_key(index: u8) -> String {
        format!("{}-{}", Self::metadata().prefix, index + 1)
    }
}

pub struct Idle;
pub struct WalkingRight;
pub struct WalkingLeft;
pub struct Jumping;
pub struct Docking;

impl SpriteState for Idle {
    fn metadata() -> &'static SpriteMetadata {
        &SpriteMetadata {
            prefix: "idle",
            frame_count: 1,
        }
    }
}

impl SpriteState for WalkingRight {
    fn metadata() -> &'static SpriteMetadata {
        &SpriteMetadata {
            prefix: "right",
            frame_count: 5,
        }
    }
}

impl SpriteState for WalkingLeft {
    fn metadata() -> &'static SpriteMetadata {
        &SpriteMetadata {
            prefix: "left",
            frame_count: 5,
        }
    }
}

impl SpriteState for Jumping {
    fn metadata() -> &'static SpriteMetadata {
        &SpriteMetadata {
            prefix: "jump",
            frame_count: 7,
        }
    }
}

impl SpriteState for Docking {
    fn metadata() -> &'static SpriteMetadata {
        &SpriteMetadata {
            prefix: "dock",
            frame_count: 5,
        }
    }
}

/// Runtime handle on one of the sequences above
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameSequence {
    Idle,
    WalkRight,
    WalkLeft,
    Jump,
    Dock,
}

impl FrameSequence {
    pub const ALL: [FrameSequence; 5] = [
        FrameSequence::Idle,
        FrameSequence::WalkRight,
        FrameSequence::WalkLeft,
        FrameSequence::Jump,
        FrameSequence::Dock,
    ];

    pub fn total_frames(self) -> u8 {
        match self {
            FrameSequence::Idle => Idle::total_frames(),
            FrameSequence::WalkRight => WalkingRight::total_frames(),
            FrameSequence::WalkLeft => WalkingLeft::total_frames(),
            FrameSequence::Jump => Jumping::total_frames(),
            FrameSequence::Dock => Docking::total_frames(),
        }
    }

    pub fn frame_key(self, index: u8) -> String {
        match self {
            FrameSequence::Idle => Idle::frame_key(index),
            FrameSequence::WalkRight => WalkingRight::frame_key(index),
            FrameSequence::WalkLeft => WalkingLeft::frame_key(index),
            FrameSequence::Jump => Jumping::frame_key(index),
            FrameSequence::Dock => Docking::frame_key(index),
        }
    }
}

/// Scenery and entity images, by asset key
pub mod scenery {
    pub const BACKGROUND: &str = "background";
    pub const PLATFORM: &str = "area";
    pub const HAZARD_VERTICAL: &str = "bullet_v";
    pub const HAZARD_HORIZONTAL: &str = "bullet_h";
    pub const PICKUP: &str = "cherry";
}

/// Every image the game draws; loading must finish for all of them before
/// the first frame
pub static IMAGE_MANIFEST: Lazy<Vec<String>> = Lazy::new(|| {
    let mut keys = vec![scenery::BACKGROUND.to_string(), scenery::PLATFORM.to_string()];
    for sequence in FrameSequence::ALL {
        keys.extend((0..sequence.total_frames()).map(|index| sequence.frame_key(index)));
    }
    keys.extend(
        [scenery::HAZARD_VERTICAL, scenery::HAZARD_HORIZONTAL, scenery::PICKUP]
            .iter()
            .map(|key| key.to_string()),
    );
    keys
});
