//! The simulation context: everything one game session owns, advanced one
//! tick at a time. Knows nothing about the browser.
//!
//! TABLE:
//! ┌──────────────────────────── One Tick ──────────────────────────────┐
//! │  Dead?     → full restart, nothing else moves this tick            │
//! │  Running   → 1. due spawns  (wall-clock accumulators)              │
//! │              2. physics     (walk, jump, gravity, landing, fall)   │
//! │              3. animation   (derive state, advance frame)          │
//! │              4. hazards     (move, cull, hit)                      │
//! │              5. pickups     (move, cull, heal)                     │
//! │              6. death       → Dead(cause), PlayerDied event        │
//! │  always    → spawn timers keep accumulating                        │
//! └────────────────────────────────────────────────────────────────────┘
use crate::config::GameConfig;
use crate::engine::Size;
use crate::entity::{self, Contact, Entity, EntityKind, Spawner};
use crate::physics::{self, Controls, Platform};
use crate::sprite::player::Player;
use crate::sprite::state::PlayerState;
use rand::rngs::SmallRng;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeathCause {
    /// dropped below the viewport
    Fell,
    /// health reached zero
    Health,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Running,
    Dead(DeathCause),
}

/// Something the outside world may want to react to, queued during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    Spawned { kind: EntityKind },
    HazardHit { hp: i32 },
    PickupCollected { hp: i32 },
    PlayerDied { cause: DeathCause },
    Restarted,
}

impl From<Contact> for FrameEvent {
    fn from(contact: Contact) -> Self {
        match contact {
            Contact::HazardHit { hp } => FrameEvent::HazardHit { hp },
            Contact::PickupCollected { hp } => FrameEvent::PickupCollected { hp },
        }
    }
}

pub struct World {
    config: GameConfig,
    viewport: Size,
    platform: Platform,
    player: Player,
    hazards: Vec<Entity>,
    pickups: Vec<Entity>,
    hazard_spawner: Spawner,
    pickup_spawner: Spawner,
    rng: SmallRng,
    phase: Phase,
    events: Vec<FrameEvent>,
}

impl World {
    pub fn new(config: GameConfig, viewport: Size, rng: SmallRng) -> Self {
        let platform = Platform::anchored(viewport, &config.platform);
        let player = Player::new(&config, viewport, &platform.rect);
        World {
            hazard_spawner: Spawner::new(config.hazard.interval_ms),
            pickup_spawner: Spawner::new(config.pickup.interval_ms),
            config,
            viewport,
            platform,
            player,
            hazards: Vec::new(),
            pickups: Vec::new(),
            rng,
            phase: Phase::Running,
            events: Vec::new(),
        }
    }

    pub fn tick(&mut self, controls: &Controls, elapsed_ms: f64) {
        if let Phase::Dead(_) = self.phase {
            self.restart();
            self.spawn_due(elapsed_ms);
            return;
        }
        self.spawn_due(elapsed_ms);

        physics::step(&mut self.player, &self.platform, controls, self.viewport);
        let fell = !self.player.alive;
        if self.player.alive {
            let next = PlayerState::derive(self.player.on_ground, controls.down, controls.moving());
            self.player.animate(next);
        }

        let hazard_contacts = entity::sweep(
            &mut self.hazards,
            &mut self.player,
            self.config.hazard.amount,
            self.viewport,
        );
        let pickup_contacts = entity::sweep(
            &mut self.pickups,
            &mut self.player,
            self.config.pickup.amount,
            self.viewport,
        );
        self.events
            .extend(hazard_contacts.into_iter().chain(pickup_contacts).map(FrameEvent::from));

        if !self.player.alive {
            let cause = if fell { DeathCause::Fell } else { DeathCause::Health };
            self.phase = Phase::Dead(cause);
            self.events.push(FrameEvent::PlayerDied { cause });
        }
    }

    /// Fresh player, empty entity lists. Spawn timers keep running.
    pub fn restart(&mut self) {
        self.player = Player::new(&self.config, self.viewport, &self.platform.rect);
        self.hazards.clear();
        self.pickups.clear();
        self.phase = Phase::Running;
        self.events.push(FrameEvent::Restarted);
    }

    /// Re-anchors the platform and puts the player back on top of it
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.platform = Platform::anchored(viewport, &self.config.platform);
        self.player.stand_on(self.platform.top());
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, FrameEvent> {
        self.events.drain(..)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn hazards(&self) -> &[Entity] {
        &self.hazards
    }

    pub fn pickups(&self) -> &[Entity] {
        &self.pickups
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn spawn_due(&mut self, elapsed_ms: f64) {
        for _ in 0..self.hazard_spawner.advance(elapsed_ms) {
            let hazard = Entity::spawn(EntityKind::Hazard, &self.config.hazard, self.viewport, &mut self.rng);
            self.hazards.push(hazard);
            self.events.push(FrameEvent::Spawned { kind: EntityKind::Hazard });
        }
        for _ in 0..self.pickup_spawner.advance(elapsed_ms) {
            let pickup = Entity::spawn(EntityKind::Pickup, &self.config.pickup, self.viewport, &mut self.rng);
            self.pickups.push(pickup);
            self.events.push(FrameEvent::Spawned { kind: EntityKind::Pickup });
        }
    }

    #[cfg(test)]
    fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[cfg(test)]
    fn push_entity(&mut self, entity: Entity) {
        match entity.kind {
            EntityKind::Hazard => self.hazards.push(entity),
            EntityKind::Pickup => self.pickups.push(entity),
        }
    }
}
