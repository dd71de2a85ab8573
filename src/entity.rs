//! Edge spawned hazards and pickups: spawning, movement, culling and the
//! health effect of touching the player.
use crate::config::SpawnConfig;
use crate::engine::{Point, Rect, Size};
use crate::sprite::player::Player;
use crate::sprite::scenery;
use rand::Rng;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntityKind {
    /// damages on contact
    Hazard,
    /// heals on contact
    Pickup,
}

/// Where an entity enters the viewport
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Edge {
    /// moving down, anywhere along the width
    Top,
    /// moving left, anywhere along the height
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub edge: Edge,
    pub rect: Rect,
    pub velocity: Point,
}

impl Entity {
    /// Places a new entity just outside `edge`, `offset` being the uniform
    /// coordinate along that edge
    pub fn new(kind: EntityKind, edge: Edge, offset: f32, config: &SpawnConfig, viewport: Size) -> Self {
        let size = Size::new(config.size, config.size);
        let (position, velocity) = match edge {
            Edge::Top => (
                Point { x: offset, y: -size.height },
                Point { x: 0.0, y: config.speed },
            ),
            Edge::Right => (
                Point { x: viewport.width, y: offset },
                Point { x: -config.speed, y: 0.0 },
            ),
        };
        Entity {
            kind,
            edge,
            rect: Rect::new(position, size),
            velocity,
        }
    }

    pub fn spawn<R: Rng>(kind: EntityKind, config: &SpawnConfig, viewport: Size, rng: &mut R) -> Self {
        let edge = if rng.gen_bool(0.5) { Edge::Top } else { Edge::Right };
        let extent = match edge {
            Edge::Top => viewport.width,
            Edge::Right => viewport.height,
        };
        let offset = if extent > 0.0 { rng.gen_range(0.0..extent) } else { 0.0 };
        Entity::new(kind, edge, offset, config, viewport)
    }

    pub fn advance(&mut self) {
        self.rect.position.x += self.velocity.x;
        self.rect.position.y += self.velocity.y;
    }

    /// Outside the viewport, using the entity's own size as margin
    pub fn is_outside(&self, viewport: Size) -> bool {
        self.rect.x() < -self.rect.width()
            || self.rect.x() > viewport.width
            || self.rect.y() < -self.rect.height()
            || self.rect.y() > viewport.height
    }

    pub fn image_key(&self) -> &'static str {
        match (self.kind, self.edge) {
            (EntityKind::Hazard, Edge::Top) => scenery::HAZARD_VERTICAL,
            (EntityKind::Hazard, Edge::Right) => scenery::HAZARD_HORIZONTAL,
            (EntityKind::Pickup, _) => scenery::PICKUP,
        }
    }
}

/// Wall-clock spawn timer
/// - accumulates the elapsed time of every tick
/// - yields one spawn per full interval, so a stalled frame catches up
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    interval_ms: f64,
    accumulated_ms: f64,
}

impl Spawner {
    pub fn new(interval_ms: f64) -> Self {
        Spawner {
            interval_ms,
            accumulated_ms: 0.0,
        }
    }

    /// Number of spawns that became due during `elapsed_ms`
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        self.accumulated_ms += elapsed_ms;
        let mut due = 0;
        while self.accumulated_ms >= self.interval_ms {
            self.accumulated_ms -= self.interval_ms;
            due += 1;
        }
        due
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Contact {
    HazardHit { hp: i32 },
    PickupCollected { hp: i32 },
}

/// Moves every entity, drops those that left the viewport, then resolves
/// contact with the player for the survivors. Iterates back to front so
/// removal happens in place. A dead player is not tested.
pub fn sweep(entities: &mut Vec<Entity>, player: &mut Player, amount: i32, viewport: Size) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for index in (0..entities.len()).rev() {
        let entity = &mut entities[index];
        entity.advance();

        if entity.is_outside(viewport) {
            entities.remove(index);
            continue;
        }

        if !player.alive || !player.bounding_box().intersects(&entity.rect) {
            continue;
        }

        let kind = entity.kind;
        entities.remove(index);
        contacts.push(match kind {
            EntityKind::Hazard => {
                player.take_damage(amount);
                Contact::HazardHit { hp: player.hp }
            }
            EntityKind::Pickup => {
                player.heal(amount);
                Contact::PickupCollected { hp: player.hp }
            }
        });
    }
    contacts
}
