use crate::browser;
use crate::config::{GameConfig, HealthBarConfig};
use crate::engine;
use crate::engine::input::*;
#[cfg(debug_assertions)]
use crate::engine::DebugDraw;
use crate::engine::{Game, Point, Rect, Renderer, Size};
use crate::entity::Entity;
use crate::physics::Controls;
use crate::sprite::{scenery, IMAGE_MANIFEST};
use crate::world::{FrameEvent, World};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;
use web_sys::HtmlImageElement;

/// TABLE
/// ┌───────────────────── Game Architecture Overview ────────────────────────┐
/// │                                                                         │
/// │    ┌─────────────┐          ┌─────────────┐          ┌─────────────┐    │
/// │    │  engine.rs  │  update  │   game.rs   │   tick   │  world.rs   │    │
/// │    │  GameLoop   ├─────────►│ CherryDodge ├─────────►│   World     │    │
/// │    │  (rAF)      │          │  Controls   │          │ (no DOM)    │    │
/// │    └─────────────┘          └──────┬──────┘          └──────┬──────┘    │
/// │                                    │   drain events         │           │
/// │                                    ◄────────────────────────┘           │
/// │                                    │                                    │
/// │                              ┌─────┴──────┐                             │
/// │                              │  Renderer  │ background, platform,       │
/// │                              │   draw()   │ player, entities, hp bar    │
/// │                              └────────────┘                             │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum CherryDodge {
    /// Initialize state while resources are being loaded
    /// Transition to `Loaded` once every image is ready
    Loading,

    /// Active game with its world and images
    Loaded(Dodge),
}

impl CherryDodge {
    const CONFIG_PATH: &'static str = "game.json";

    pub fn new() -> Self {
        CherryDodge::Loading
    }

    /// `game.json` is optional: anything wrong with it falls back to the
    /// defaults
    async fn load_config() -> GameConfig {
        match browser::fetch_json::<GameConfig>(Self::CONFIG_PATH).await {
            Ok(config) => match config.validate() {
                Ok(()) => config,
                Err(err) => {
                    error!("Invalid {} ({:#}), using defaults", Self::CONFIG_PATH, err);
                    GameConfig::default()
                }
            },
            Err(err) => {
                log!("No usable {} ({:#}), using defaults", Self::CONFIG_PATH, err);
                GameConfig::default()
            }
        }
    }
}

impl Default for CherryDodge {
    fn default() -> Self {
        CherryDodge::new()
    }
}

#[async_trait(?Send)]
impl Game for CherryDodge {
    async fn initialize(&self, viewport: Size) -> Result<Box<dyn Game>> {
        match self {
            CherryDodge::Loading => {
                let config = Self::load_config().await;
                let images = Images::load(&config.asset_root).await?;
                let world = World::new(config, viewport, SmallRng::from_entropy());
                Ok(Box::new(CherryDodge::Loaded(Dodge {
                    world,
                    images,
                    death_notice: DeathNotice::default(),
                })))
            }
            CherryDodge::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, keystate: &KeyState, elapsed_ms: f64) {
        if let CherryDodge::Loaded(dodge) = self {
            let controls = Controls::from_keys(keystate);
            dodge.death_notice.advance(elapsed_ms);
            dodge.world.tick(&controls, elapsed_ms);
            for event in dodge.world.drain_events() {
                match event {
                    FrameEvent::PlayerDied { cause } => {
                        log!("You died! ({:?})", cause);
                        dodge.death_notice.show();
                    }
                    FrameEvent::Restarted => log!("Restarting"),
                    _ => {}
                }
            }
        }
    }

    fn resize(&mut self, viewport: Size) {
        if let CherryDodge::Loaded(dodge) = self {
            dodge.world.resize(viewport);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let CherryDodge::Loaded(dodge) = self {
            dodge.draw(renderer);
        }
    }
}

pub struct Dodge {
    world: World,
    images: Images,
    death_notice: DeathNotice,
}

impl Dodge {
    // Draw order matters : background -> foreground
    fn draw(&self, renderer: &Renderer) {
        let viewport = self.world.viewport();
        let screen = Rect::new(Point::default(), viewport);
        renderer.clear(&screen);

        self.images.draw(renderer, scenery::BACKGROUND, &screen);
        self.images.draw(renderer, scenery::PLATFORM, &self.world.platform().rect);

        let player = self.world.player();
        self.images.draw(renderer, &player.current_frame_key(), &player.draw_box());
        #[cfg(debug_assertions)]
        player.bounding_box().draw_debug(renderer);

        for entity in self.world.hazards().iter().chain(self.world.pickups()) {
            self.draw_entity(renderer, entity);
        }

        let bar = HealthBar::layout(&self.world.config().health_bar, viewport, player.hp, player.max_hp);
        bar.draw(renderer);

        self.death_notice.draw(renderer, &screen);
    }

    fn draw_entity(&self, renderer: &Renderer, entity: &Entity) {
        self.images.draw(renderer, entity.image_key(), &entity.rect);
    }
}

/// Every image of the manifest, by asset key
struct Images {
    elements: HashMap<String, HtmlImageElement>,
}

impl Images {
    /// Loads the whole manifest in parallel; one failure fails everything
    async fn load(asset_root: &str) -> Result<Self> {
        log!("Loading {} images from {}", IMAGE_MANIFEST.len(), asset_root);
        let elements = try_join_all(IMAGE_MANIFEST.iter().map(|key| async move {
            let source = format!("{}/{}.png", asset_root, key);
            engine::load_image(&source)
                .await
                .with_context(|| format!("Failed to load image resource from : {}", source))
                .map(|image| (key.clone(), image))
        }))
        .await?
        .into_iter()
        .collect::<HashMap<_, _>>();
        log!("All images loaded");
        Ok(Images { elements })
    }

    fn draw(&self, renderer: &Renderer, key: &str, destination: &Rect) {
        match self.elements.get(key) {
            Some(image) => renderer.draw_entire_image(image, destination),
            None => error!("Missing image : {}", key),
        }
    }
}

/// Red flash over the screen after a death. The world restarts on the next
/// tick; the flash fades on its own and never blocks the loop.
#[derive(Debug, Default, PartialEq)]
pub struct DeathNotice {
    remaining_ms: f64,
}

impl DeathNotice {
    const DURATION_MS: f64 = 1500.0;
    const COLOR: &'static str = "rgba(255, 0, 0, 0.35)";

    pub fn show(&mut self) {
        self.remaining_ms = Self::DURATION_MS;
    }

    pub fn advance(&mut self, elapsed_ms: f64) {
        self.remaining_ms = (self.remaining_ms - elapsed_ms).max(0.0);
    }

    pub fn is_visible(&self) -> bool {
        self.remaining_ms > 0.0
    }

    fn draw(&self, renderer: &Renderer, screen: &Rect) {
        if self.is_visible() {
            renderer.fill_rect(screen, Self::COLOR);
        }
    }
}

/// Bottom-right health bar: grey track, red fill, black outline
#[derive(Debug, PartialEq)]
pub struct HealthBar {
    pub track: Rect,
    pub fill: Rect,
}

impl HealthBar {
    const TRACK_COLOR: &'static str = "#555";
    const FILL_COLOR: &'static str = "#f00";
    const OUTLINE_COLOR: &'static str = "#000";
    const OUTLINE_WIDTH: f32 = 2.0;

    pub fn layout(config: &HealthBarConfig, viewport: Size, hp: i32, max_hp: i32) -> Self {
        let track = Rect::new_from_x_y(
            viewport.width - config.width - config.padding,
            viewport.height - config.height - config.padding,
            config.width,
            config.height,
        );
        let ratio = if max_hp > 0 {
            (hp as f32 / max_hp as f32).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let fill = Rect::new(track.position, Size::new(config.width * ratio, config.height));
        HealthBar { track, fill }
    }

    fn draw(&self, renderer: &Renderer) {
        renderer.fill_rect(&self.track, Self::TRACK_COLOR);
        renderer.fill_rect(&self.fill, Self::FILL_COLOR);
        renderer.stroke_rect(&self.track, Self::OUTLINE_COLOR, Self::OUTLINE_WIDTH);
    }
}
