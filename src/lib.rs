// ==================== Imports ====================
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

#[macro_use]
pub mod browser;
pub mod config;
pub mod engine;
pub mod entity;
pub mod game;
pub mod physics;
pub mod sprite;
pub mod world;

use engine::GameLoop;
use game::CherryDodge;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs the panic hook
/// - loads config and every image
/// - starts the game loop, or logs why it could not
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(CherryDodge::new()).await {
            error!("Could not start game : {:#?}", err);
        }
    });

    Ok(())
}
