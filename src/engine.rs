use crate::browser;
use anyhow::{anyhow, Error, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use futures::channel::oneshot::channel;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - because we control the closure creation and specify the expected type,
    // in principle this should be generally safe (unsafe) code
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use self::input::KeyState;

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self, viewport: Size) -> Result<Box<dyn Game>>;
    /// `elapsed_ms` is the wall-clock time since the previous frame
    fn update(&mut self, keystate: &KeyState, elapsed_ms: f64);
    fn resize(&mut self, viewport: Size);
    fn draw(&self, renderer: &Renderer);
}

pub struct GameLoop {
    last_frame: f64,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    /// ┌──────────────────── One Animation Frame ────────────────────┐
    /// │  1. drain key presses   -> KeyState                         │
    /// │  2. drain resize events -> Game::resize                     │
    /// │  3. Game::update(keystate, elapsed wall-clock ms)           │
    /// │  4. Game::draw                                              │
    /// │  5. request the next animation frame                        │
    /// └─────────────────────────────────────────────────────────────┘
    /// Exactly one update per display refresh, never a catch-up loop.
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut keyevent_receiver = input::prepare_input()?;
        let mut resize_receiver = prepare_resize()?;
        let (width, height) = browser::fit_canvas_to_window()?;

        // nothing is scheduled until every asset has loaded
        let mut game = game.initialize(Size::from_pixels(width, height)).await?;
        let mut keystate = KeyState::new();
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
        };
        let renderer = Renderer {
            context: browser::context()?,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            input::process_input(&mut keystate, &mut keyevent_receiver);
            while let Ok(Some(viewport)) = resize_receiver.try_next() {
                game.resize(viewport);
            }

            let elapsed_ms = (perf - game_loop.last_frame).max(0.0);
            game_loop.last_frame = perf;
            game.update(&keystate, elapsed_ms);
            game.draw(&renderer);

            if let Some(closure) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(closure) {
                    error!("GameLoop: {:#}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

/// Resizes the canvas with the window and forwards the new viewport to the
/// loop, which applies it between frames
fn prepare_resize() -> Result<UnboundedReceiver<Size>> {
    let (resize_sender, resize_receiver) = unbounded();
    let onresize = browser::closure_wrap(Box::new(move || match browser::fit_canvas_to_window() {
        Ok((width, height)) => {
            let _ = resize_sender.unbounded_send(Size::from_pixels(width, height));
        }
        Err(err) => error!("Could not resize canvas : {:#}", err),
    }) as Box<dyn FnMut()>);
    browser::window()?.set_onresize(Some(onresize.as_ref().unchecked_ref()));
    // listener lives for the whole page
    onresize.forget();
    Ok(resize_receiver)
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Size {
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Axis aligned rectangle, origin at the top left
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn new_from_x_y(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect::new(Point { x, y }, Size { width, height })
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    /// strict overlap: touching edges do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x() < other.right()
            && self.right() > other.x()
            && self.y() < other.bottom()
            && self.bottom() > other.y()
    }

    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.x() < other.right() && self.right() > other.x()
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Renderer { context }
    }

    pub fn size(&self) -> Size {
        self.context
            .canvas()
            .map(|canvas| Size::from_pixels(canvas.width(), canvas.height()))
            .unwrap_or_default()
    }

    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.x().into(),
            rect.y().into(),
            rect.width().into(),
            rect.height().into(),
        );
    }

    /// Blits the whole image, scaled into `destination`
    pub fn draw_entire_image(&self, image: &HtmlImageElement, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                destination.x().into(),
                destination.y().into(),
                destination.width().into(),
                destination.height().into(),
            )
        {
            error!("Error drawing image {} : {:#?}", image.src(), err);
        }
    }

    pub fn fill_rect(&self, rect: &Rect, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(
            rect.x().into(),
            rect.y().into(),
            rect.width().into(),
            rect.height().into(),
        );
    }

    pub fn stroke_rect(&self, rect: &Rect, color: &str, line_width: f32) {
        self.context.set_stroke_style_str(color);
        self.context.set_line_width(line_width.into());
        self.context.stroke_rect(
            rect.x().into(),
            rect.y().into(),
            rect.width().into(),
            rect.height().into(),
        );
    }
}

#[cfg(debug_assertions)]
pub trait DebugDraw {
    fn draw_debug(&self, renderer: &Renderer);
}

#[cfg(debug_assertions)]
impl DebugDraw for Rect {
    fn draw_debug(&self, renderer: &Renderer) {
        renderer.stroke_rect(self, "#0f0", 1.0);
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::create_html_image_element()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image: {:#?}",
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - Result<Result<(), Error>, oneshot::Canceled>
    // - first ? yields channel result : Result<(), Error>
    // - second ? yields image load result : () or propagating Error
    rx.await??;

    Ok(image)
}

pub mod input {
    use crate::browser;
    use anyhow::Result;
    use futures::channel::mpsc::{unbounded, UnboundedReceiver};
    use std::collections::HashSet;
    use wasm_bindgen::JsCast;

    /// keys whose default browser action (scrolling) is suppressed
    pub const NAVIGATION_KEYS: [&str; 5] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "Space"];

    #[derive(Debug, Clone, PartialEq)]
    pub enum KeyPress {
        KeyDown(String),
        KeyUp(String),
    }

    /// Set of currently held keys, by `KeyboardEvent.code`
    #[derive(Debug, Default)]
    pub struct KeyState {
        pressed_keys: HashSet<String>,
    }

    impl KeyState {
        pub fn new() -> Self {
            KeyState::default()
        }

        pub fn is_pressed(&self, code: &str) -> bool {
            self.pressed_keys.contains(code)
        }

        pub fn set_pressed(&mut self, code: &str) {
            self.pressed_keys.insert(code.to_string());
        }

        pub fn set_released(&mut self, code: &str) {
            self.pressed_keys.remove(code);
        }

        pub fn apply(&mut self, key_press: KeyPress) {
            match key_press {
                KeyPress::KeyDown(code) => self.set_pressed(&code),
                KeyPress::KeyUp(code) => self.set_released(&code),
            }
        }
    }

    /// Drains every queued key press into `state`
    pub fn process_input(state: &mut KeyState, keyevent_receiver: &mut UnboundedReceiver<KeyPress>) {
        // try_next: Ok(Some) = message, Ok(None) = closed, Err = empty
        while let Ok(Some(key_press)) = keyevent_receiver.try_next() {
            state.apply(key_press);
        }
    }

    pub fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
        let (keydown_sender, keyevent_receiver) = unbounded();
        let keyup_sender = keydown_sender.clone();

        let onkeydown = browser::closure_wrap(Box::new(move |keycode: web_sys::KeyboardEvent| {
            if NAVIGATION_KEYS.contains(&keycode.code().as_str()) {
                keycode.prevent_default();
            }
            let _ = keydown_sender.unbounded_send(KeyPress::KeyDown(keycode.code()));
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

        let onkeyup = browser::closure_wrap(Box::new(move |keycode: web_sys::KeyboardEvent| {
            let _ = keyup_sender.unbounded_send(KeyPress::KeyUp(keycode.code()));
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

        let window = browser::window()?;
        window.set_onkeydown(Some(onkeydown.as_ref().unchecked_ref()));
        window.set_onkeyup(Some(onkeyup.as_ref().unchecked_ref()));
        onkeydown.forget();
        onkeyup.forget();

        Ok(keyevent_receiver)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn key_press_and_release_toggle_state() {
            let mut state = KeyState::new();
            state.apply(KeyPress::KeyDown("ArrowLeft".to_string()));
            assert!(state.is_pressed("ArrowLeft"));
            assert!(!state.is_pressed("ArrowRight"));

            state.apply(KeyPress::KeyUp("ArrowLeft".to_string()));
            assert!(!state.is_pressed("ArrowLeft"));
        }

        #[test]
        fn process_input_drains_every_queued_press() {
            let (sender, mut receiver) = unbounded();
            sender.unbounded_send(KeyPress::KeyDown("Space".to_string())).unwrap();
            sender.unbounded_send(KeyPress::KeyDown("ArrowRight".to_string())).unwrap();
            sender.unbounded_send(KeyPress::KeyUp("Space".to_string())).unwrap();

            let mut state = KeyState::new();
            process_input(&mut state, &mut receiver);

            assert!(!state.is_pressed("Space"));
            assert!(state.is_pressed("ArrowRight"));
            assert!(receiver.try_next().is_err());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let rect = Rect::new_from_x_y(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new_from_x_y(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new_from_x_y(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new_from_x_y(9.0, 9.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }
}
