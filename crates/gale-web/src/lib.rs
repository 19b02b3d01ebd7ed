//! Browser bindings for gale-sim.
//!
//! One [`SimRunner`] lives in `thread_local!` storage, because wasm-bindgen
//! cannot export a struct with a borrowed controller. The page calls
//! `sim_init` with a level, then `sim_tick` once per animation frame, and
//! reads the draw buffer straight out of wasm memory.

pub mod draw;
pub mod runner;

use std::cell::RefCell;

use gale_sim::{Button, InputEvent};
use wasm_bindgen::prelude::*;

pub use draw::{DrawBuffer, DrawInstance};
pub use runner::{SimRunner, SimSetup};

thread_local! {
    static RUNNER: RefCell<Option<SimRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. Calls before a successful `sim_init`
/// are ignored and yield `R::default()`.
fn with_runner<R: Default>(f: impl FnOnce(&mut SimRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("simulation not initialized; call sim_init() first");
            R::default()
        }
    })
}

/// Load a level from `{ "config": {...}, "level": {...} }`. Returns `false`
/// (and logs why) if the setup is rejected.
#[wasm_bindgen]
pub fn sim_init(setup_json: &str) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    match SimRunner::from_json(setup_json) {
        Ok(runner) => {
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            log::info!("gale: initialized");
            true
        }
        Err(err) => {
            log::error!("gale: level rejected: {err}");
            false
        }
    }
}

#[wasm_bindgen]
pub fn sim_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn sim_horizontal(value: f32) {
    with_runner(|r| r.push_input(InputEvent::Horizontal(value)));
}

#[wasm_bindgen]
pub fn sim_pointer_delta(dx: f32, dy: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDelta { dx, dy }));
}

/// Button codes follow [`Button::from_code`].
#[wasm_bindgen]
pub fn sim_press(code: u32) {
    match Button::from_code(code) {
        Some(button) => with_runner(|r| r.push_input(InputEvent::Pressed(button))),
        None => log::warn!("unknown button code {code}"),
    }
}

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    RUNNER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |r| r.draw().instances_ptr())
    })
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.draw().instance_count())
}

#[wasm_bindgen]
pub fn get_instance_floats() -> u32 {
    DrawInstance::FLOATS as u32
}

#[wasm_bindgen]
pub fn sim_is_completed() -> bool {
    with_runner(|r| r.controller().is_completed())
}

#[wasm_bindgen]
pub fn sim_is_failed() -> bool {
    with_runner(|r| r.controller().is_failed())
}

#[wasm_bindgen]
pub fn sim_player_health() -> i32 {
    with_runner(|r| r.player_health())
}

#[wasm_bindgen]
pub fn sim_lighter_ratio() -> f32 {
    with_runner(|r| r.lighter_ratio())
}

/// Event codes raised since the previous call, oldest first. Clears them.
#[wasm_bindgen]
pub fn sim_take_events() -> Vec<u32> {
    with_runner(|r| r.take_events().into_iter().map(runner::event_code).collect())
}
