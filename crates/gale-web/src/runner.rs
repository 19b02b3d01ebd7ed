use gale_sim::{
    Button, FixedTimestep, GameplayController, InputEvent, InputIntent, LevelData, LevelError,
    SimConfig, SimEvent,
};
use serde::Deserialize;

use crate::draw::DrawBuffer;

/// Initial draw buffer capacity.
const DRAW_CAPACITY: usize = 512;

/// Numeric code for the page's sound and HUD cues.
pub fn event_code(event: SimEvent) -> u32 {
    match event {
        SimEvent::PlayerDamaged { .. } => 0,
        SimEvent::PlayerKilled => 1,
        SimEvent::LevelCompleted => 2,
        SimEvent::LevelFailed => 3,
        SimEvent::UmbrellaToggled { open: true } => 4,
        SimEvent::UmbrellaToggled { open: false } => 5,
        SimEvent::LighterFired => 6,
        SimEvent::BirdSpotted { .. } => 7,
        SimEvent::BirdHatched { .. } => 8,
    }
}

/// Payload accepted by [`SimRunner::from_json`]. Tuning is optional; any
/// field left out keeps its default.
#[derive(Debug, Deserialize)]
pub struct SimSetup {
    #[serde(default)]
    pub config: SimConfig,
    pub level: LevelData,
}

/// Drives a [`GameplayController`] from the browser frame loop.
///
/// Input arrives between frames and is folded into one [`InputIntent`].
/// Each frame runs as many fixed ticks as the elapsed time covers; button
/// edges are seen by the first of those ticks only.
pub struct SimRunner {
    controller: GameplayController,
    timestep: FixedTimestep,
    intent: InputIntent,
    draw: DrawBuffer,
    paused: bool,
    events: Vec<SimEvent>,
}

impl SimRunner {
    pub fn new(config: SimConfig, level: LevelData) -> Result<Self, LevelError> {
        let timestep = FixedTimestep::new(config.fixed_dt);
        let controller = GameplayController::new(config, level)?;
        let mut draw = DrawBuffer::with_capacity(DRAW_CAPACITY);
        draw.rebuild(&controller);
        Ok(Self {
            controller,
            timestep,
            intent: InputIntent::default(),
            draw,
            paused: false,
            events: Vec::new(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let setup: SimSetup = serde_json::from_str(json)?;
        Self::new(setup.config, setup.level)
    }

    /// Fold an input event into the pending intent.
    pub fn push_input(&mut self, event: InputEvent) {
        self.intent.apply(event);
    }

    /// Run one frame: screen-flow buttons, fixed ticks, then the draw buffer.
    pub fn tick(&mut self, dt: f32) {
        if self.intent.is_pressed(Button::Pause) {
            self.paused = !self.paused;
            log::info!("paused: {}", self.paused);
        }
        if self.intent.is_pressed(Button::Reset) {
            self.restart();
        }
        if self.paused {
            self.intent.end_tick();
            return;
        }

        let steps = self.timestep.accumulate(dt);
        let fixed_dt = self.timestep.dt();
        for _ in 0..steps {
            self.controller.run_frame(&self.intent, fixed_dt);
            // Edges fire once, however many ticks this frame runs.
            self.intent.end_tick();
        }
        if steps == 0 {
            // Keep the pointer motion for the next tick but drop the edges
            // that were already handled above.
            self.intent.pressed.pause = false;
            self.intent.pressed.reset = false;
        }

        self.events.extend(self.controller.drain_events());
        self.draw.rebuild(&self.controller);
    }

    /// Rebuild the level in place, keeping the held walk axis.
    pub fn restart(&mut self) {
        if let Err(err) = self.controller.reset() {
            log::error!("level reset failed: {err}");
        }
        self.timestep.reset();
        self.paused = false;
        self.events.clear();
        self.draw.rebuild(&self.controller);
    }

    pub fn controller(&self) -> &GameplayController {
        &self.controller
    }

    pub fn draw(&self) -> &DrawBuffer {
        &self.draw
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Events raised since the last call.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player_health(&self) -> i32 {
        self.controller.player().map_or(0, |p| p.health())
    }

    pub fn lighter_ratio(&self) -> f32 {
        self.controller.player().map_or(0.0, |p| p.lighter_ratio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gale_sim::ObstacleKind;

    const DT: f32 = 1.0 / 60.0;

    const SETUP: &str = r#"{
        "config": { "i_frames": 30 },
        "level": {
            "width": 20.0, "height": 12.0,
            "objects": [
                { "kind": "player", "position": [3.0, 3.0], "width": 0.5, "height": 1.0,
                  "umbrella": { "width": 1.0, "height": 1.0 } },
                { "kind": "platform", "position": [0.0, 1.0], "points": [0, 0, 10, 0, 10, 1, 0, 1] },
                { "kind": "wind", "points": [12, 2, 16, 2, 16, 8, 12, 8],
                  "direction": 1.5707964, "magnitude": 5.0 }
            ]
        }
    }"#;

    #[test]
    fn setup_parses_with_partial_config() {
        let runner = SimRunner::from_json(SETUP).unwrap();
        assert_eq!(runner.controller().config().i_frames, 30);
        assert_eq!(runner.controller().config().fixed_dt, DT);
        assert_eq!(runner.player_health(), 3);
    }

    #[test]
    fn draw_buffer_skips_barriers_and_adds_particles() {
        let runner = SimRunner::from_json(SETUP).unwrap();
        let draw = runner.draw();
        assert_eq!(draw.count_kind(ObstacleKind::Barrier), 0);
        assert_eq!(draw.count_kind(ObstacleKind::Player), 1);
        assert_eq!(draw.count_kind(ObstacleKind::Wind), 1);
        // 4 x 6 field at one particle per square unit
        let particles = draw.instances().iter().filter(|i| i.kind == crate::draw::WIND_PARTICLE_KIND).count();
        assert_eq!(particles, 24);
    }

    #[test]
    fn toggle_edge_fires_once_per_frame() {
        let mut runner = SimRunner::from_json(SETUP).unwrap();
        runner.push_input(InputEvent::Pressed(Button::ToggleUmbrella));
        runner.tick(DT * 3.5);
        assert!(runner.controller().umbrella().unwrap().is_open());
        let toggles = runner
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::UmbrellaToggled { .. }))
            .count();
        assert_eq!(toggles, 1);
        assert_eq!(event_code(SimEvent::UmbrellaToggled { open: true }), 4);
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut runner = SimRunner::from_json(SETUP).unwrap();
        runner.push_input(InputEvent::Pressed(Button::Pause));
        runner.tick(DT * 10.5);
        assert!(runner.is_paused());
        let id = runner.controller().player_id().unwrap();
        assert_eq!(runner.controller().object(id).unwrap().position.y, 3.0);
    }

    #[test]
    fn reset_button_restores_spawn() {
        let mut runner = SimRunner::from_json(SETUP).unwrap();
        runner.tick(DT * 8.5);
        runner.tick(DT * 8.5);
        let id = runner.controller().player_id().unwrap();
        assert!(runner.controller().object(id).unwrap().position.y < 3.0);

        runner.push_input(InputEvent::Pressed(Button::Reset));
        runner.tick(0.0);
        let id = runner.controller().player_id().unwrap();
        assert_eq!(runner.controller().object(id).unwrap().position.y, 3.0);
        assert!(!runner.is_paused());
    }

    #[test]
    fn bad_setup_is_an_error() {
        assert!(SimRunner::from_json(r#"{ "level": { "width": 1.0 } }"#).is_err());
    }
}
