use glam::Vec2;

/// Discrete buttons the shell can forward. The simulation itself reads
/// `ToggleUmbrella` and `Lighter`; the rest drive screen flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Jump,
    Debug,
    Reset,
    Pause,
    Exit,
    ToggleUmbrella,
    Lighter,
}

impl Button {
    /// Stable numeric codes for the JS bridge.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Button::Jump),
            1 => Some(Button::Debug),
            2 => Some(Button::Reset),
            3 => Some(Button::Pause),
            4 => Some(Button::Exit),
            5 => Some(Button::ToggleUmbrella),
            6 => Some(Button::Lighter),
            _ => None,
        }
    }
}

/// Raw device-level input as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Walk axis in `[-1, 1]`; held until the next value arrives.
    Horizontal(f32),
    /// Relative pointer motion since the previous event.
    PointerDelta { dx: f32, dy: f32 },
    /// A button went down this frame.
    Pressed(Button),
}

/// Edge-triggered button state for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    pub jump: bool,
    pub debug: bool,
    pub reset: bool,
    pub pause: bool,
    pub exit: bool,
    pub toggle_umbrella: bool,
    pub lighter: bool,
}

/// Everything the simulation reads from the player in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputIntent {
    pub horizontal: f32,
    pub pointer_delta: Vec2,
    pub pressed: ButtonEdges,
}

impl InputIntent {
    /// Fold one platform event into the intent.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Horizontal(value) => self.horizontal = value.clamp(-1.0, 1.0),
            InputEvent::PointerDelta { dx, dy } => self.pointer_delta += Vec2::new(dx, dy),
            InputEvent::Pressed(button) => *self.edge_mut(button) = true,
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Jump => self.pressed.jump,
            Button::Debug => self.pressed.debug,
            Button::Reset => self.pressed.reset,
            Button::Pause => self.pressed.pause,
            Button::Exit => self.pressed.exit,
            Button::ToggleUmbrella => self.pressed.toggle_umbrella,
            Button::Lighter => self.pressed.lighter,
        }
    }

    /// Clear per-tick state once it has been consumed. The walk axis is held.
    pub fn end_tick(&mut self) {
        self.pointer_delta = Vec2::ZERO;
        self.pressed = ButtonEdges::default();
    }

    fn edge_mut(&mut self, button: Button) -> &mut bool {
        match button {
            Button::Jump => &mut self.pressed.jump,
            Button::Debug => &mut self.pressed.debug,
            Button::Reset => &mut self.pressed.reset,
            Button::Pause => &mut self.pressed.pause,
            Button::Exit => &mut self.pressed.exit,
            Button::ToggleUmbrella => &mut self.pressed.toggle_umbrella,
            Button::Lighter => &mut self.pressed.lighter,
        }
    }
}
