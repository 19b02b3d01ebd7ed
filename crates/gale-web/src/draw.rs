use bytemuck::{Pod, Zeroable};
use gale_sim::{Behavior, BirdState, GameplayController, Obstacle, ObstacleKind};

/// Kind code for wind particles, after the obstacle kinds.
pub const WIND_PARTICLE_KIND: f32 = 12.0;

/// Ticks per half-period of the invulnerability blink.
const BLINK_TICKS: u32 = 4;
const BLINK_ALPHA: f32 = 0.3;

/// One drawable, read by the page straight out of wasm memory.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawInstance {
    pub x: f32,
    pub y: f32,
    /// Radians.
    pub rotation: f32,
    /// [`ObstacleKind`] code, or [`WIND_PARTICLE_KIND`].
    pub kind: f32,
    pub width: f32,
    pub height: f32,
    /// `1.0` facing right, `-1.0` facing left.
    pub facing: f32,
    pub alpha: f32,
}

impl DrawInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

fn blink(frames: u32) -> f32 {
    if (frames / BLINK_TICKS) % 2 == 1 {
        BLINK_ALPHA
    } else {
        1.0
    }
}

fn facing(right: bool) -> f32 {
    if right {
        1.0
    } else {
        -1.0
    }
}

/// Appearance of one obstacle, or `None` if it is never drawn.
fn obstacle_instance(obstacle: &Obstacle) -> Option<DrawInstance> {
    let (face_right, alpha) = match &obstacle.behavior {
        Behavior::Barrier => return None,
        Behavior::Player(player) => (player.is_facing_right(), blink(player.i_frames())),
        Behavior::Umbrella(umbrella) => (umbrella.is_facing_right(), 1.0),
        Behavior::Bird(bird) => {
            let alpha = match bird.state() {
                BirdState::Spawning { remaining } => blink(remaining),
                _ => 1.0,
            };
            (bird.is_facing_right(), alpha)
        }
        Behavior::Lightning(bolt) => (true, if bolt.is_striking() { 1.0 } else { 0.0 }),
        _ => (true, 1.0),
    };
    let size = obstacle.size();
    Some(DrawInstance {
        x: obstacle.position.x,
        y: obstacle.position.y,
        rotation: obstacle.angle,
        kind: obstacle.kind() as u8 as f32,
        width: size.x,
        height: size.y,
        facing: facing(face_right),
        alpha,
    })
}

/// Flat instance list rebuilt after every frame.
#[derive(Debug, Default)]
pub struct DrawBuffer {
    instances: Vec<DrawInstance>,
}

impl DrawBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    /// Refill from the live objects. Wind particles follow their field.
    pub fn rebuild(&mut self, controller: &GameplayController) {
        self.instances.clear();
        for (_, obstacle) in controller.objects() {
            let Some(instance) = obstacle_instance(obstacle) else {
                continue;
            };
            self.instances.push(instance);
            if let Behavior::Wind(wind) = &obstacle.behavior {
                let Some(particles) = wind.particles() else {
                    continue;
                };
                for particle in particles.particles() {
                    self.instances.push(DrawInstance {
                        x: particle.pos.x,
                        y: particle.pos.y,
                        rotation: wind.direction(),
                        kind: WIND_PARTICLE_KIND,
                        width: 0.1,
                        height: 0.1,
                        facing: 1.0,
                        alpha: particle.alpha(),
                    });
                }
            }
        }
    }

    pub fn instances(&self) -> &[DrawInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for reads from wasm memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// The same data as flat floats.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn count_kind(&self, kind: ObstacleKind) -> usize {
        let code = kind as u8 as f32;
        self.instances.iter().filter(|i| i.kind == code).count()
    }
}
