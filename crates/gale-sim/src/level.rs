//! Typed spawn records, as produced by the level parser, and their expansion
//! into detached [`Obstacle`]s.

use glam::Vec2;
use serde::Deserialize;

use crate::components::obstacle::{Behavior, Obstacle};
use crate::components::shape::Shape;
use crate::config::SimConfig;
use crate::core::physics::{BodyType, ColliderMaterial};
use crate::error::LevelError;
use crate::model::{
    BirdColor, BirdHazard, BirdParams, Hazard, LightningHazard, MovingPlatformModel, NestHazard,
    PlayerModel, StaticHazardKind, UmbrellaModel, WindModel, WindParticles,
};

/// Thickness of the invisible side walls.
const BARRIER_THICKNESS: f32 = 0.5;

fn default_gravity() -> f32 {
    -4.9
}

fn default_true() -> bool {
    true
}

fn default_health() -> i32 {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    pub width: f32,
    pub height: f32,
    /// Vertical gravity; negative pulls down.
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default)]
    pub objects: Vec<SpawnRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnRecord {
    Player(PlayerRecord),
    Goal(BoxRecord),
    Platform(PolygonRecord),
    MovingPlatform(MovingPlatformRecord),
    Wind(WindRecord),
    Bird(BirdRecord),
    Nest(NestRecord),
    Lightning(LightningRecord),
    Rock(RockRecord),
    Bramble(PolygonRecord),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRecord {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_health")]
    pub max_health: i32,
    pub umbrella: UmbrellaRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UmbrellaRecord {
    pub width: f32,
    pub height: f32,
    /// Overrides the configured closed momentum for this level.
    #[serde(default)]
    pub closed_momentum: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoxRecord {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

/// Outline as flat `[x0, y0, x1, y1, ...]`, relative to `position`.
#[derive(Debug, Clone, Deserialize)]
pub struct PolygonRecord {
    #[serde(default)]
    pub position: Vec2,
    pub points: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovingPlatformRecord {
    pub points: Vec<f32>,
    /// World-space waypoints; the platform starts on the first.
    pub path: Vec<f32>,
    pub move_speed: f32,
    #[serde(default)]
    pub looping: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindRecord {
    #[serde(default)]
    pub position: Vec2,
    pub points: Vec<f32>,
    /// Radians, any range.
    pub direction: f32,
    pub magnitude: f32,
    #[serde(default = "default_true")]
    pub particles: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BirdRecord {
    pub points: Vec<f32>,
    /// World-space waypoints; the bird starts on the first.
    pub path: Vec<f32>,
    pub move_speed: f32,
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub attack: bool,
    pub color: BirdColor,
    #[serde(default = "default_true")]
    pub facing_right: bool,
    #[serde(default)]
    pub attack_speed: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NestRecord {
    pub position: Vec2,
    pub points: Vec<f32>,
    /// Route given to every hatchling.
    pub path: Vec<f32>,
    pub bird_speed: f32,
    pub spawn_delay: u32,
    /// Hit box of the hatchlings.
    pub bird_points: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightningRecord {
    #[serde(default)]
    pub position: Vec2,
    pub points: Vec<f32>,
    pub wait_duration: u32,
    pub strike_duration: u32,
    #[serde(default)]
    pub initial_offset: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RockRecord {
    #[serde(default)]
    pub position: Vec2,
    pub points: Vec<f32>,
    #[serde(default)]
    pub angle: f32,
}

/// Pair up a flat coordinate array.
fn coordinates(name: &str, flat: &[f32]) -> Result<Vec<Vec2>, LevelError> {
    if flat.len() % 2 != 0 {
        return Err(LevelError::OddCoordinates {
            name: name.to_string(),
            len: flat.len(),
        });
    }
    Ok(flat.chunks_exact(2).map(|c| Vec2::new(c[0], c[1])).collect())
}

fn path(name: &str, flat: &[f32]) -> Result<Vec<Vec2>, LevelError> {
    let points = coordinates(name, flat)?;
    if points.is_empty() {
        return Err(LevelError::EmptyPath { name: name.to_string() });
    }
    Ok(points)
}

fn polygon(name: &str, flat: &[f32]) -> Result<Shape, LevelError> {
    Ok(Shape::Polygon {
        points: coordinates(name, flat)?,
    })
}

/// Per-kind counters for object names.
#[derive(Default)]
struct Names {
    counts: std::collections::HashMap<&'static str, usize>,
}

impl Names {
    fn next(&mut self, prefix: &'static str) -> String {
        let n = self.counts.entry(prefix).or_insert(0);
        let name = format!("{prefix}{n}");
        *n += 1;
        name
    }
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether `pos` lies inside `[0, width] × [0, height]`.
    pub fn contains(&self, pos: Vec2) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y)
    }

    /// Expand every record into detached obstacles. The player comes first,
    /// followed by its umbrella; the side walls come last.
    pub fn build_objects(&self, config: &SimConfig) -> Result<Vec<Obstacle>, LevelError> {
        let mut players = self.objects.iter().filter_map(|record| match record {
            SpawnRecord::Player(player) => Some(player),
            _ => None,
        });
        let player = players.next().ok_or(LevelError::MissingPlayer)?;
        if players.next().is_some() {
            return Err(LevelError::DuplicatePlayer);
        }

        let mut out = Vec::with_capacity(self.objects.len() + 4);
        out.push(player_obstacle(player, config));
        out.push(umbrella_obstacle(player, config));

        let mut names = Names::default();
        for record in &self.objects {
            let obstacle = match record {
                SpawnRecord::Player(_) => continue,
                SpawnRecord::Goal(goal) => Obstacle::new(
                    names.next("goal"),
                    Shape::Box { width: goal.width, height: goal.height },
                    Behavior::Goal,
                )
                .with_position(goal.position)
                .with_sensor(true),
                SpawnRecord::Platform(platform) => {
                    let name = names.next("platform");
                    let shape = polygon(&name, &platform.points)?;
                    Obstacle::new(name, shape, Behavior::Platform).with_position(platform.position)
                }
                SpawnRecord::MovingPlatform(platform) => {
                    let name = names.next("movingplatform");
                    let shape = polygon(&name, &platform.points)?;
                    let route = path(&name, &platform.path)?;
                    let start = route[0];
                    let model = MovingPlatformModel::new(route, platform.looping, platform.move_speed);
                    Obstacle::new(name, shape, Behavior::MovingPlatform(model))
                        .with_position(start)
                        .with_body_type(BodyType::KinematicPositionBased)
                }
                SpawnRecord::Wind(wind) => {
                    let name = names.next("wind");
                    let outline = coordinates(&name, &wind.points)?;
                    let mut model = WindModel::new(wind.magnitude, wind.direction);
                    let direction = model.direction();
                    if wind.particles {
                        let world: Vec<Vec2> = outline.iter().map(|p| *p + wind.position).collect();
                        let seed = config.particle_seed ^ out.len() as u64;
                        model = model.with_particles(WindParticles::new(
                            &world,
                            direction,
                            wind.magnitude,
                            config.wind_particle_density,
                            config.max_wind_particles,
                            seed,
                        ));
                    }
                    Obstacle::new(name, Shape::Polygon { points: outline }, Behavior::Wind(model))
                        .with_position(wind.position)
                        .with_sensor(true)
                }
                SpawnRecord::Bird(bird) => bird_obstacle(names.next("bird"), bird, config)?,
                SpawnRecord::Nest(nest) => {
                    let name = names.next("nest");
                    let shape = polygon(&name, &nest.points)?;
                    let route = path(&name, &nest.path)?;
                    let hatch_outline = coordinates(&name, &nest.bird_points)?;
                    let model = NestHazard::new(route, nest.bird_speed, nest.spawn_delay, hatch_outline);
                    Obstacle::new(name, shape, Behavior::Nest(model))
                        .with_position(nest.position)
                        .with_sensor(true)
                }
                SpawnRecord::Lightning(bolt) => {
                    let name = names.next("lightning");
                    let shape = polygon(&name, &bolt.points)?;
                    let model = LightningHazard::new(bolt.wait_duration, bolt.strike_duration, bolt.initial_offset);
                    Obstacle::new(name, shape, Behavior::Lightning(model))
                        .with_position(bolt.position)
                        .with_sensor(true)
                        .with_hazard(Hazard::lightning(config.lightning))
                }
                SpawnRecord::Rock(rock) => {
                    let name = names.next("rock");
                    let shape = polygon(&name, &rock.points)?;
                    Obstacle::new(name, shape, Behavior::StaticHazard(StaticHazardKind::Rock))
                        .with_position(rock.position)
                        .with_angle(rock.angle)
                        .with_hazard(Hazard::rock(config.rocks))
                }
                SpawnRecord::Bramble(bramble) => {
                    let name = names.next("bramble");
                    let shape = polygon(&name, &bramble.points)?;
                    Obstacle::new(name, shape, Behavior::StaticHazard(StaticHazardKind::Bramble))
                        .with_position(bramble.position)
                        .with_sensor(true)
                        .with_hazard(Hazard::bramble(config.brambles))
                }
            };
            out.push(obstacle);
        }

        for x in [0.0, self.width] {
            out.push(
                Obstacle::new(
                    names.next("barrier"),
                    Shape::Box {
                        width: BARRIER_THICKNESS,
                        height: self.height * 3.0,
                    },
                    Behavior::Barrier,
                )
                .with_position(Vec2::new(x, self.height * 0.5))
                .with_material(ColliderMaterial { friction: 0.0, ..ColliderMaterial::default() }),
            );
        }
        Ok(out)
    }
}

fn player_obstacle(record: &PlayerRecord, config: &SimConfig) -> Obstacle {
    let tuning = config.player;
    Obstacle::new(
        "player",
        Shape::Capsule {
            width: record.width,
            height: record.height,
        },
        Behavior::Player(PlayerModel::new(tuning, record.max_health)),
    )
    .with_position(record.position)
    .with_body_type(BodyType::Dynamic)
    .with_material(ColliderMaterial {
        restitution: 0.0,
        friction: tuning.friction,
        density: tuning.density,
    })
}

fn umbrella_obstacle(player: &PlayerRecord, config: &SimConfig) -> Obstacle {
    let record = &player.umbrella;
    Obstacle::new(
        "umbrella",
        Shape::Box {
            width: record.width,
            height: record.height,
        },
        Behavior::Umbrella(UmbrellaModel::new(&config.umbrella, record.closed_momentum)),
    )
    .with_position(player.position)
    .with_body_type(BodyType::KinematicPositionBased)
    .with_sensor(true)
}

fn bird_obstacle(name: String, record: &BirdRecord, config: &SimConfig) -> Result<Obstacle, LevelError> {
    let shape = polygon(&name, &record.points)?;
    let route = path(&name, &record.path)?;
    let start = route[0];
    let tuning = config.birds;
    let params = BirdParams {
        path: route,
        looping: record.looping,
        move_speed: record.move_speed,
        color: record.color,
        // Red birds always hunt.
        attack: record.attack || record.color == BirdColor::Red,
        attack_speed: record.attack_speed.unwrap_or(tuning.attack_speed),
        sensor_radius: tuning.sensor_radius,
        attack_wait: tuning.attack_wait,
        face_right: record.facing_right,
        step_scale: config.step_scale,
    };
    Ok(Obstacle::new(name, shape, Behavior::Bird(BirdHazard::new(params)))
        .with_position(start)
        .with_body_type(BodyType::KinematicPositionBased)
        .with_sensor(true)
        .with_hazard(Hazard::bird(tuning.damage, tuning.knockback)))
}

/// A blue hatchling at `nest_pos`, blinking for the nest's spawn delay.
pub fn nested_bird(name: String, nest_pos: Vec2, nest: &NestHazard, config: &SimConfig) -> Obstacle {
    let tuning = config.birds;
    let params = BirdParams {
        path: nest.path().to_vec(),
        looping: false,
        move_speed: nest.bird_speed(),
        color: BirdColor::Blue,
        attack: false,
        attack_speed: tuning.attack_speed,
        sensor_radius: tuning.sensor_radius,
        attack_wait: tuning.attack_wait,
        face_right: nest.hatch_facing(nest_pos),
        step_scale: config.step_scale,
    };
    Obstacle::new(
        name,
        Shape::Polygon {
            points: nest.bird_points().to_vec(),
        },
        Behavior::Bird(BirdHazard::hatchling(params, nest.spawn_delay())),
    )
    .with_position(nest_pos)
    .with_body_type(BodyType::KinematicPositionBased)
    .with_sensor(true)
    .with_hazard(Hazard::bird(tuning.damage, tuning.knockback))
}
