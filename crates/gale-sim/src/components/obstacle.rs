use glam::Vec2;

use crate::api::types::{FixtureRole, ObjectId};
use crate::components::shape::Shape;
use crate::core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, FixtureDesc, PhysicsBody, PhysicsWorld,
};
use crate::error::PhysicsError;
use crate::model::{
    BirdHazard, Hazard, LightningHazard, MovingPlatformModel, NestHazard, PlayerModel,
    StaticHazardKind, UmbrellaModel, WindModel,
};

/// Flat tag for an obstacle's behaviour, stable for the draw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObstacleKind {
    Player = 0,
    Umbrella = 1,
    Bird = 2,
    Nest = 3,
    Wind = 4,
    MovingPlatform = 5,
    Lightning = 6,
    Rock = 7,
    Bramble = 8,
    Platform = 9,
    Goal = 10,
    Barrier = 11,
}

/// What an obstacle does, beyond being a collision shape.
#[derive(Debug, Clone)]
pub enum Behavior {
    Player(PlayerModel),
    Umbrella(UmbrellaModel),
    Bird(BirdHazard),
    Nest(NestHazard),
    Wind(WindModel),
    MovingPlatform(MovingPlatformModel),
    Lightning(LightningHazard),
    StaticHazard(StaticHazardKind),
    /// Static ground.
    Platform,
    Goal,
    /// Invisible world edge.
    Barrier,
}

impl Behavior {
    pub fn kind(&self) -> ObstacleKind {
        match self {
            Behavior::Player(_) => ObstacleKind::Player,
            Behavior::Umbrella(_) => ObstacleKind::Umbrella,
            Behavior::Bird(_) => ObstacleKind::Bird,
            Behavior::Nest(_) => ObstacleKind::Nest,
            Behavior::Wind(_) => ObstacleKind::Wind,
            Behavior::MovingPlatform(_) => ObstacleKind::MovingPlatform,
            Behavior::Lightning(_) => ObstacleKind::Lightning,
            Behavior::StaticHazard(StaticHazardKind::Rock) => ObstacleKind::Rock,
            Behavior::StaticHazard(StaticHazardKind::Bramble) => ObstacleKind::Bramble,
            Behavior::Platform => ObstacleKind::Platform,
            Behavior::Goal => ObstacleKind::Goal,
            Behavior::Barrier => ObstacleKind::Barrier,
        }
    }
}

/// One simulated object: a shape, a body description, and a behaviour.
///
/// Obstacles are created detached. [`activate_physics`](Self::activate_physics)
/// gives them a body; flagging them removed hands them to the next sweep, which
/// detaches the body and frees the slot.
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Tag for logs and lookups, e.g. `"bird3"`.
    pub name: String,
    /// Body origin in world units. Mirrors the physics body once active.
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub shape: Shape,
    pub body_type: BodyType,
    pub material: ColliderMaterial,
    pub sensor: bool,
    pub fixed_rotation: bool,
    pub gravity_scale: f32,
    pub hazard: Option<Hazard>,
    pub behavior: Behavior,
    pub(crate) removed: bool,
    pub(crate) body: Option<PhysicsBody>,
}

impl Obstacle {
    pub fn new(name: impl Into<String>, shape: Shape, behavior: Behavior) -> Self {
        Self {
            name: name.into(),
            position: Vec2::ZERO,
            angle: 0.0,
            velocity: Vec2::ZERO,
            shape,
            body_type: BodyType::Fixed,
            material: ColliderMaterial::default(),
            sensor: false,
            fixed_rotation: true,
            gravity_scale: 1.0,
            hazard: None,
            behavior,
            removed: false,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    pub fn with_material(mut self, material: ColliderMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn with_hazard(mut self, hazard: Hazard) -> Self {
        self.hazard = Some(hazard);
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    // -- Lifecycle --

    pub fn kind(&self) -> ObstacleKind {
        self.behavior.kind()
    }

    pub fn body(&self) -> Option<&PhysicsBody> {
        self.body.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.body.is_some()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Flag for eviction at the next sweep. The body stays until then.
    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    fn body_desc(&self) -> BodyDesc {
        let desc = match self.body_type {
            BodyType::Dynamic => BodyDesc::dynamic().with_gravity_scale(self.gravity_scale),
            BodyType::Fixed => BodyDesc::fixed(),
            BodyType::KinematicPositionBased => BodyDesc::kinematic(),
        };
        desc.with_position(self.position)
            .with_rotation(self.angle)
            .with_velocity(self.velocity)
            .with_fixed_rotation(self.fixed_rotation)
    }

    /// Colliders for this obstacle, in fixture-index order.
    pub fn fixtures(&self) -> Vec<FixtureDesc> {
        let mut base = FixtureDesc::solid(self.shape.to_collider(), self.material);
        if self.sensor {
            base = base.as_sensor();
        }
        match &self.behavior {
            Behavior::Player(player) => {
                let size = self.shape.size();
                let tuning = player.tuning();
                let feet = FixtureDesc::sensor(
                    ColliderDesc::Cuboid {
                        half_width: size.x * 0.5 * tuning.sensor_shrink,
                        half_height: tuning.sensor_height,
                    },
                    FixtureRole::GroundSensor,
                )
                .with_offset(Vec2::new(0.0, -size.y * 0.5));
                vec![base, feet]
            }
            Behavior::Umbrella(_) => {
                // Held overhead: the shaft starts at the body origin.
                let size = self.shape.size();
                let canopy = FixtureDesc::sensor(
                    ColliderDesc::Cuboid {
                        half_width: size.x * 0.5,
                        half_height: size.y / 8.0,
                    },
                    FixtureRole::UmbrellaSensor,
                )
                .with_offset(Vec2::new(0.0, size.y * 7.0 / 8.0));
                vec![base.as_sensor().with_offset(Vec2::new(0.0, size.y * 0.5)), canopy]
            }
            Behavior::Bird(bird) => {
                // Slot 0 is the authored hit box, slot 1 its mirror for the other facing.
                let mirrored = FixtureDesc::solid(self.shape.mirrored_x().to_collider(), self.material)
                    .as_sensor()
                    .with_enabled(!bird.uses_primary_hitbox());
                let mut out = vec![base.as_sensor().with_enabled(bird.uses_primary_hitbox()), mirrored];
                if bird.can_attack() {
                    out.push(FixtureDesc::sensor(
                        ColliderDesc::Ball { radius: bird.sensor_radius() },
                        FixtureRole::SightSensor,
                    ));
                }
                out
            }
            Behavior::Lightning(bolt) => vec![base.with_enabled(bolt.is_striking())],
            _ => vec![base],
        }
    }

    /// Allocate the body and fixtures. Does nothing if already active.
    pub fn activate_physics(&mut self, id: ObjectId, world: &mut PhysicsWorld) -> Result<(), PhysicsError> {
        if self.body.is_some() {
            return Ok(());
        }
        let body = world.create_body(id, &self.body_desc(), &self.fixtures())?;
        self.body = Some(body);
        Ok(())
    }

    pub fn deactivate_physics(&mut self, world: &mut PhysicsWorld) {
        if let Some(body) = self.body.take() {
            world.remove_body(&body);
        }
    }

    /// Copy pose and velocity back from the physics body.
    pub fn sync_from_physics(&mut self, world: &PhysicsWorld) {
        if let Some(body) = &self.body {
            let (position, angle) = world.body_position(body);
            self.position = position;
            self.angle = angle;
            self.velocity = world.velocity(body);
        }
    }

    /// Enable the bird hit box that matches the current facing.
    pub fn sync_hitboxes(&self, world: &mut PhysicsWorld) {
        if let (Behavior::Bird(bird), Some(body)) = (&self.behavior, &self.body) {
            let primary = bird.uses_primary_hitbox();
            world.set_fixture_enabled(body, FixtureRole::Body, 0, primary);
            world.set_fixture_enabled(body, FixtureRole::Body, 1, !primary);
        }
    }

    /// Post-step per-object update.
    pub fn update(&mut self, dt: f32) {
        match &mut self.behavior {
            Behavior::Player(player) => player.update(),
            Behavior::Bird(bird) => bird.update(),
            Behavior::Wind(wind) => wind.tick(dt),
            _ => {}
        }
    }

    /// Advance a lightning timer and switch its collider to the new phase.
    /// Runs before the step, so a bolt overlaps things on the tick it lights.
    pub fn advance_strike(&mut self, world: &mut PhysicsWorld) -> bool {
        let (Behavior::Lightning(bolt), Some(body)) = (&mut self.behavior, &self.body) else {
            return false;
        };
        if !bolt.tick() {
            return false;
        }
        world.set_role_enabled(body, FixtureRole::Body, bolt.is_striking());
        true
    }

    // -- Queries --

    /// Something the player can stand on. World edges are walls, not floor.
    pub fn is_ground(&self) -> bool {
        !self.sensor
            && !matches!(
                self.behavior,
                Behavior::Player(_) | Behavior::Umbrella(_) | Behavior::Barrier
            )
    }

    /// Hazard capability, if it can hurt right now.
    pub fn armed_hazard(&self) -> Option<&Hazard> {
        match &self.behavior {
            Behavior::Lightning(bolt) if !bolt.is_striking() => None,
            _ => self.hazard.as_ref(),
        }
    }

    /// Direction the obstacle is travelling, for heading-based knockback.
    pub fn heading(&self) -> Vec2 {
        match &self.behavior {
            Behavior::Bird(bird) => bird.heading(),
            _ => self.velocity.normalize_or_zero(),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.shape.size()
    }

    /// Axis-aligned world bounds as `(min, max)`, rotation included.
    pub fn world_bounds(&self) -> (Vec2, Vec2) {
        let (lo, hi) = self.shape.local_bounds();
        let rot = Vec2::from_angle(self.angle);
        [lo, Vec2::new(hi.x, lo.y), hi, Vec2::new(lo.x, hi.y)]
            .into_iter()
            .map(|corner| self.position + rot.rotate(corner))
            .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(min, max), p| {
                (min.min(p), max.max(p))
            })
    }

    /// Centre of the world bounds.
    pub fn center(&self) -> Vec2 {
        let (lo, hi) = self.world_bounds();
        (lo + hi) * 0.5
    }

    pub fn player(&self) -> Option<&PlayerModel> {
        match &self.behavior {
            Behavior::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerModel> {
        match &mut self.behavior {
            Behavior::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn umbrella(&self) -> Option<&UmbrellaModel> {
        match &self.behavior {
            Behavior::Umbrella(umbrella) => Some(umbrella),
            _ => None,
        }
    }

    pub fn umbrella_mut(&mut self) -> Option<&mut UmbrellaModel> {
        match &mut self.behavior {
            Behavior::Umbrella(umbrella) => Some(umbrella),
            _ => None,
        }
    }
}
