use glam::Vec2;
use rapier2d::prelude::*;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use crate::api::types::{FixtureId, FixtureRole, ObjectId};
use crate::components::shape::solid_outline;
use crate::error::PhysicsError;

// Rapier speaks nalgebra; everything public here speaks glam.

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn vec2_to_point(v: Vec2) -> nalgebra::Point2<f32> {
    nalgebra::Point2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn pose_of(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
    /// Moved by setting its next pose each tick; pushes dynamic bodies it runs into.
    KinematicPositionBased,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
            BodyType::KinematicPositionBased => RigidBodyType::KinematicPositionBased,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
    CapsuleY { half_height: f32, radius: f32 },
    /// Simple polygon in body-local space. Concave outlines become a compound of convex parts.
    Polygon { points: Vec<Vec2> },
}

impl ColliderDesc {
    fn build_collider(&self) -> Result<ColliderBuilder, PhysicsError> {
        match self {
            ColliderDesc::Ball { radius } => Ok(ColliderBuilder::ball(*radius)),
            ColliderDesc::Cuboid { half_width, half_height } => {
                Ok(ColliderBuilder::cuboid(*half_width, *half_height))
            }
            ColliderDesc::CapsuleY { half_height, radius } => {
                Ok(ColliderBuilder::capsule_y(*half_height, *radius))
            }
            ColliderDesc::Polygon { points } => Ok(ColliderBuilder::new(solid_outline(points)?)),
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.4,
            density: 1.0,
        }
    }
}

/// One collider to attach to a body.
#[derive(Debug, Clone)]
pub struct FixtureDesc {
    pub shape: ColliderDesc,
    /// Offset of the collider from the body origin.
    pub offset: Vec2,
    pub sensor: bool,
    pub enabled: bool,
    pub role: FixtureRole,
    pub material: ColliderMaterial,
}

impl FixtureDesc {
    pub fn solid(shape: ColliderDesc, material: ColliderMaterial) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
            sensor: false,
            enabled: true,
            role: FixtureRole::Body,
            material,
        }
    }

    /// Massless, non-colliding fixture that only reports overlaps.
    pub fn sensor(shape: ColliderDesc, role: FixtureRole) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
            sensor: true,
            enabled: true,
            role,
            material: ColliderMaterial { density: 0.0, ..ColliderMaterial::default() },
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self.material.density = 0.0;
        self
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub fixed_rotation: bool,
    pub ccd: bool,
}

impl BodyDesc {
    fn of_type(body_type: BodyType) -> Self {
        Self {
            body_type,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            gravity_scale: if body_type == BodyType::Dynamic { 1.0 } else { 0.0 },
            fixed_rotation: body_type != BodyType::Dynamic,
            ccd: false,
        }
    }

    pub fn dynamic() -> Self {
        Self::of_type(BodyType::Dynamic)
    }

    pub fn fixed() -> Self {
        Self::of_type(BodyType::Fixed)
    }

    pub fn kinematic() -> Self {
        Self::of_type(BodyType::KinematicPositionBased)
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

}

/// Handles stored on an obstacle, referencing Rapier internals.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    fixtures: Vec<(FixtureId, ColliderHandle)>,
}

impl PhysicsBody {
    pub fn fixture_ids(&self) -> impl Iterator<Item = FixtureId> + '_ {
        self.fixtures.iter().map(|(id, _)| *id)
    }
}

/// A begin/end overlap between two fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: FixtureId,
    pub b: FixtureId,
    /// `true` when the contact just started, `false` when it ended.
    pub started: bool,
}

/// Overlap events raised during one step, collected without a channel.
#[derive(Default)]
struct OverlapBuffer(Mutex<Vec<CollisionEvent>>);

impl OverlapBuffer {
    fn take(&self) -> Vec<CollisionEvent> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventHandler for OverlapBuffer {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

/// Owns every Rapier set and pipeline the simulation needs. Y is up.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    overlaps: OverlapBuffer,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            overlaps: OverlapBuffer::default(),
        }
    }

    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vec2_to_na(gravity);
    }

    pub fn gravity(&self) -> Vec2 {
        na_to_vec2(&self.gravity)
    }

    /// Solver passes per step. `velocity` maps onto the main solver loop and
    /// `position` onto the inner stabilization passes.
    pub fn set_solver_iterations(&mut self, velocity: usize, position: usize) {
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(velocity).unwrap_or(NonZeroUsize::MIN);
        self.integration_parameters.num_internal_pgs_iterations = position.max(1);
    }

    /// Create a rigid body with its fixtures. All colliders are validated before
    /// anything is inserted, so a failure leaves the world untouched.
    /// The object id goes into the body's `user_data`; each collider carries its [`FixtureId`].
    pub fn create_body(
        &mut self,
        object: ObjectId,
        desc: &BodyDesc,
        fixtures: &[FixtureDesc],
    ) -> Result<PhysicsBody, PhysicsError> {
        let mut built = Vec::with_capacity(fixtures.len());
        for (slot, fixture) in fixtures.iter().enumerate() {
            let id = FixtureId {
                object,
                role: fixture.role,
                index: slot as u16,
            };
            let mut builder = fixture
                .shape
                .build_collider()?
                .translation(vec2_to_na(fixture.offset))
                .sensor(fixture.sensor)
                .enabled(fixture.enabled)
                .restitution(fixture.material.restitution)
                .friction(fixture.material.friction)
                .density(fixture.material.density)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .user_data(id.to_bits());
            if fixture.sensor {
                // Sensors also watch fixed and kinematic neighbours (wind fields, birds).
                builder = builder.active_collision_types(ActiveCollisionTypes::all());
            }
            built.push((id, builder.build()));
        }

        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .rotation(desc.rotation)
            .linvel(vec2_to_na(desc.velocity))
            .gravity_scale(desc.gravity_scale)
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .ccd_enabled(desc.ccd)
            .user_data(object.index as u128 | (object.generation as u128) << 32)
            .build();
        let body_handle = self.bodies.insert(rb);

        let fixtures = built
            .into_iter()
            .map(|(id, collider)| {
                let handle = self
                    .colliders
                    .insert_with_parent(collider, body_handle, &mut self.bodies);
                (id, handle)
            })
            .collect();

        Ok(PhysicsBody {
            body_handle,
            fixtures,
        })
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance one fixed step and append the overlaps that began or ended.
    /// Accumulated forces are cleared afterwards, so forces are per-step.
    pub fn step_into(&mut self, contact_events: &mut Vec<ContactEvent>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.overlaps,
        );

        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }

        for event in self.overlaps.take() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };
            // Colliders removed this step no longer resolve; their owners are
            // purged from contact state when they are evicted.
            if let (Some(a), Some(b)) = (self.fixture_of(h1), self.fixture_of(h2)) {
                contact_events.push(ContactEvent { a, b, started });
            }
        }
    }

    pub fn apply_force(&mut self, body: &PhysicsBody, force: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.add_force(vec2_to_na(force), true);
        }
    }

    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse(vec2_to_na(impulse), true);
        }
    }

    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Target pose for a kinematic body at the end of the next step.
    pub fn set_kinematic_position(&mut self, body: &PhysicsBody, pos: Vec2, rotation: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_next_kinematic_position(nalgebra::Isometry2::new(vec2_to_na(pos), rotation));
        }
    }

    /// Teleport a body without integrating through the space in between.
    pub fn set_pose(&mut self, body: &PhysicsBody, pos: Vec2, rotation: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_position(nalgebra::Isometry2::new(vec2_to_na(pos), rotation), true);
        }
    }

    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| pose_of(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    /// Toggle a single fixture. Disabled fixtures neither collide nor report overlaps.
    pub fn set_fixture_enabled(&mut self, body: &PhysicsBody, role: FixtureRole, index: u16, enabled: bool) {
        for (id, handle) in &body.fixtures {
            if id.role == role && id.index == index {
                if let Some(collider) = self.colliders.get_mut(*handle) {
                    collider.set_enabled(enabled);
                }
            }
        }
    }

    /// Toggle every fixture with the given role.
    pub fn set_role_enabled(&mut self, body: &PhysicsBody, role: FixtureRole, enabled: bool) {
        for (id, handle) in &body.fixtures {
            if id.role == role {
                if let Some(collider) = self.colliders.get_mut(*handle) {
                    collider.set_enabled(enabled);
                }
            }
        }
    }

    /// Owner of the first solid collider on the segment `from → to`, ignoring
    /// sensors and the `exclude` body itself.
    pub fn first_hit(&self, from: Vec2, to: Vec2, exclude: &PhysicsBody) -> Option<ObjectId> {
        let delta = to - from;
        let length = delta.length();
        if length <= f32::EPSILON {
            return None;
        }
        let ray = Ray::new(vec2_to_point(from), vec2_to_na(delta / length));
        let filter = QueryFilter::default()
            .exclude_sensors()
            .exclude_rigid_body(exclude.body_handle);
        let (handle, _toi) =
            self.query_pipeline
                .cast_ray(&self.bodies, &self.colliders, &ray, length, true, filter)?;
        self.fixture_of(handle).map(|fixture| fixture.object)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    // -- private helpers --

    fn fixture_of(&self, collider_handle: ColliderHandle) -> Option<FixtureId> {
        let collider = self.colliders.get(collider_handle)?;
        FixtureId::from_bits(collider.user_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn ball(radius: f32) -> Vec<FixtureDesc> {
        vec![FixtureDesc::solid(
            ColliderDesc::Ball { radius },
            ColliderMaterial::default(),
        )]
    }

    fn oid(index: u32) -> ObjectId {
        ObjectId::new(index, 0)
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world
            .create_body(oid(1), &BodyDesc::dynamic(), &ball(0.5))
            .unwrap();
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 1);
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn multiple_fixtures_get_distinct_ids() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let fixtures = vec![
            FixtureDesc::solid(ColliderDesc::Cuboid { half_width: 0.5, half_height: 1.0 }, ColliderMaterial::default()),
            FixtureDesc::sensor(ColliderDesc::Cuboid { half_width: 0.3, half_height: 0.05 }, FixtureRole::GroundSensor)
                .with_offset(Vec2::new(0.0, -1.0)),
        ];
        let body = world
            .create_body(oid(4), &BodyDesc::dynamic(), &fixtures)
            .unwrap();
        let ids: Vec<_> = body.fixture_ids().collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].role, FixtureRole::Body);
        assert_eq!(ids[1].role, FixtureRole::GroundSensor);
        assert_eq!(ids[1].index, 1);
        assert!(ids.iter().all(|id| id.object == oid(4)));
    }

    #[test]
    fn gravity_pulls_down() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -4.9));
        world.set_dt(DT);
        let body = world
            .create_body(oid(1), &BodyDesc::dynamic().with_position(Vec2::new(0.0, 10.0)), &ball(0.5))
            .unwrap();

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&body);
        assert!(pos.y < 10.0, "body should fall, y = {}", pos.y);
    }

    #[test]
    fn impulse_changes_velocity() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world
            .create_body(oid(1), &BodyDesc::dynamic(), &ball(0.5))
            .unwrap();
        assert_eq!(world.velocity(&body), Vec2::ZERO);
        world.apply_impulse(&body, Vec2::new(5.0, 0.0));
        let mut events = Vec::new();
        world.step_into(&mut events);
        assert!(world.velocity(&body).x > 0.0);
    }

    #[test]
    fn forces_do_not_carry_over_between_steps() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(DT);
        let body = world
            .create_body(oid(1), &BodyDesc::dynamic(), &ball(0.5))
            .unwrap();
        let mut events = Vec::new();
        world.apply_force(&body, Vec2::new(10.0, 0.0));
        world.step_into(&mut events);
        let after_push = world.velocity(&body).x;
        world.step_into(&mut events);
        let coasting = world.velocity(&body).x;
        assert!(after_push > 0.0);
        assert!((coasting - after_push).abs() < 1e-4);
    }

    #[test]
    fn set_velocity_directly() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world
            .create_body(oid(1), &BodyDesc::dynamic(), &ball(0.5))
            .unwrap();
        world.set_velocity(&body, Vec2::new(5.0, -3.0));
        let vel = world.velocity(&body);
        assert!((vel.x - 5.0).abs() < 0.001);
        assert!((vel.y + 3.0).abs() < 0.001);
    }

    #[test]
    fn fixed_body_does_not_move() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -9.8));
        world.set_dt(DT);
        let body = world
            .create_body(
                oid(1),
                &BodyDesc::fixed().with_position(Vec2::new(0.0, 5.0)),
                &[FixtureDesc::solid(
                    ColliderDesc::Cuboid { half_width: 10.0, half_height: 1.0 },
                    ColliderMaterial::default(),
                )],
            )
            .unwrap();
        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&body);
        assert!((pos.y - 5.0).abs() < 0.001);
    }

    #[test]
    fn kinematic_body_reaches_target_pose() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(DT);
        let body = world
            .create_body(oid(1), &BodyDesc::kinematic(), &ball(0.5))
            .unwrap();
        world.set_kinematic_position(&body, Vec2::new(0.25, 0.0), 0.0);
        let mut events = Vec::new();
        world.step_into(&mut events);
        let (pos, _) = world.body_position(&body);
        assert!((pos.x - 0.25).abs() < 1e-4);
    }

    #[test]
    fn contact_events_between_converging_bodies() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(DT);
        world
            .create_body(oid(1), &BodyDesc::dynamic().with_velocity(Vec2::new(4.0, 0.0)), &ball(0.5))
            .unwrap();
        world
            .create_body(
                oid(2),
                &BodyDesc::dynamic()
                    .with_position(Vec2::new(3.0, 0.0))
                    .with_velocity(Vec2::new(-4.0, 0.0)),
                &ball(0.5),
            )
            .unwrap();

        let mut events = Vec::new();
        for _ in 0..60 {
            world.step_into(&mut events);
        }
        let first = events
            .iter()
            .find(|e| e.started)
            .expect("should have at least one start event");
        let owners = [first.a.object, first.b.object];
        assert!(owners.contains(&oid(1)));
        assert!(owners.contains(&oid(2)));
    }

    #[test]
    fn sensor_reports_overlap_without_blocking() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -9.8));
        world.set_dt(DT);
        let falling = world
            .create_body(oid(1), &BodyDesc::dynamic().with_position(Vec2::new(0.0, 3.0)), &ball(0.25))
            .unwrap();
        world
            .create_body(
                oid(2),
                &BodyDesc::fixed(),
                &[FixtureDesc::sensor(
                    ColliderDesc::Cuboid { half_width: 1.0, half_height: 1.0 },
                    FixtureRole::Body,
                )],
            )
            .unwrap();

        let mut events = Vec::new();
        for _ in 0..90 {
            world.step_into(&mut events);
        }
        assert!(events
            .iter()
            .any(|e| e.started && (e.a.object == oid(2) || e.b.object == oid(2))));
        let (pos, _) = world.body_position(&falling);
        assert!(pos.y < -1.0, "ball should fall through the sensor, y = {}", pos.y);
    }

    #[test]
    fn disabled_fixture_reports_nothing() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(DT);
        world
            .create_body(oid(1), &BodyDesc::dynamic(), &ball(0.5))
            .unwrap();
        let hazard = world
            .create_body(
                oid(2),
                &BodyDesc::fixed(),
                &[FixtureDesc::sensor(ColliderDesc::Ball { radius: 1.0 }, FixtureRole::Body)],
            )
            .unwrap();
        world.set_role_enabled(&hazard, FixtureRole::Body, false);

        let mut events = Vec::new();
        for _ in 0..5 {
            world.step_into(&mut events);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn concave_polygon_builds_and_degenerate_fails() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let ell = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(0.0, 3.0),
        ];
        let ok = world.create_body(
            oid(1),
            &BodyDesc::fixed(),
            &[FixtureDesc::solid(ColliderDesc::Polygon { points: ell }, ColliderMaterial::default())],
        );
        assert!(ok.is_ok());

        let line = vec![Vec2::ZERO, Vec2::new(1.0, 0.0)];
        let err = world
            .create_body(
                oid(2),
                &BodyDesc::fixed(),
                &[FixtureDesc::solid(ColliderDesc::Polygon { points: line }, ColliderMaterial::default())],
            )
            .unwrap_err();
        assert_eq!(err, PhysicsError::TooFewVertices(2));
        assert_eq!(world.body_count(), 1, "failed creation must not leave a body behind");
    }

    #[test]
    fn ray_skips_sensors_and_self() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(DT);
        let eye = world
            .create_body(oid(1), &BodyDesc::kinematic(), &ball(0.5))
            .unwrap();
        world
            .create_body(
                oid(2),
                &BodyDesc::fixed().with_position(Vec2::new(2.0, 0.0)),
                &[FixtureDesc::sensor(
                    ColliderDesc::Cuboid { half_width: 0.5, half_height: 0.5 },
                    FixtureRole::Body,
                )],
            )
            .unwrap();
        world
            .create_body(
                oid(3),
                &BodyDesc::fixed().with_position(Vec2::new(5.0, 0.0)),
                &[FixtureDesc::solid(
                    ColliderDesc::Cuboid { half_width: 0.5, half_height: 0.5 },
                    ColliderMaterial::default(),
                )],
            )
            .unwrap();

        let mut events = Vec::new();
        world.step_into(&mut events);
        assert_eq!(world.first_hit(Vec2::ZERO, Vec2::new(10.0, 0.0), &eye), Some(oid(3)));
        assert_eq!(world.first_hit(Vec2::ZERO, Vec2::new(3.0, 0.0), &eye), None);
    }

    #[test]
    fn builder_pattern() {
        let desc = BodyDesc::dynamic()
            .with_position(Vec2::new(1.0, 2.0))
            .with_velocity(Vec2::new(1.0, 2.0))
            .with_gravity_scale(0.5)
            .with_fixed_rotation(true)
            .with_ccd(true);
        assert_eq!(desc.body_type, BodyType::Dynamic);
        assert_eq!(desc.position, Vec2::new(1.0, 2.0));
        assert!((desc.gravity_scale - 0.5).abs() < 0.001);
        assert!(desc.fixed_rotation);
        assert!(desc.ccd);

        let kinematic = BodyDesc::kinematic();
        assert_eq!(kinematic.gravity_scale, 0.0);
        assert!(kinematic.fixed_rotation);
    }
}
