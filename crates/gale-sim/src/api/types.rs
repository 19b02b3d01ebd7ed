/// Stable handle to an object slot in the [`Arena`](crate::core::arena::Arena).
/// The generation tells a reused slot apart from the object that used to live there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub index: u32,
    pub generation: u32,
}

impl ObjectId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// What a fixture is for. Travels inside the collider's user data so contact
/// events can be routed without a side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FixtureRole {
    /// The object's own collision shape (or one of its hit boxes).
    Body = 0,
    /// Thin sensor under the player's feet.
    GroundSensor = 1,
    /// Canopy strip on the umbrella that catches wind.
    UmbrellaSensor = 2,
    /// Circular detection range of an attacking bird.
    SightSensor = 3,
}

impl FixtureRole {
    fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(FixtureRole::Body),
            1 => Some(FixtureRole::GroundSensor),
            2 => Some(FixtureRole::UmbrellaSensor),
            3 => Some(FixtureRole::SightSensor),
            _ => None,
        }
    }
}

/// Stable identity of one collider: owning object, role, and position in the
/// object's fixture list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixtureId {
    pub object: ObjectId,
    pub role: FixtureRole,
    pub index: u16,
}

impl FixtureId {
    /// Pack into the 128-bit collider user data.
    /// Layout: `[0..32)` slot index, `[32..64)` generation, `[64..72)` role, `[72..88)` fixture index.
    pub fn to_bits(self) -> u128 {
        self.object.index as u128
            | (self.object.generation as u128) << 32
            | (self.role as u8 as u128) << 64
            | (self.index as u128) << 72
    }

    pub fn from_bits(bits: u128) -> Option<Self> {
        let role = FixtureRole::from_u8((bits >> 64) as u8)?;
        Some(Self {
            object: ObjectId::new(bits as u32, (bits >> 32) as u32),
            role,
            index: (bits >> 72) as u16,
        })
    }
}

/// Gameplay notifications for the shell (sound cues, HUD flashes).
/// Collected during a frame and drained by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    PlayerDamaged { health: i32 },
    PlayerKilled,
    LevelCompleted,
    LevelFailed,
    UmbrellaToggled { open: bool },
    LighterFired,
    BirdSpotted { bird: ObjectId },
    BirdHatched { nest: ObjectId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_bits_round_trip() {
        let id = FixtureId {
            object: ObjectId::new(7, 3),
            role: FixtureRole::SightSensor,
            index: 2,
        };
        assert_eq!(FixtureId::from_bits(id.to_bits()), Some(id));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let bits = 9u128 << 64;
        assert_eq!(FixtureId::from_bits(bits), None);
    }
}
