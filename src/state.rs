use ahash::AHashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Owner id of a ship. The self ship has the client's user id.
pub type ShipId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Vector3 {
    #[serde(rename(serialize = "x", deserialize = "X"), alias = "x", default)]
    pub x: f64,
    #[serde(rename(serialize = "y", deserialize = "Y"), alias = "y", default)]
    pub y: f64,
    #[serde(rename(serialize = "z", deserialize = "Z"), alias = "z", default)]
    pub z: f64,
}
impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One ship as seen in a single snapshot.
///
/// The range lists only describe transitions relative to the previous snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ShipData {
    pub owner: ShipId,
    #[serde(default)]
    pub position: Vector3,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub in_range: Vec<ShipId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub new_in_range: Vec<ShipId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gone_from_range: Vec<ShipId>,
}

/// The server writes empty lists as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ShipId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ShipId>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A full snapshot of the simulated world: ship name (eg. `ship_1000`) -> ship.
///
/// Never mutated after decoding. A new snapshot replaces the old one.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct State {
    pub ships: IndexMap<String, ShipData>,
}
impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Re-key the ships by owner id.
    ///
    /// If two ships share an owner, the one last in wire order wins.
    pub fn index_by_owner(&self) -> ShipIndex<'_> {
        let mut ships = AHashMap::with_capacity(self.ships.len());
        for (name, ship) in self.ships.iter() {
            if let Some(previous) = ships.insert(ship.owner, ship) {
                log::debug!(
                    "{} shares owner {} with another ship at {:?}. Keeping {}...",
                    name,
                    ship.owner,
                    previous.position,
                    name
                );
            }
        }
        ShipIndex { ships }
    }
}

/// Ships of a [`State`] keyed by owner id.
#[derive(Debug, Default)]
pub struct ShipIndex<'a> {
    ships: AHashMap<ShipId, &'a ShipData>,
}
impl<'a> ShipIndex<'a> {
    /// `None` if the ship does not exist in this snapshot.
    pub fn get(&self, id: ShipId) -> Option<&'a ShipData> {
        self.ships.get(&id).copied()
    }

    pub fn contains(&self, id: ShipId) -> bool {
        self.ships.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}
