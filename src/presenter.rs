//! Split the ships around our own ship by what its sensors see.
//!
//! The server already tracks range transitions per snapshot.
//! This only resolves ids to positions and picks how each ship is highlighted.

use crate::state::{ShipId, State, Vector3};
use ahash::AHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// Our own ship.
    Own,
    /// In range in this snapshot and the previous one.
    Steady,
    /// Entered range since the previous snapshot.
    NewInRange,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedShip {
    pub id: ShipId,
    pub position: Vector3,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeEvent {
    Entered(ShipId),
    Left(ShipId),
}
impl std::fmt::Display for RangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeEvent::Entered(id) => write!(f, "{} is new in range", id),
            RangeEvent::Left(id) => write!(f, "{} is gone from range", id),
        }
    }
}

/// What to draw and report for one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    /// `None` when our ship is not in the snapshot. Nothing else is set then.
    pub own: Option<RenderedShip>,
    /// Ships in sensor range, in the order the server listed them.
    pub in_range: Vec<RenderedShip>,
    /// Range transitions: entered first, then left.
    pub events: Vec<RangeEvent>,
    /// Ids the server reported as new in range without listing them in range.
    pub unexpected_new_in_range: Vec<ShipId>,
}
impl Presentation {
    pub fn is_empty(&self) -> bool {
        self.own.is_none()
    }

    /// Own ship first, then in range ships.
    pub fn ships(&self) -> impl Iterator<Item = &RenderedShip> {
        self.own.iter().chain(self.in_range.iter())
    }
}

/// Compute what `self_id`'s ship sees in `state`.
///
/// Pure: calling it again with the same snapshot gives the same result.
pub fn present(state: &State, self_id: ShipId) -> Presentation {
    let index = state.index_by_owner();

    let Some(own) = index.get(self_id) else {
        return Presentation::default();
    };

    let new_in_range: AHashSet<ShipId> = own.new_in_range.iter().copied().collect();
    let mut seen: AHashSet<ShipId> = AHashSet::with_capacity(own.in_range.len() + 1);
    seen.insert(self_id);

    let mut presentation = Presentation {
        own: Some(RenderedShip {
            id: self_id,
            position: own.position,
            highlight: Highlight::Own,
        }),
        in_range: Vec::with_capacity(own.in_range.len()),
        events: Vec::new(),
        unexpected_new_in_range: Vec::new(),
    };

    for &id in own.in_range.iter() {
        if !seen.insert(id) {
            continue;
        }

        let highlight = if new_in_range.contains(&id) {
            presentation.events.push(RangeEvent::Entered(id));
            Highlight::NewInRange
        } else {
            Highlight::Steady
        };

        // May have left the simulation between snapshots.
        if let Some(ship) = index.get(id) {
            presentation.in_range.push(RenderedShip {
                id,
                position: ship.position,
                highlight,
            });
        }
    }

    // Reported, but never drawn.
    let in_range: AHashSet<ShipId> = own.in_range.iter().copied().collect();
    let mut reported = AHashSet::new();
    for &id in own.new_in_range.iter() {
        if !in_range.contains(&id) && reported.insert(id) {
            presentation.events.push(RangeEvent::Entered(id));
            presentation.unexpected_new_in_range.push(id);
        }
    }

    let mut gone = AHashSet::new();
    presentation.events.extend(
        own.gone_from_range
            .iter()
            .filter(|id| gone.insert(**id))
            .map(|id| RangeEvent::Left(*id)),
    );

    presentation
}
