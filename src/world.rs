use crate::presenter::{present, Presentation};
use crate::state::{ShipId, State};

/// The current snapshot and what it looks like from our ship.
///
/// Owned by the main loop. Each snapshot replaces the previous one in full.
#[derive(Debug, Default)]
pub struct WorldState {
    state: State,
    presentation: Presentation,
    /// Number of snapshots received so far.
    num_snapshots: u64,
}
impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new snapshot and log its range transitions.
    pub fn replace(&mut self, state: State, self_id: ShipId) -> &Presentation {
        let presentation = present(&state, self_id);

        for id in presentation.unexpected_new_in_range.iter() {
            log::warn!("Server reported {} as new in range, but not as in range.", id);
        }
        for event in presentation.events.iter() {
            log::info!("{}", event);
        }
        if presentation.is_empty() && !state.is_empty() {
            log::debug!("Ship {} is not in the snapshot. Nothing to draw...", self_id);
        }

        self.state = state;
        self.presentation = presentation;
        self.num_snapshots += 1;

        &self.presentation
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn num_ships(&self) -> usize {
        self.state.len()
    }

    pub fn num_snapshots(&self) -> u64 {
        self.num_snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace() {
        let mut world = WorldState::new();
        assert!(world.presentation().is_empty());
        assert_eq!(world.num_ships(), 0);

        let first: State = serde_json::from_str(
            r#"{"ship_1000": {"Owner": 1000, "Position": {"X": 1}, "InRange": [2], "NewInRange": [2]},
                "ship_2": {"Owner": 2, "Position": {"X": 5}}}"#,
        )
        .unwrap();
        let presentation = world.replace(first.clone(), 1000).clone();
        assert_eq!(presentation.in_range.len(), 1);
        assert_eq!(world.num_ships(), 2);

        // Same snapshot, same result.
        assert_eq!(world.replace(first, 1000), &presentation);

        // Nothing carries over from the previous snapshot.
        let second: State =
            serde_json::from_str(r#"{"ship_3": {"Owner": 3, "Position": {"X": 5}}}"#).unwrap();
        assert!(world.replace(second, 1000).is_empty());
        assert_eq!(world.num_ships(), 1);
        assert_eq!(world.num_snapshots(), 3);
        assert!(world.state().ships.contains_key("ship_3"));
    }
}
