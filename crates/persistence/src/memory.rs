//! In-memory `TheaterStore` with JSON snapshot save/load.
//!
//! The store is the single source of truth for the simulation state; every
//! mutating call either applies fully or returns an error without touching
//! anything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use theater_core::{
    is_valid_text, validate_actor, validate_performance, validate_plot, Actor, ActorId,
    CastMember, GameState, Performance, PerformanceId, Plot, PlotId, StoreError, TheaterStore,
    ValidationError, MIN_REPERTOIRE, MIN_ROSTER,
};
use tracing::info;

use crate::sample;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CastRow {
    actor_id: ActorId,
    performance_id: PerformanceId,
    role: String,
    contract_cost: i64,
}

/// In-memory theater database.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryStore {
    actors: BTreeMap<i64, Actor>,
    plots: BTreeMap<i64, Plot>,
    performances: BTreeMap<i64, Performance>,
    cast: Vec<CastRow>,
    state: GameState,
    next_actor: i64,
    next_plot: i64,
    next_performance: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with the opening game state.
    pub fn new() -> Self {
        Self {
            actors: BTreeMap::new(),
            plots: BTreeMap::new(),
            performances: BTreeMap::new(),
            cast: Vec::new(),
            state: sample::GAME_STATE,
            next_actor: 1,
            next_plot: 1,
            next_performance: 1,
        }
    }

    /// Store seeded with the sample company.
    pub fn with_sample_company() -> Self {
        let mut store = Self::new();
        store.reset_to_sample();
        store
    }

    /// Drop all records and reseed the sample company.
    pub fn reset_to_sample(&mut self) {
        self.actors = sample::actors().into_iter().map(|a| (a.id.0, a)).collect();
        self.plots = sample::plots().into_iter().map(|p| (p.id.0, p)).collect();
        self.performances = sample::performances()
            .into_iter()
            .map(|p| (p.id.0, p))
            .collect();
        self.cast = sample::cast_assignments()
            .into_iter()
            .map(|(actor_id, performance_id, role, contract_cost)| CastRow {
                actor_id,
                performance_id,
                role: role.to_string(),
                contract_cost,
            })
            .collect();
        self.state = sample::GAME_STATE;
        self.next_actor = self.actors.keys().max().copied().unwrap_or(0) + 1;
        self.next_plot = self.plots.keys().max().copied().unwrap_or(0) + 1;
        self.next_performance = self.performances.keys().max().copied().unwrap_or(0) + 1;
        info!("store reset to the sample company");
    }

    /// Serialize the whole store to pretty JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Restore a store from a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Write a JSON snapshot to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).map_err(|e| StoreError::Backend(e.to_string()))?;
        info!(path = %path.as_ref().display(), "snapshot saved");
        Ok(())
    }

    /// Load a JSON snapshot from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Self::from_json(&json)
    }

    fn pending_engagements(&self, id: ActorId) -> bool {
        self.cast.iter().any(|row| {
            row.actor_id == id
                && self
                    .performances
                    .get(&row.performance_id.0)
                    .map(|p| !p.completed)
                    .unwrap_or(false)
        })
    }
}

impl TheaterStore for MemoryStore {
    fn actors(&self) -> Result<Vec<Actor>, StoreError> {
        Ok(self.actors.values().cloned().collect())
    }

    fn actor(&self, id: ActorId) -> Result<Option<Actor>, StoreError> {
        Ok(self.actors.get(&id.0).cloned())
    }

    fn add_actor(&mut self, mut actor: Actor) -> Result<ActorId, StoreError> {
        validate_actor(&actor)?;
        actor.id = ActorId(self.next_actor);
        self.next_actor += 1;
        let id = actor.id;
        self.actors.insert(id.0, actor);
        Ok(id)
    }

    fn update_actor(&mut self, actor: &Actor) -> Result<(), StoreError> {
        validate_actor(actor)?;
        if !self.actors.contains_key(&actor.id.0) {
            return Err(StoreError::ActorNotFound(actor.id));
        }
        self.actors.insert(actor.id.0, actor.clone());
        Ok(())
    }

    fn delete_actor(&mut self, id: ActorId) -> Result<(), StoreError> {
        if !self.actors.contains_key(&id.0) {
            return Err(StoreError::ActorNotFound(id));
        }
        if self.pending_engagements(id) {
            return Err(StoreError::ActorEngaged(id));
        }
        if self.actors.len() <= MIN_ROSTER {
            return Err(StoreError::RosterMinimum(MIN_ROSTER));
        }
        // Only completed-performance rows remain for this actor here.
        self.cast.retain(|row| row.actor_id != id);
        self.actors.remove(&id.0);
        Ok(())
    }

    fn award(&mut self, id: ActorId) -> Result<(), StoreError> {
        let actor = self
            .actors
            .get_mut(&id.0)
            .ok_or(StoreError::ActorNotFound(id))?;
        actor.awards_count += 1;
        Ok(())
    }

    fn promote(&mut self, id: ActorId) -> Result<(), StoreError> {
        let actor = self
            .actors
            .get_mut(&id.0)
            .ok_or(StoreError::ActorNotFound(id))?;
        match actor.rank.next() {
            Some(next) => actor.rank = next,
            None => info!(actor = %actor.last_name, "already at the top rank"),
        }
        Ok(())
    }

    fn plots(&self) -> Result<Vec<Plot>, StoreError> {
        let mut plots: Vec<Plot> = self.plots.values().cloned().collect();
        plots.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(plots)
    }

    fn plot(&self, id: PlotId) -> Result<Option<Plot>, StoreError> {
        Ok(self.plots.get(&id.0).cloned())
    }

    fn add_plot(&mut self, mut plot: Plot) -> Result<PlotId, StoreError> {
        validate_plot(&plot)?;
        plot.id = PlotId(self.next_plot);
        self.next_plot += 1;
        let id = plot.id;
        self.plots.insert(id.0, plot);
        Ok(id)
    }

    fn update_plot(&mut self, plot: &Plot) -> Result<(), StoreError> {
        validate_plot(plot)?;
        if !self.plots.contains_key(&plot.id.0) {
            return Err(StoreError::PlotNotFound(plot.id));
        }
        self.plots.insert(plot.id.0, plot.clone());
        Ok(())
    }

    fn delete_plot(&mut self, id: PlotId) -> Result<(), StoreError> {
        if !self.plots.contains_key(&id.0) {
            return Err(StoreError::PlotNotFound(id));
        }
        if self.performances.values().any(|p| p.plot_id == id) {
            return Err(StoreError::PlotInUse(id));
        }
        if self.plots.len() <= MIN_REPERTOIRE {
            return Err(StoreError::RepertoireMinimum(MIN_REPERTOIRE));
        }
        self.plots.remove(&id.0);
        Ok(())
    }

    fn performances(&self) -> Result<Vec<Performance>, StoreError> {
        let mut all: Vec<Performance> = self.performances.values().cloned().collect();
        all.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(all)
    }

    fn performance(&self, id: PerformanceId) -> Result<Option<Performance>, StoreError> {
        Ok(self.performances.get(&id.0).cloned())
    }

    fn create_performance(
        &mut self,
        title: &str,
        plot_id: PlotId,
        year: i32,
        budget: i64,
    ) -> Result<PerformanceId, StoreError> {
        if !self.plots.contains_key(&plot_id.0) {
            return Err(StoreError::PlotNotFound(plot_id));
        }
        if self.performances.values().any(|p| p.year == year) {
            return Err(StoreError::YearTaken(year));
        }
        let perf = Performance {
            id: PerformanceId(self.next_performance),
            title: title.to_string(),
            plot_id,
            year,
            budget,
            revenue: 0,
            completed: false,
        };
        validate_performance(&perf)?;
        self.next_performance += 1;
        let id = perf.id;
        self.performances.insert(id.0, perf);
        Ok(id)
    }

    fn cast(&self, id: PerformanceId) -> Result<Vec<CastMember>, StoreError> {
        let mut members: Vec<CastMember> = self
            .cast
            .iter()
            .filter(|row| row.performance_id == id)
            .filter_map(|row| {
                self.actors.get(&row.actor_id.0).map(|actor| CastMember {
                    actor: actor.clone(),
                    role: row.role.clone(),
                    contract_cost: row.contract_cost,
                })
            })
            .collect();
        members.sort_by(|a, b| b.contract_cost.cmp(&a.contract_cost));
        Ok(members)
    }

    fn assign_role(
        &mut self,
        actor_id: ActorId,
        performance_id: PerformanceId,
        role: &str,
        contract_cost: i64,
    ) -> Result<(), StoreError> {
        if !self.actors.contains_key(&actor_id.0) {
            return Err(StoreError::ActorNotFound(actor_id));
        }
        if !self.performances.contains_key(&performance_id.0) {
            return Err(StoreError::PerformanceNotFound(performance_id));
        }
        if !is_valid_text(role) {
            return Err(ValidationError::InvalidText(role.to_string()).into());
        }
        if contract_cost <= 0 {
            return Err(ValidationError::NonPositiveMoney.into());
        }
        if self
            .cast
            .iter()
            .any(|row| row.actor_id == actor_id && row.performance_id == performance_id)
        {
            return Err(StoreError::DuplicateCasting(actor_id, performance_id));
        }
        self.cast.push(CastRow {
            actor_id,
            performance_id,
            role: role.to_string(),
            contract_cost,
        });
        Ok(())
    }

    fn commit_settlement(
        &mut self,
        id: PerformanceId,
        revenue: i64,
        total_expenses: i64,
    ) -> Result<(), StoreError> {
        let perf = self
            .performances
            .get_mut(&id.0)
            .ok_or(StoreError::PerformanceNotFound(id))?;
        perf.revenue = revenue;
        perf.budget = total_expenses;
        perf.completed = true;
        let cast_ids: Vec<i64> = self
            .cast
            .iter()
            .filter(|row| row.performance_id == id)
            .map(|row| row.actor_id.0)
            .collect();
        for actor_id in cast_ids {
            if let Some(actor) = self.actors.get_mut(&actor_id) {
                actor.experience += 1;
            }
        }
        Ok(())
    }

    fn game_state(&self) -> Result<GameState, StoreError> {
        Ok(self.state)
    }

    fn update_game_state(&mut self, state: GameState) -> Result<(), StoreError> {
        self.state = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use theater_core::Rank;

    #[test]
    fn sample_company_shape() {
        let store = MemoryStore::with_sample_company();
        assert_eq!(store.actors().unwrap().len(), 10);
        assert_eq!(store.plots().unwrap().len(), 10);
        let history = store.performances().unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|p| p.completed));
        // Newest season first.
        assert_eq!(history[0].year, 2024);
        assert_eq!(store.game_state().unwrap(), sample::GAME_STATE);
        // Cast listings come back most expensive first.
        let cast = store.cast(PerformanceId(2)).unwrap();
        assert_eq!(cast.len(), 8);
        assert!(cast.windows(2).all(|w| w[0].contract_cost >= w[1].contract_cost));
        assert_eq!(cast[0].role, "Hamlet");
    }

    #[test]
    fn referenced_plot_cannot_be_deleted() {
        let mut store = MemoryStore::with_sample_company();
        // Plot 1 backs the 2022 season.
        assert_eq!(
            store.delete_plot(PlotId(1)),
            Err(StoreError::PlotInUse(PlotId(1)))
        );
        assert!(store.plot(PlotId(1)).unwrap().is_some());
        // Plot 10 is unreferenced and the repertoire is above the floor.
        store.delete_plot(PlotId(10)).unwrap();
        assert!(store.plot(PlotId(10)).unwrap().is_none());
    }

    #[test]
    fn repertoire_floor_is_enforced() {
        let mut store = MemoryStore::with_sample_company();
        // Unreferenced plots: 4..=10. Dropping to the floor of five is fine.
        for id in [4, 5, 6, 7, 8] {
            store.delete_plot(PlotId(id)).unwrap();
        }
        assert_eq!(
            store.delete_plot(PlotId(9)),
            Err(StoreError::RepertoireMinimum(5))
        );
    }

    #[test]
    fn roster_guards() {
        let mut store = MemoryStore::with_sample_company();
        store
            .create_performance("Masquerade Night", PlotId(10), 2025, 700_000)
            .unwrap();
        store
            .assign_role(ActorId(3), PerformanceId(4), "Arbenin", 140_000)
            .unwrap();
        // Engaged in a pending performance.
        assert_eq!(
            store.delete_actor(ActorId(3)),
            Err(StoreError::ActorEngaged(ActorId(3)))
        );
        // Free actors can go until the roster sits at the floor of eight.
        store.delete_actor(ActorId(10)).unwrap();
        store.delete_actor(ActorId(5)).unwrap();
        assert_eq!(
            store.delete_actor(ActorId(7)),
            Err(StoreError::RosterMinimum(8))
        );
    }

    #[test]
    fn duplicate_casting_and_year_collisions_are_rejected() {
        let mut store = MemoryStore::with_sample_company();
        let id = store
            .create_performance("Vanya Again", PlotId(9), 2025, 450_000)
            .unwrap();
        store.assign_role(ActorId(1), id, "Vanya", 90_000).unwrap();
        assert_eq!(
            store.assign_role(ActorId(1), id, "Astrov", 80_000),
            Err(StoreError::DuplicateCasting(ActorId(1), id))
        );
        assert_eq!(
            store.create_performance("Twice in a Year", PlotId(9), 2025, 450_000),
            Err(StoreError::YearTaken(2025))
        );
    }

    #[test]
    fn promote_caps_at_the_top_rank() {
        let mut store = MemoryStore::with_sample_company();
        // Actor 3 is already a People's Artist.
        store.promote(ActorId(3)).unwrap();
        assert_eq!(store.actor(ActorId(3)).unwrap().unwrap().rank, Rank::Peoples);
        store.promote(ActorId(1)).unwrap();
        assert_eq!(store.actor(ActorId(1)).unwrap().unwrap().rank, Rank::Master);
    }

    #[test]
    fn updates_replace_records_and_validate() {
        let mut store = MemoryStore::with_sample_company();
        let mut actor = store.actor(ActorId(6)).unwrap().unwrap();
        actor.rank = Rank::Regular;
        actor.experience = 3;
        store.update_actor(&actor).unwrap();
        assert_eq!(store.actor(ActorId(6)).unwrap().unwrap(), actor);

        let mut plot = store.plot(PlotId(9)).unwrap().unwrap();
        plot.demand = 11;
        assert!(matches!(
            store.update_plot(&plot),
            Err(StoreError::Validation(_))
        ));
        plot.demand = 8;
        store.update_plot(&plot).unwrap();
        assert_eq!(store.plot(PlotId(9)).unwrap().unwrap().demand, 8);

        let ghost = Actor {
            id: ActorId(404),
            ..store.actor(ActorId(1)).unwrap().unwrap()
        };
        assert_eq!(
            store.update_actor(&ghost),
            Err(StoreError::ActorNotFound(ActorId(404)))
        );
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut store = MemoryStore::with_sample_company();
        store
            .update_game_state(GameState {
                year: 2030,
                capital: 2_345_678,
            })
            .unwrap();
        let json = store.to_json().unwrap();
        let back = MemoryStore::from_json(&json).unwrap();
        assert_eq!(back.game_state().unwrap(), store.game_state().unwrap());
        assert_eq!(back.actors().unwrap(), store.actors().unwrap());
        assert_eq!(back.performances().unwrap(), store.performances().unwrap());
    }

    proptest! {
        #[test]
        fn added_actors_roundtrip(first in "[A-Za-z]{1,20}", last in "[A-Za-z]{1,20}",
                                  awards in 0u32..20, exp in 0u32..30) {
            let mut store = MemoryStore::new();
            let id = store.add_actor(Actor {
                id: ActorId(0),
                first_name: first.clone(),
                last_name: last.clone(),
                rank: Rank::Regular,
                awards_count: awards,
                experience: exp,
            }).unwrap();
            let back = store.actor(id).unwrap().unwrap();
            prop_assert_eq!(back.first_name, first);
            prop_assert_eq!(back.last_name, last);
            prop_assert_eq!(back.awards_count, awards);
            prop_assert_eq!(back.experience, exp);
        }
    }
}
