#![deny(warnings)]

//! Core domain models and invariants for Theater Tycoon.
//!
//! This crate defines serializable types used across the simulation with
//! validation helpers to guarantee basic invariants, plus the `TheaterStore`
//! trait the economic core uses to talk to a persistence backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub i64);

/// Unique identifier for a plot (reusable show template).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlotId(pub i64);

/// Unique identifier for a performance (one staged production).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PerformanceId(pub i64);

/// Actor seniority tier, six levels from Beginner to People's Artist.
///
/// The declaration order is the promotion order; `index` is used by contract
/// pricing and by the settlement compliance check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Beginner,
    Regular,
    Lead,
    Master,
    Honored,
    Peoples,
}

impl Rank {
    /// All ranks in ascending seniority order.
    pub const ALL: [Rank; 6] = [
        Rank::Beginner,
        Rank::Regular,
        Rank::Lead,
        Rank::Master,
        Rank::Honored,
        Rank::Peoples,
    ];

    /// Zero-based position in the seniority order.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    /// The next rank up, or `None` at the top of the ladder.
    pub fn next(self) -> Option<Rank> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Parse a display name back into a rank.
    pub fn from_name(name: &str) -> Option<Rank> {
        Self::ALL.iter().copied().find(|r| r.to_string() == name)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::Beginner => "Beginner",
            Rank::Regular => "Regular",
            Rank::Lead => "Lead",
            Rank::Master => "Master",
            Rank::Honored => "Honored",
            Rank::Peoples => "People's",
        };
        f.write_str(s)
    }
}

/// A member of the theater troupe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub first_name: String,
    pub last_name: String,
    /// Current seniority tier.
    pub rank: Rank,
    /// Lifetime award count.
    pub awards_count: u32,
    /// Years on stage.
    pub experience: u32,
}

/// A reusable show template defining cost, role, and demand parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: PlotId,
    pub title: String,
    /// Smallest budget a production of this plot may be staged with.
    pub minimum_budget: i64,
    /// Fixed cost of mounting the production, before contracts.
    pub production_cost: i64,
    /// Number of roles in the script.
    pub roles_count: u32,
    /// Audience demand score, 1..=10.
    pub demand: u8,
    /// Per-slot minimum ranks; slot i constrains the i-th most expensive
    /// cast member. May be shorter than `roles_count`.
    pub required_ranks: Vec<Rank>,
}

/// One staged production of a plot in a given year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub id: PerformanceId,
    pub title: String,
    pub plot_id: PlotId,
    pub year: i32,
    /// Allocated budget while pending; total expenses once settled.
    pub budget: i64,
    /// Box-office revenue, set by settlement.
    pub revenue: i64,
    /// A performance settles exactly once.
    pub completed: bool,
}

/// An actor attached to a performance with a role and a contract fixed at
/// assignment time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub actor: Actor,
    pub role: String,
    pub contract_cost: i64,
}

/// Singleton game state: the current season year and the theater's capital.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub year: i32,
    pub capital: i64,
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Year outside supported range [2022, 2100].
    #[error("year {0} is out of supported range [2022, 2100]")]
    YearOutOfRange(i32),
    /// Names and titles must be non-empty alphanumeric text up to 100 chars.
    #[error("invalid text field: {0:?}")]
    InvalidText(String),
    /// Budgets and costs must be strictly positive.
    #[error("monetary value must be > 0")]
    NonPositiveMoney,
    /// Demand score must be within 1..=10.
    #[error("demand must be within 1..=10")]
    DemandOutOfRange,
    /// A plot needs at least one role.
    #[error("a plot must have at least one role")]
    NoRoles,
    /// More rank requirements than roles.
    #[error("required ranks ({got}) exceed role count ({roles})")]
    TooManyRankRequirements { got: usize, roles: usize },
}

/// Text rule shared by names, titles, and roles: letters, digits, and
/// whitespace only, at most 100 characters.
pub fn is_valid_text(text: &str) -> bool {
    !text.trim().is_empty()
        && text.chars().count() <= 100
        && text.chars().all(|c| c.is_alphanumeric() || c.is_whitespace())
}

fn validate_text(text: &str) -> Result<(), ValidationError> {
    if is_valid_text(text) {
        Ok(())
    } else {
        Err(ValidationError::InvalidText(text.to_string()))
    }
}

/// Validate an actor record.
pub fn validate_actor(actor: &Actor) -> Result<(), ValidationError> {
    validate_text(&actor.first_name)?;
    validate_text(&actor.last_name)?;
    Ok(())
}

/// Validate a plot template.
pub fn validate_plot(plot: &Plot) -> Result<(), ValidationError> {
    validate_text(&plot.title)?;
    if plot.minimum_budget <= 0 || plot.production_cost <= 0 {
        return Err(ValidationError::NonPositiveMoney);
    }
    if plot.roles_count == 0 {
        return Err(ValidationError::NoRoles);
    }
    if !(1..=10).contains(&plot.demand) {
        return Err(ValidationError::DemandOutOfRange);
    }
    if plot.required_ranks.len() > plot.roles_count as usize {
        return Err(ValidationError::TooManyRankRequirements {
            got: plot.required_ranks.len(),
            roles: plot.roles_count as usize,
        });
    }
    Ok(())
}

/// Validate a performance record.
pub fn validate_performance(perf: &Performance) -> Result<(), ValidationError> {
    validate_text(&perf.title)?;
    if !(2022..=2100).contains(&perf.year) {
        return Err(ValidationError::YearOutOfRange(perf.year));
    }
    if perf.budget <= 0 {
        return Err(ValidationError::NonPositiveMoney);
    }
    Ok(())
}

/// Errors surfaced by `TheaterStore` implementations.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("actor {0:?} not found")]
    ActorNotFound(ActorId),
    #[error("plot {0:?} not found")]
    PlotNotFound(PlotId),
    #[error("performance {0:?} not found")]
    PerformanceNotFound(PerformanceId),
    /// The plot is referenced by at least one performance.
    #[error("plot {0:?} is in use by staged performances")]
    PlotInUse(PlotId),
    /// The actor is cast in a pending performance.
    #[error("actor {0:?} is engaged in a pending performance")]
    ActorEngaged(ActorId),
    /// The roster may not shrink below its floor.
    #[error("roster may not drop below {0} actors")]
    RosterMinimum(usize),
    /// The repertoire may not shrink below its floor.
    #[error("repertoire may not drop below {0} plots")]
    RepertoireMinimum(usize),
    /// An actor may hold only one role per performance.
    #[error("actor {0:?} is already cast in performance {1:?}")]
    DuplicateCasting(ActorId, PerformanceId),
    /// Only one performance may be staged per year.
    #[error("a performance is already staged for year {0}")]
    YearTaken(i32),
    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),
    /// Backend failure (I/O, SQL). The attempted write is rolled back.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Smallest roster a company keeps on payroll.
pub const MIN_ROSTER: usize = 8;
/// Smallest repertoire a company keeps licensed.
pub const MIN_REPERTOIRE: usize = 5;

/// Persistence collaborator consumed by the economic core.
///
/// Implementations serialize their own operations; each method either
/// commits fully or fails without partial state. Cast listings are ordered
/// by contract cost descending, which is the slot order the settlement
/// compliance check uses.
pub trait TheaterStore {
    fn actors(&self) -> Result<Vec<Actor>, StoreError>;
    fn actor(&self, id: ActorId) -> Result<Option<Actor>, StoreError>;
    fn add_actor(&mut self, actor: Actor) -> Result<ActorId, StoreError>;
    fn update_actor(&mut self, actor: &Actor) -> Result<(), StoreError>;
    /// Remove an actor, detaching completed-performance cast rows first.
    /// Fails while the actor is engaged in a pending performance or the
    /// roster is at its floor.
    fn delete_actor(&mut self, id: ActorId) -> Result<(), StoreError>;
    /// Increment the award count.
    fn award(&mut self, id: ActorId) -> Result<(), StoreError>;
    /// Promote one rank; a no-op at the top of the ladder.
    fn promote(&mut self, id: ActorId) -> Result<(), StoreError>;

    fn plots(&self) -> Result<Vec<Plot>, StoreError>;
    fn plot(&self, id: PlotId) -> Result<Option<Plot>, StoreError>;
    fn add_plot(&mut self, plot: Plot) -> Result<PlotId, StoreError>;
    fn update_plot(&mut self, plot: &Plot) -> Result<(), StoreError>;
    /// Remove a plot. Fails while any performance references it or the
    /// repertoire is at its floor.
    fn delete_plot(&mut self, id: PlotId) -> Result<(), StoreError>;

    /// All performances, newest year first.
    fn performances(&self) -> Result<Vec<Performance>, StoreError>;
    fn performance(&self, id: PerformanceId) -> Result<Option<Performance>, StoreError>;
    /// Create a pending performance.
    fn create_performance(
        &mut self,
        title: &str,
        plot_id: PlotId,
        year: i32,
        budget: i64,
    ) -> Result<PerformanceId, StoreError>;
    /// Cast of a performance, contract cost descending.
    fn cast(&self, id: PerformanceId) -> Result<Vec<CastMember>, StoreError>;
    fn assign_role(
        &mut self,
        actor_id: ActorId,
        performance_id: PerformanceId,
        role: &str,
        contract_cost: i64,
    ) -> Result<(), StoreError>;

    /// Atomically finish a performance: set revenue, overwrite the budget
    /// with the total expenses, flip the completed flag, and add one year of
    /// experience to every cast member.
    fn commit_settlement(
        &mut self,
        id: PerformanceId,
        revenue: i64,
        total_expenses: i64,
    ) -> Result<(), StoreError>;

    fn game_state(&self) -> Result<GameState, StoreError>;
    fn update_game_state(&mut self, state: GameState) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plot(required: Vec<Rank>) -> Plot {
        Plot {
            id: PlotId(1),
            title: "The Seagull".to_string(),
            minimum_budget: 400_000,
            production_cost: 250_000,
            roles_count: 5,
            demand: 7,
            required_ranks: required,
        }
    }

    #[test]
    fn rank_order_is_total_and_promotable() {
        assert!(Rank::Beginner < Rank::Regular);
        assert!(Rank::Honored < Rank::Peoples);
        assert_eq!(Rank::Beginner.index(), 0);
        assert_eq!(Rank::Peoples.index(), 5);
        assert_eq!(Rank::Honored.next(), Some(Rank::Peoples));
        assert_eq!(Rank::Peoples.next(), None);
    }

    #[test]
    fn rank_display_roundtrip() {
        for rank in Rank::ALL {
            assert_eq!(Rank::from_name(&rank.to_string()), Some(rank));
        }
        assert_eq!(Rank::from_name("Understudy"), None);
    }

    #[test]
    fn serde_roundtrip_plot() {
        let p = plot(vec![Rank::Regular, Rank::Lead]);
        let s = serde_json::to_string(&p).unwrap();
        let back: Plot = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn plot_validation_rejects_bad_fields() {
        assert!(validate_plot(&plot(vec![])).is_ok());
        let mut p = plot(vec![]);
        p.demand = 11;
        assert_eq!(validate_plot(&p), Err(ValidationError::DemandOutOfRange));
        let mut p = plot(vec![]);
        p.production_cost = 0;
        assert_eq!(validate_plot(&p), Err(ValidationError::NonPositiveMoney));
        let mut p = plot(vec![Rank::Beginner; 6]);
        p.roles_count = 5;
        assert!(matches!(
            validate_plot(&p),
            Err(ValidationError::TooManyRankRequirements { got: 6, roles: 5 })
        ));
    }

    #[test]
    fn performance_year_range() {
        let perf = Performance {
            id: PerformanceId(1),
            title: "Hamlet Reloaded".to_string(),
            plot_id: PlotId(2),
            year: 2019,
            budget: 850_000,
            revenue: 0,
            completed: false,
        };
        assert_eq!(
            validate_performance(&perf),
            Err(ValidationError::YearOutOfRange(2019))
        );
    }

    proptest! {
        #[test]
        fn alphanumeric_text_is_valid(s in "[a-zA-Z0-9 ]{1,100}") {
            prop_assume!(!s.trim().is_empty());
            prop_assert!(is_valid_text(&s));
        }

        #[test]
        fn punctuated_text_is_rejected(s in "[a-z]{0,10}[!@#%&*_;:'\"<>/-][a-z]{0,10}") {
            prop_assert!(!is_valid_text(&s));
        }

        #[test]
        fn demand_in_range_validates(d in 1u8..=10) {
            let mut p = plot(vec![]);
            p.demand = d;
            prop_assert!(validate_plot(&p).is_ok());
        }
    }
}
