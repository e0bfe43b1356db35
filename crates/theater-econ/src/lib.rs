#![deny(warnings)]

//! Economic core for Theater Tycoon: contract pricing, performance
//! settlement, production staging, and the year-skip rights sale.
//!
//! All randomness is drawn from an injected `rand::Rng` so outcomes are
//! reproducible under a fixed seed. A settlement performs exactly three
//! uniform draws, in order: unexpected expenses, the fate roll, and the
//! revenue multiplier.

use rand::Rng;
use serde::{Deserialize, Serialize};
use theater_core::{
    Actor, ActorId, CastMember, GameState, Performance, PerformanceId, Plot, PlotId, StoreError,
    TheaterStore,
};
use thiserror::Error;
use tracing::{info, warn};

/// Flat contract base, before rank/experience/award bonuses.
pub const BASE_CONTRACT: i64 = 30_000;
/// Contract increment per rank step.
pub const RANK_STEP: i64 = 10_000;
/// Contract increment per year of experience.
pub const EXPERIENCE_STEP: i64 = 2_000;
/// Contract increment per award.
pub const AWARD_STEP: i64 = 5_000;

/// Errors produced by the economic core.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    #[error("performance {0:?} not found")]
    PerformanceNotFound(PerformanceId),
    /// A performance settles exactly once.
    #[error("performance {0:?} is already completed")]
    AlreadyCompleted(PerformanceId),
    #[error("plot {0:?} not found")]
    PlotNotFound(PlotId),
    #[error("insufficient capital: have {have}, need {need}")]
    InsufficientCapital { have: i64, need: i64 },
    #[error("budget {budget} is below the plot minimum {minimum}")]
    BudgetBelowMinimum { budget: i64, minimum: i64 },
    /// Propagated storage failure; the in-memory computation is discarded.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Structured contract quote for one actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Base contract: flat base plus rank, experience, and award bonuses.
    pub contract: i64,
    /// Signing premium, one fifth of the contract.
    pub premium: i64,
    /// Contract plus premium.
    pub total: i64,
}

/// Quote an actor's contract.
///
/// Strictly increasing in rank index, experience, and award count:
///
/// `contract = 30_000 + rank_index * 10_000 + experience * 2_000 + awards * 5_000`
pub fn contract_cost(actor: &Actor) -> CostBreakdown {
    let contract = BASE_CONTRACT
        + actor.rank.index() as i64 * RANK_STEP
        + actor.experience as i64 * EXPERIENCE_STEP
        + actor.awards_count as i64 * AWARD_STEP;
    let premium = contract / 5;
    CostBreakdown {
        contract,
        premium,
        total: contract + premium,
    }
}

/// How a performance landed with its audience.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeTier {
    /// Revenue multiplier 0.4..0.7 (0.3..0.5 with a non-compliant cast).
    Failure,
    /// Revenue multiplier 0.7..1.0.
    Normal,
    /// Revenue multiplier 1.0..1.4.
    Success,
}

/// Pure financial outcome of a settlement, before persistence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub revenue: i64,
    pub total_expenses: i64,
    pub saved_budget: i64,
    pub unexpected_expenses: i64,
    pub profit: i64,
    pub tier: OutcomeTier,
    /// Whether every constrained cast slot met its minimum rank.
    pub compliant: bool,
}

/// Full settlement result returned to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub revenue: i64,
    /// Actual budget plus unexpected expenses; persisted as the budget.
    pub total_expenses: i64,
    pub original_budget: i64,
    /// Budget slack returned to capital, never negative.
    pub saved_budget: i64,
    pub profit: i64,
    pub unexpected_expenses: i64,
    pub tier: OutcomeTier,
    pub compliant: bool,
    /// Top cast members decorated this season (pre-award snapshots).
    pub awarded: Vec<Actor>,
    /// Actor promoted one rank, when the profit share warranted it.
    pub promoted: Option<ActorId>,
}

/// Result of skipping a season by selling staging rights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSkip {
    pub year: i32,
    pub capital: i64,
    pub rights_sale: i64,
}

/// Check each constrained cast slot against its minimum rank. The first
/// violation ends the scan; a short cast leaves trailing requirements
/// unchecked. Soft rule: the result only worsens the failure odds.
fn cast_is_compliant(plot: &Plot, cast: &[CastMember]) -> bool {
    for (member, &required) in cast.iter().zip(plot.required_ranks.iter()) {
        if member.actor.rank.index() < required.index() {
            warn!(
                actor = %member.actor.last_name,
                rank = %member.actor.rank,
                required = %required,
                "cast member below required rank"
            );
            return false;
        }
    }
    true
}

/// Compute the financial outcome of one performance.
///
/// `cast` must be ordered by contract cost descending; slot i of the plot's
/// required ranks constrains the i-th entry. Exactly three uniform draws are
/// taken from `rng`, so a fixed seed reproduces the outcome.
pub fn compute_settlement<R: Rng>(
    plot: &Plot,
    budget: i64,
    cast: &[CastMember],
    rng: &mut R,
) -> Outcome {
    let total_cost: i64 =
        plot.production_cost + cast.iter().map(|m| m.contract_cost).sum::<i64>();
    let actual_budget = budget.min(total_cost);
    let saved_budget = budget - actual_budget;

    let base_revenue = actual_budget as f64 * (0.7 + 0.08 * plot.demand as f64);
    let unexpected_expenses = (actual_budget as f64 * rng.gen_range(0.05..0.15)) as i64;

    let compliant = cast_is_compliant(plot, cast);

    let bonus: f64 = cast
        .iter()
        .map(|m| {
            let rank_multiplier = 1.0 + 0.15 * m.actor.rank.index() as f64;
            let merit = 1.0
                + 0.05 * m.actor.awards_count as f64
                + 0.01 * m.actor.experience as f64;
            m.contract_cost as f64 * rank_multiplier * merit
        })
        .sum();

    let fate: f64 = rng.gen();
    let fail_chance = if compliant { 0.4 } else { 0.6 };
    let (tier, multiplier) = if fate < fail_chance {
        let m = if compliant {
            rng.gen_range(0.4..0.7)
        } else {
            rng.gen_range(0.3..0.5)
        };
        (OutcomeTier::Failure, m)
    } else if fate < 0.9 {
        (OutcomeTier::Normal, rng.gen_range(0.7..1.0))
    } else {
        (OutcomeTier::Success, rng.gen_range(1.0..1.4))
    };

    let revenue = ((base_revenue + bonus) * multiplier) as i64;
    let total_expenses = actual_budget + unexpected_expenses;

    Outcome {
        revenue,
        total_expenses,
        saved_budget,
        unexpected_expenses,
        profit: revenue - total_expenses,
        tier,
        compliant,
    }
}

/// Order cast members best-first for award selection: by rank index, then
/// experience, then award count, all descending.
fn rank_cast_for_awards(cast: &[CastMember]) -> Vec<&CastMember> {
    let mut ordered: Vec<&CastMember> = cast.iter().collect();
    ordered.sort_by(|a, b| {
        (
            b.actor.rank.index(),
            b.actor.experience,
            b.actor.awards_count,
        )
            .cmp(&(
                a.actor.rank.index(),
                a.actor.experience,
                a.actor.awards_count,
            ))
    });
    ordered
}

/// Settle a pending performance: compute the outcome, persist it, advance
/// the season, and hand out awards and promotions on a profitable run.
///
/// Fails with `PerformanceNotFound`/`AlreadyCompleted` before any mutation.
pub fn settle_performance<S, R>(
    store: &mut S,
    rng: &mut R,
    id: PerformanceId,
) -> Result<Settlement, EconError>
where
    S: TheaterStore + ?Sized,
    R: Rng,
{
    let perf: Performance = store
        .performance(id)?
        .ok_or(EconError::PerformanceNotFound(id))?;
    if perf.completed {
        return Err(EconError::AlreadyCompleted(id));
    }
    let plot = store
        .plot(perf.plot_id)?
        .ok_or(EconError::PlotNotFound(perf.plot_id))?;
    let cast = store.cast(id)?;

    let outcome = compute_settlement(&plot, perf.budget, &cast, rng);
    info!(
        performance = id.0,
        unexpected = outcome.unexpected_expenses,
        tier = ?outcome.tier,
        revenue = outcome.revenue,
        "performance settled"
    );

    store.commit_settlement(id, outcome.revenue, outcome.total_expenses)?;

    let state = store.game_state()?;
    store.update_game_state(GameState {
        year: state.year + 1,
        capital: state.capital + outcome.revenue + outcome.saved_budget
            - outcome.unexpected_expenses,
    })?;

    let mut awarded = Vec::new();
    let mut promoted = None;
    if outcome.profit > 0 {
        let ordered = rank_cast_for_awards(&cast);
        for (i, member) in ordered.iter().take(3).enumerate() {
            store.award(member.actor.id)?;
            awarded.push(member.actor.clone());
            info!(actor = %member.actor.last_name, "awarded for a profitable season");
            if i == 0 && outcome.profit * 10 > outcome.total_expenses * 3 {
                store.promote(member.actor.id)?;
                promoted = Some(member.actor.id);
                info!(actor = %member.actor.last_name, "promoted one rank");
            }
        }
    }

    Ok(Settlement {
        revenue: outcome.revenue,
        total_expenses: outcome.total_expenses,
        original_budget: perf.budget,
        saved_budget: outcome.saved_budget,
        profit: outcome.profit,
        unexpected_expenses: outcome.unexpected_expenses,
        tier: outcome.tier,
        compliant: outcome.compliant,
        awarded,
        promoted,
    })
}

/// Stage a new pending performance, debiting its budget from capital.
pub fn stage_performance<S: TheaterStore + ?Sized>(
    store: &mut S,
    title: &str,
    plot_id: PlotId,
    year: i32,
    budget: i64,
) -> Result<PerformanceId, EconError> {
    let state = store.game_state()?;
    if state.capital < budget {
        return Err(EconError::InsufficientCapital {
            have: state.capital,
            need: budget,
        });
    }
    let plot = store.plot(plot_id)?.ok_or(EconError::PlotNotFound(plot_id))?;
    if budget < plot.minimum_budget {
        return Err(EconError::BudgetBelowMinimum {
            budget,
            minimum: plot.minimum_budget,
        });
    }
    let id = store.create_performance(title, plot_id, year, budget)?;
    store.update_game_state(GameState {
        year,
        capital: state.capital - budget,
    })?;
    info!(performance = id.0, title, year, budget, "performance staged");
    Ok(id)
}

/// Skip the season by selling staging rights: capital grows by a uniform
/// 10–20% draw, the year advances.
pub fn skip_year<S, R>(store: &mut S, rng: &mut R) -> Result<YearSkip, EconError>
where
    S: TheaterStore + ?Sized,
    R: Rng,
{
    let state = store.game_state()?;
    let rights_sale = (state.capital as f64 * rng.gen_range(0.1..0.2)) as i64;
    let next = GameState {
        year: state.year + 1,
        capital: state.capital + rights_sale,
    };
    store.update_game_state(next)?;
    info!(year = next.year, rights_sale, "season skipped, rights sold");
    Ok(YearSkip {
        year: next.year,
        capital: next.capital,
        rights_sale,
    })
}
