//! Sample company used to seed fresh databases and demos: a ten-actor
//! troupe, a ten-plot repertoire, and three completed historical seasons.

use theater_core::{Actor, ActorId, GameState, Performance, PerformanceId, Plot, PlotId, Rank};

/// Opening game state: season 2025 with one million in capital.
pub const GAME_STATE: GameState = GameState {
    year: 2025,
    capital: 1_000_000,
};

/// The troupe on payroll when a company is founded.
pub fn actors() -> Vec<Actor> {
    let rows: [(&str, &str, Rank, u32, u32); 10] = [
        ("Henry", "Archer", Rank::Lead, 3, 5),
        ("Margaret", "Bellamy", Rank::Honored, 5, 10),
        ("Eleanor", "Sinclair", Rank::Peoples, 8, 15),
        ("James", "Whitfield", Rank::Master, 4, 8),
        ("Kate", "Kessler", Rank::Regular, 2, 4),
        ("Daniel", "Morrow", Rank::Beginner, 0, 2),
        ("Olivia", "Navarro", Rank::Regular, 1, 3),
        ("Victor", "Sutton", Rank::Lead, 3, 7),
        ("Alice", "Prescott", Rank::Master, 5, 9),
        ("Simon", "Leblanc", Rank::Honored, 6, 12),
    ];
    rows.iter()
        .enumerate()
        .map(|(i, (first, last, rank, awards, exp))| Actor {
            id: ActorId(i as i64 + 1),
            first_name: (*first).to_string(),
            last_name: (*last).to_string(),
            rank: *rank,
            awards_count: *awards,
            experience: *exp,
        })
        .collect()
}

/// The licensed repertoire.
pub fn plots() -> Vec<Plot> {
    let rows: [(&str, i64, i64, u32, u8, &[Rank]); 10] = [
        (
            "Romeo and Juliet",
            500_000,
            350_000,
            6,
            8,
            &[Rank::Lead, Rank::Master],
        ),
        (
            "Hamlet",
            800_000,
            500_000,
            8,
            9,
            &[Rank::Master, Rank::Honored],
        ),
        (
            "The Seagull",
            400_000,
            250_000,
            5,
            7,
            &[Rank::Regular, Rank::Lead],
        ),
        (
            "The Cherry Orchard",
            600_000,
            400_000,
            7,
            8,
            &[Rank::Lead, Rank::Master],
        ),
        (
            "Three Sisters",
            550_000,
            350_000,
            6,
            7,
            &[Rank::Regular, Rank::Lead],
        ),
        (
            "Othello",
            700_000,
            450_000,
            7,
            9,
            &[Rank::Master, Rank::Honored],
        ),
        ("The Government Inspector", 450_000, 300_000, 6, 7, &[Rank::Lead]),
        (
            "Woe from Wit",
            500_000,
            350_000,
            7,
            8,
            &[Rank::Lead, Rank::Master],
        ),
        ("Uncle Vanya", 400_000, 250_000, 5, 6, &[Rank::Regular]),
        ("Masquerade", 650_000, 400_000, 8, 8, &[Rank::Master]),
    ];
    rows.iter()
        .enumerate()
        .map(
            |(i, (title, minimum_budget, production_cost, roles, demand, required))| Plot {
                id: PlotId(i as i64 + 1),
                title: (*title).to_string(),
                minimum_budget: *minimum_budget,
                production_cost: *production_cost,
                roles_count: *roles,
                demand: *demand,
                required_ranks: required.to_vec(),
            },
        )
        .collect()
}

/// Three completed seasons of history.
pub fn performances() -> Vec<Performance> {
    let rows: [(&str, i64, i32, i64, i64); 3] = [
        ("Romeo and Juliet Revisited", 1, 2022, 600_000, 950_000),
        ("Hamlet Reloaded", 2, 2023, 850_000, 1_200_000),
        ("The Seagull Over the Bay", 3, 2024, 500_000, 780_000),
    ];
    rows.iter()
        .enumerate()
        .map(|(i, (title, plot, year, budget, revenue))| Performance {
            id: PerformanceId(i as i64 + 1),
            title: (*title).to_string(),
            plot_id: PlotId(*plot),
            year: *year,
            budget: *budget,
            revenue: *revenue,
            completed: true,
        })
        .collect()
}

/// Cast of the historical seasons: (actor, performance, role, contract).
pub fn cast_assignments() -> Vec<(ActorId, PerformanceId, &'static str, i64)> {
    let rows: [(i64, i64, &'static str, i64); 19] = [
        (1, 1, "Romeo", 100_000),
        (5, 1, "Juliet", 90_000),
        (8, 1, "Mercutio", 80_000),
        (4, 1, "Tybalt", 70_000),
        (7, 1, "Nurse", 60_000),
        (6, 1, "Benvolio", 50_000),
        (2, 2, "Hamlet", 150_000),
        (9, 2, "Ophelia", 120_000),
        (8, 2, "Claudius", 110_000),
        (7, 2, "Gertrude", 100_000),
        (4, 2, "Polonius", 90_000),
        (6, 2, "Horatio", 80_000),
        (1, 2, "Laertes", 80_000),
        (5, 2, "Rosencrantz", 70_000),
        (3, 3, "Nina", 130_000),
        (2, 3, "Konstantin", 120_000),
        (9, 3, "Irina", 110_000),
        (4, 3, "Boris", 100_000),
        (7, 3, "Masha", 90_000),
    ];
    rows.iter()
        .map(|(a, p, role, cost)| (ActorId(*a), PerformanceId(*p), *role, *cost))
        .collect()
}
