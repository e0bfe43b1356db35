#![deny(warnings)]

//! Headless CLI driving a few seasons of the theater simulation: stage a
//! production from the repertoire, cast the troupe, settle the books, and
//! fall back to selling staging rights when nothing is affordable.

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use theater_core::{Plot, TheaterStore};
use theater_econ::{contract_cost, settle_performance, skip_year, stage_performance, EconError};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    db: Option<String>,
    seasons: u32,
    seed: u64,
}

fn parse_args() -> Args {
    let mut args = Args {
        db: None,
        seasons: 5,
        seed: 42,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--db" => args.db = it.next(),
            "--seasons" => {
                if let Some(n) = it.next().and_then(|s| s.parse().ok()) {
                    args.seasons = n;
                }
            }
            "--seed" => {
                if let Some(n) = it.next().and_then(|s| s.parse().ok()) {
                    args.seed = n;
                }
            }
            _ => {}
        }
    }
    args
}

/// Pick the highest-demand plot whose minimum budget fits the capital.
fn pick_plot(plots: &[Plot], capital: i64) -> Option<&Plot> {
    plots
        .iter()
        .filter(|p| p.minimum_budget <= capital)
        .max_by_key(|p| (p.demand, -p.minimum_budget))
}

fn run_season<S: TheaterStore + ?Sized>(
    store: &mut S,
    rng: &mut ChaCha8Rng,
) -> Result<(), EconError> {
    let state = store.game_state()?;
    let plots = store.plots()?;
    let Some(plot) = pick_plot(&plots, state.capital).cloned() else {
        let skip = skip_year(store, rng)?;
        println!(
            "{} | no affordable plot, rights sold for {} | capital {}",
            skip.year - 1,
            skip.rights_sale,
            skip.capital
        );
        return Ok(());
    };

    // Leave a margin above the minimum when the coffers allow it.
    let budget = state
        .capital
        .min(plot.minimum_budget + plot.minimum_budget / 5);
    let title = format!("{} Season {}", plot.title, state.year);
    let id = match stage_performance(store, &title, plot.id, state.year, budget) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "staging failed, selling rights instead");
            let skip = skip_year(store, rng)?;
            println!(
                "{} | staging failed ({e}) | rights sold for {} | capital {}",
                skip.year - 1,
                skip.rights_sale,
                skip.capital
            );
            return Ok(());
        }
    };

    // Cast best-first so the expensive slots face the rank requirements.
    let mut troupe = store.actors()?;
    troupe.sort_by(|a, b| {
        (b.rank.index(), b.experience, b.awards_count).cmp(&(
            a.rank.index(),
            a.experience,
            a.awards_count,
        ))
    });
    for (i, actor) in troupe.iter().take(plot.roles_count as usize).enumerate() {
        let quote = contract_cost(actor);
        store.assign_role(actor.id, id, &format!("Role {}", i + 1), quote.total)?;
        info!(actor = %actor.last_name, contract = quote.total, "cast");
    }

    let s = settle_performance(store, rng, id)?;
    println!(
        "{} | {} | {:?}{} | revenue {} | expenses {} | profit {} | capital {}",
        state.year,
        title,
        s.tier,
        if s.compliant { "" } else { " (cast below requirements)" },
        s.revenue,
        s.total_expenses,
        s.profit,
        store.game_state()?.capital
    );
    for actor in &s.awarded {
        println!("    award: {} {}", actor.first_name, actor.last_name);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    info!(
        sha = env!("GIT_SHA"),
        db = ?args.db,
        seasons = args.seasons,
        seed = args.seed,
        "starting theater CLI"
    );

    let mut sqlite;
    let mut memory;
    let store: &mut dyn TheaterStore = match &args.db {
        Some(url) => {
            sqlite = persistence::SqliteStore::open(url)?;
            sqlite.init_sample_company()?;
            &mut sqlite
        }
        None => {
            memory = persistence::MemoryStore::with_sample_company();
            &mut memory
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for _ in 0..args.seasons {
        run_season(store, &mut rng)?;
    }

    let state = store.game_state()?;
    println!("final | year {} | capital {}", state.year, state.capital);
    Ok(())
}
