//! SQLite-backed `TheaterStore`.
//!
//! The store owns a single-connection `sqlx` pool and a current-thread tokio
//! runtime, exposing the synchronous interface the economic core expects.
//! Multi-statement writes run inside transactions; the per-role required-rank
//! list is stored as a JSON array column and parsed here, never downstream.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use theater_core::{
    is_valid_text, validate_actor, validate_performance, validate_plot, Actor, ActorId,
    CastMember, GameState, Performance, PerformanceId, Plot, PlotId, Rank, StoreError,
    TheaterStore, ValidationError, MIN_REPERTOIRE, MIN_ROSTER,
};
use tracing::info;

use crate::sample;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS actors (
        actor_id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        rank TEXT NOT NULL DEFAULT 'Beginner',
        awards_count INTEGER NOT NULL DEFAULT 0 CHECK (awards_count >= 0),
        experience INTEGER NOT NULL DEFAULT 0 CHECK (experience >= 0),
        UNIQUE (last_name, first_name)
    )",
    "CREATE TABLE IF NOT EXISTS plots (
        plot_id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        minimum_budget INTEGER NOT NULL CHECK (minimum_budget > 0),
        production_cost INTEGER NOT NULL CHECK (production_cost > 0),
        roles_count INTEGER NOT NULL CHECK (roles_count >= 1),
        demand INTEGER NOT NULL CHECK (demand BETWEEN 1 AND 10),
        required_ranks TEXT NOT NULL DEFAULT '[]'
    )",
    "CREATE TABLE IF NOT EXISTS performances (
        performance_id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        plot_id INTEGER NOT NULL REFERENCES plots(plot_id) ON DELETE RESTRICT,
        year INTEGER NOT NULL UNIQUE CHECK (year >= 2022),
        budget INTEGER NOT NULL CHECK (budget > 0),
        revenue INTEGER NOT NULL DEFAULT 0 CHECK (revenue >= 0),
        is_completed INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS cast_assignments (
        actor_id INTEGER NOT NULL REFERENCES actors(actor_id) ON DELETE RESTRICT,
        performance_id INTEGER NOT NULL
            REFERENCES performances(performance_id) ON DELETE CASCADE,
        role TEXT NOT NULL,
        contract_cost INTEGER NOT NULL CHECK (contract_cost > 0),
        PRIMARY KEY (actor_id, performance_id)
    )",
    "CREATE TABLE IF NOT EXISTS game_state (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        current_year INTEGER NOT NULL,
        capital INTEGER NOT NULL
    )",
];

fn backend<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn rank_from_sql(name: &str) -> Result<Rank, StoreError> {
    Rank::from_name(name).ok_or_else(|| StoreError::Backend(format!("unknown rank {name:?}")))
}

fn ranks_to_json(ranks: &[Rank]) -> Result<String, StoreError> {
    serde_json::to_string(ranks).map_err(backend)
}

fn ranks_from_json(json: &str) -> Result<Vec<Rank>, StoreError> {
    serde_json::from_str(json).map_err(backend)
}

fn actor_from_row(row: &SqliteRow) -> Result<Actor, StoreError> {
    Ok(Actor {
        id: ActorId(row.try_get::<i64, _>("actor_id").map_err(backend)?),
        first_name: row.try_get("first_name").map_err(backend)?,
        last_name: row.try_get("last_name").map_err(backend)?,
        rank: rank_from_sql(&row.try_get::<String, _>("rank").map_err(backend)?)?,
        awards_count: row.try_get::<i64, _>("awards_count").map_err(backend)? as u32,
        experience: row.try_get::<i64, _>("experience").map_err(backend)? as u32,
    })
}

fn plot_from_row(row: &SqliteRow) -> Result<Plot, StoreError> {
    Ok(Plot {
        id: PlotId(row.try_get::<i64, _>("plot_id").map_err(backend)?),
        title: row.try_get("title").map_err(backend)?,
        minimum_budget: row.try_get("minimum_budget").map_err(backend)?,
        production_cost: row.try_get("production_cost").map_err(backend)?,
        roles_count: row.try_get::<i64, _>("roles_count").map_err(backend)? as u32,
        demand: row.try_get::<i64, _>("demand").map_err(backend)? as u8,
        required_ranks: ranks_from_json(
            &row.try_get::<String, _>("required_ranks").map_err(backend)?,
        )?,
    })
}

fn performance_from_row(row: &SqliteRow) -> Result<Performance, StoreError> {
    Ok(Performance {
        id: PerformanceId(row.try_get::<i64, _>("performance_id").map_err(backend)?),
        title: row.try_get("title").map_err(backend)?,
        plot_id: PlotId(row.try_get::<i64, _>("plot_id").map_err(backend)?),
        year: row.try_get::<i64, _>("year").map_err(backend)? as i32,
        budget: row.try_get("budget").map_err(backend)?,
        revenue: row.try_get("revenue").map_err(backend)?,
        completed: row.try_get::<bool, _>("is_completed").map_err(backend)?,
    })
}

/// Theater database on SQLite.
pub struct SqliteStore {
    rt: tokio::runtime::Runtime,
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) a database at `url`, e.g.
    /// `sqlite://./saves/theater.db`, and ensure the schema exists.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(backend)?;
        let opts = SqliteConnectOptions::from_str(url)
            .map_err(backend)?
            .create_if_missing(true)
            .foreign_keys(true);
        // A single connection keeps in-memory databases coherent and
        // serializes writers, matching the single-user model.
        let pool = rt
            .block_on(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(opts),
            )
            .map_err(backend)?;
        let store = Self { rt, pool };
        store.create_schema()?;
        info!(url, "sqlite store opened");
        Ok(store)
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:")
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        self.rt.block_on(async {
            for stmt in SCHEMA {
                sqlx::query(stmt).execute(&self.pool).await.map_err(backend)?;
            }
            sqlx::query("INSERT OR IGNORE INTO game_state (id, current_year, capital) VALUES (1, ?, ?)")
                .bind(sample::GAME_STATE.year)
                .bind(sample::GAME_STATE.capital)
                .execute(&self.pool)
                .await
                .map_err(backend)?;
            Ok(())
        })
    }

    /// Seed the sample company. Existing rows are left alone.
    pub fn init_sample_company(&mut self) -> Result<(), StoreError> {
        self.rt.block_on(async {
            let mut tx = self.pool.begin().await.map_err(backend)?;
            for actor in sample::actors() {
                sqlx::query(
                    "INSERT OR IGNORE INTO actors
                     (actor_id, first_name, last_name, rank, awards_count, experience)
                     VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(actor.id.0)
                .bind(&actor.first_name)
                .bind(&actor.last_name)
                .bind(actor.rank.to_string())
                .bind(actor.awards_count as i64)
                .bind(actor.experience as i64)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
            }
            for plot in sample::plots() {
                sqlx::query(
                    "INSERT OR IGNORE INTO plots
                     (plot_id, title, minimum_budget, production_cost, roles_count, demand,
                      required_ranks)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(plot.id.0)
                .bind(&plot.title)
                .bind(plot.minimum_budget)
                .bind(plot.production_cost)
                .bind(plot.roles_count as i64)
                .bind(plot.demand as i64)
                .bind(ranks_to_json(&plot.required_ranks)?)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
            }
            for perf in sample::performances() {
                sqlx::query(
                    "INSERT OR IGNORE INTO performances
                     (performance_id, title, plot_id, year, budget, revenue, is_completed)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(perf.id.0)
                .bind(&perf.title)
                .bind(perf.plot_id.0)
                .bind(perf.year as i64)
                .bind(perf.budget)
                .bind(perf.revenue)
                .bind(perf.completed)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
            }
            for (actor_id, performance_id, role, cost) in sample::cast_assignments() {
                sqlx::query(
                    "INSERT OR IGNORE INTO cast_assignments
                     (actor_id, performance_id, role, contract_cost)
                     VALUES (?, ?, ?, ?)",
                )
                .bind(actor_id.0)
                .bind(performance_id.0)
                .bind(role)
                .bind(cost)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
            }
            tx.commit().await.map_err(backend)?;
            Ok(())
        })
    }

    /// Wipe all rows and reseed the sample company.
    pub fn reset_to_sample(&mut self) -> Result<(), StoreError> {
        self.rt.block_on(async {
            let mut tx = self.pool.begin().await.map_err(backend)?;
            for table in ["cast_assignments", "performances", "actors", "plots"] {
                sqlx::query(&format!("DELETE FROM {table}"))
                    .execute(&mut *tx)
                    .await
                    .map_err(backend)?;
            }
            sqlx::query("DELETE FROM sqlite_sequence")
                .execute(&mut *tx)
                .await
                .ok();
            sqlx::query("UPDATE game_state SET current_year = ?, capital = ? WHERE id = 1")
                .bind(sample::GAME_STATE.year)
                .bind(sample::GAME_STATE.capital)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
            tx.commit().await.map_err(backend)?;
            Ok::<(), StoreError>(())
        })?;
        self.init_sample_company()?;
        info!("database reset to the sample company");
        Ok(())
    }

    fn count(&self, sql: &str, bind: Option<i64>) -> Result<i64, StoreError> {
        self.rt.block_on(async {
            let mut query = sqlx::query(sql);
            if let Some(v) = bind {
                query = query.bind(v);
            }
            let row = query.fetch_one(&self.pool).await.map_err(backend)?;
            row.try_get::<i64, _>(0).map_err(backend)
        })
    }
}

impl TheaterStore for SqliteStore {
    fn actors(&self) -> Result<Vec<Actor>, StoreError> {
        self.rt.block_on(async {
            let rows = sqlx::query("SELECT * FROM actors ORDER BY actor_id")
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;
            rows.iter().map(actor_from_row).collect()
        })
    }

    fn actor(&self, id: ActorId) -> Result<Option<Actor>, StoreError> {
        self.rt.block_on(async {
            let row = sqlx::query("SELECT * FROM actors WHERE actor_id = ?")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
            row.as_ref().map(actor_from_row).transpose()
        })
    }

    fn add_actor(&mut self, actor: Actor) -> Result<ActorId, StoreError> {
        validate_actor(&actor)?;
        self.rt.block_on(async {
            let result = sqlx::query(
                "INSERT INTO actors (first_name, last_name, rank, awards_count, experience)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&actor.first_name)
            .bind(&actor.last_name)
            .bind(actor.rank.to_string())
            .bind(actor.awards_count as i64)
            .bind(actor.experience as i64)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
            Ok(ActorId(result.last_insert_rowid()))
        })
    }

    fn update_actor(&mut self, actor: &Actor) -> Result<(), StoreError> {
        validate_actor(actor)?;
        self.rt.block_on(async {
            let result = sqlx::query(
                "UPDATE actors
                 SET first_name = ?, last_name = ?, rank = ?, awards_count = ?, experience = ?
                 WHERE actor_id = ?",
            )
            .bind(&actor.first_name)
            .bind(&actor.last_name)
            .bind(actor.rank.to_string())
            .bind(actor.awards_count as i64)
            .bind(actor.experience as i64)
            .bind(actor.id.0)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
            if result.rows_affected() == 0 {
                return Err(StoreError::ActorNotFound(actor.id));
            }
            Ok(())
        })
    }

    fn delete_actor(&mut self, id: ActorId) -> Result<(), StoreError> {
        if self.actor(id)?.is_none() {
            return Err(StoreError::ActorNotFound(id));
        }
        let engaged = self.count(
            "SELECT COUNT(*) FROM cast_assignments ca
             JOIN performances p ON ca.performance_id = p.performance_id
             WHERE ca.actor_id = ? AND p.is_completed = 0",
            Some(id.0),
        )?;
        if engaged > 0 {
            return Err(StoreError::ActorEngaged(id));
        }
        if self.count("SELECT COUNT(*) FROM actors", None)? <= MIN_ROSTER as i64 {
            return Err(StoreError::RosterMinimum(MIN_ROSTER));
        }
        self.rt.block_on(async {
            let mut tx = self.pool.begin().await.map_err(backend)?;
            sqlx::query("DELETE FROM cast_assignments WHERE actor_id = ?")
                .bind(id.0)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
            sqlx::query("DELETE FROM actors WHERE actor_id = ?")
                .bind(id.0)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
            tx.commit().await.map_err(backend)
        })
    }

    fn award(&mut self, id: ActorId) -> Result<(), StoreError> {
        self.rt.block_on(async {
            let result =
                sqlx::query("UPDATE actors SET awards_count = awards_count + 1 WHERE actor_id = ?")
                    .bind(id.0)
                    .execute(&self.pool)
                    .await
                    .map_err(backend)?;
            if result.rows_affected() == 0 {
                return Err(StoreError::ActorNotFound(id));
            }
            Ok(())
        })
    }

    fn promote(&mut self, id: ActorId) -> Result<(), StoreError> {
        let actor = self.actor(id)?.ok_or(StoreError::ActorNotFound(id))?;
        match actor.rank.next() {
            Some(next) => self.rt.block_on(async {
                sqlx::query("UPDATE actors SET rank = ? WHERE actor_id = ?")
                    .bind(next.to_string())
                    .bind(id.0)
                    .execute(&self.pool)
                    .await
                    .map_err(backend)?;
                Ok(())
            }),
            None => {
                info!(actor = %actor.last_name, "already at the top rank");
                Ok(())
            }
        }
    }

    fn plots(&self) -> Result<Vec<Plot>, StoreError> {
        self.rt.block_on(async {
            let rows = sqlx::query("SELECT * FROM plots ORDER BY title")
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;
            rows.iter().map(plot_from_row).collect()
        })
    }

    fn plot(&self, id: PlotId) -> Result<Option<Plot>, StoreError> {
        self.rt.block_on(async {
            let row = sqlx::query("SELECT * FROM plots WHERE plot_id = ?")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
            row.as_ref().map(plot_from_row).transpose()
        })
    }

    fn add_plot(&mut self, plot: Plot) -> Result<PlotId, StoreError> {
        validate_plot(&plot)?;
        let ranks = ranks_to_json(&plot.required_ranks)?;
        self.rt.block_on(async {
            let result = sqlx::query(
                "INSERT INTO plots
                 (title, minimum_budget, production_cost, roles_count, demand, required_ranks)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&plot.title)
            .bind(plot.minimum_budget)
            .bind(plot.production_cost)
            .bind(plot.roles_count as i64)
            .bind(plot.demand as i64)
            .bind(ranks)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
            Ok(PlotId(result.last_insert_rowid()))
        })
    }

    fn update_plot(&mut self, plot: &Plot) -> Result<(), StoreError> {
        validate_plot(plot)?;
        let ranks = ranks_to_json(&plot.required_ranks)?;
        self.rt.block_on(async {
            let result = sqlx::query(
                "UPDATE plots
                 SET title = ?, minimum_budget = ?, production_cost = ?, roles_count = ?,
                     demand = ?, required_ranks = ?
                 WHERE plot_id = ?",
            )
            .bind(&plot.title)
            .bind(plot.minimum_budget)
            .bind(plot.production_cost)
            .bind(plot.roles_count as i64)
            .bind(plot.demand as i64)
            .bind(ranks)
            .bind(plot.id.0)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
            if result.rows_affected() == 0 {
                return Err(StoreError::PlotNotFound(plot.id));
            }
            Ok(())
        })
    }

    fn delete_plot(&mut self, id: PlotId) -> Result<(), StoreError> {
        if self.plot(id)?.is_none() {
            return Err(StoreError::PlotNotFound(id));
        }
        let staged = self.count(
            "SELECT COUNT(*) FROM performances WHERE plot_id = ?",
            Some(id.0),
        )?;
        if staged > 0 {
            return Err(StoreError::PlotInUse(id));
        }
        if self.count("SELECT COUNT(*) FROM plots", None)? <= MIN_REPERTOIRE as i64 {
            return Err(StoreError::RepertoireMinimum(MIN_REPERTOIRE));
        }
        self.rt.block_on(async {
            sqlx::query("DELETE FROM plots WHERE plot_id = ?")
                .bind(id.0)
                .execute(&self.pool)
                .await
                .map_err(backend)?;
            Ok(())
        })
    }

    fn performances(&self) -> Result<Vec<Performance>, StoreError> {
        self.rt.block_on(async {
            let rows = sqlx::query("SELECT * FROM performances ORDER BY year DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;
            rows.iter().map(performance_from_row).collect()
        })
    }

    fn performance(&self, id: PerformanceId) -> Result<Option<Performance>, StoreError> {
        self.rt.block_on(async {
            let row = sqlx::query("SELECT * FROM performances WHERE performance_id = ?")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
            row.as_ref().map(performance_from_row).transpose()
        })
    }

    fn create_performance(
        &mut self,
        title: &str,
        plot_id: PlotId,
        year: i32,
        budget: i64,
    ) -> Result<PerformanceId, StoreError> {
        if self.plot(plot_id)?.is_none() {
            return Err(StoreError::PlotNotFound(plot_id));
        }
        if self.count(
            "SELECT COUNT(*) FROM performances WHERE year = ?",
            Some(year as i64),
        )? > 0
        {
            return Err(StoreError::YearTaken(year));
        }
        let draft = Performance {
            id: PerformanceId(0),
            title: title.to_string(),
            plot_id,
            year,
            budget,
            revenue: 0,
            completed: false,
        };
        validate_performance(&draft)?;
        self.rt.block_on(async {
            let result = sqlx::query(
                "INSERT INTO performances (title, plot_id, year, budget, is_completed)
                 VALUES (?, ?, ?, ?, 0)",
            )
            .bind(title)
            .bind(plot_id.0)
            .bind(year as i64)
            .bind(budget)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
            Ok(PerformanceId(result.last_insert_rowid()))
        })
    }

    fn cast(&self, id: PerformanceId) -> Result<Vec<CastMember>, StoreError> {
        self.rt.block_on(async {
            let rows = sqlx::query(
                "SELECT a.*, ca.role, ca.contract_cost
                 FROM actors a
                 JOIN cast_assignments ca ON a.actor_id = ca.actor_id
                 WHERE ca.performance_id = ?
                 ORDER BY ca.contract_cost DESC",
            )
            .bind(id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
            rows.iter()
                .map(|row| {
                    Ok(CastMember {
                        actor: actor_from_row(row)?,
                        role: row.try_get("role").map_err(backend)?,
                        contract_cost: row.try_get("contract_cost").map_err(backend)?,
                    })
                })
                .collect()
        })
    }

    fn assign_role(
        &mut self,
        actor_id: ActorId,
        performance_id: PerformanceId,
        role: &str,
        contract_cost: i64,
    ) -> Result<(), StoreError> {
        if self.actor(actor_id)?.is_none() {
            return Err(StoreError::ActorNotFound(actor_id));
        }
        if self.performance(performance_id)?.is_none() {
            return Err(StoreError::PerformanceNotFound(performance_id));
        }
        if !is_valid_text(role) {
            return Err(ValidationError::InvalidText(role.to_string()).into());
        }
        if contract_cost <= 0 {
            return Err(ValidationError::NonPositiveMoney.into());
        }
        self.rt.block_on(async {
            let dup = sqlx::query(
                "SELECT 1 FROM cast_assignments WHERE actor_id = ? AND performance_id = ?",
            )
            .bind(actor_id.0)
            .bind(performance_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
            if dup.is_some() {
                return Err(StoreError::DuplicateCasting(actor_id, performance_id));
            }
            sqlx::query(
                "INSERT INTO cast_assignments (actor_id, performance_id, role, contract_cost)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(actor_id.0)
            .bind(performance_id.0)
            .bind(role)
            .bind(contract_cost)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
            Ok(())
        })
    }

    fn commit_settlement(
        &mut self,
        id: PerformanceId,
        revenue: i64,
        total_expenses: i64,
    ) -> Result<(), StoreError> {
        self.rt.block_on(async {
            let mut tx = self.pool.begin().await.map_err(backend)?;
            let result = sqlx::query(
                "UPDATE performances SET revenue = ?, budget = ?, is_completed = 1
                 WHERE performance_id = ?",
            )
            .bind(revenue)
            .bind(total_expenses)
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
            if result.rows_affected() == 0 {
                return Err(StoreError::PerformanceNotFound(id));
            }
            sqlx::query(
                "UPDATE actors SET experience = experience + 1
                 WHERE actor_id IN
                   (SELECT actor_id FROM cast_assignments WHERE performance_id = ?)",
            )
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
            tx.commit().await.map_err(backend)
        })
    }

    fn game_state(&self) -> Result<GameState, StoreError> {
        self.rt.block_on(async {
            let row = sqlx::query("SELECT current_year, capital FROM game_state WHERE id = 1")
                .fetch_one(&self.pool)
                .await
                .map_err(backend)?;
            Ok(GameState {
                year: row.try_get::<i64, _>("current_year").map_err(backend)? as i32,
                capital: row.try_get("capital").map_err(backend)?,
            })
        })
    }

    fn update_game_state(&mut self, state: GameState) -> Result<(), StoreError> {
        self.rt.block_on(async {
            sqlx::query("UPDATE game_state SET current_year = ?, capital = ? WHERE id = 1")
                .bind(state.year as i64)
                .bind(state.capital)
                .execute(&self.pool)
                .await
                .map_err(backend)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.init_sample_company().unwrap();
        store
    }

    #[test]
    fn schema_and_sample_company() {
        let store = sample_store();
        assert_eq!(store.actors().unwrap().len(), 10);
        let plots = store.plots().unwrap();
        assert_eq!(plots.len(), 10);
        // Required ranks survive the JSON column.
        let hamlet = plots.iter().find(|p| p.title == "Hamlet").unwrap();
        assert_eq!(hamlet.required_ranks, vec![Rank::Master, Rank::Honored]);
        let history = store.performances().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].year, 2024);
        assert_eq!(store.game_state().unwrap(), sample::GAME_STATE);
    }

    #[test]
    fn cast_listing_orders_by_contract() {
        let store = sample_store();
        let cast = store.cast(PerformanceId(2)).unwrap();
        assert_eq!(cast.len(), 8);
        assert_eq!(cast[0].role, "Hamlet");
        assert!(cast.windows(2).all(|w| w[0].contract_cost >= w[1].contract_cost));
    }

    #[test]
    fn guards_match_the_memory_store() {
        let mut store = sample_store();
        assert_eq!(
            store.delete_plot(PlotId(1)),
            Err(StoreError::PlotInUse(PlotId(1)))
        );
        let id = store
            .create_performance("Masquerade Night", PlotId(10), 2025, 700_000)
            .unwrap();
        store.assign_role(ActorId(3), id, "Arbenin", 140_000).unwrap();
        assert_eq!(
            store.delete_actor(ActorId(3)),
            Err(StoreError::ActorEngaged(ActorId(3)))
        );
        assert_eq!(
            store.assign_role(ActorId(3), id, "Prince", 100_000),
            Err(StoreError::DuplicateCasting(ActorId(3), id))
        );
        assert_eq!(
            store.create_performance("Twice Staged", PlotId(9), 2025, 450_000),
            Err(StoreError::YearTaken(2025))
        );
    }

    #[test]
    fn settlement_commit_is_atomic_and_bumps_experience() {
        let mut store = sample_store();
        let id = store
            .create_performance("Vanya Returns", PlotId(9), 2025, 450_000)
            .unwrap();
        store.assign_role(ActorId(1), id, "Vanya", 90_000).unwrap();
        store.assign_role(ActorId(5), id, "Sonya", 70_000).unwrap();
        let before: Vec<u32> = [1, 5]
            .iter()
            .map(|&a| store.actor(ActorId(a)).unwrap().unwrap().experience)
            .collect();

        store.commit_settlement(id, 820_000, 510_000).unwrap();
        let perf = store.performance(id).unwrap().unwrap();
        assert!(perf.completed);
        assert_eq!(perf.revenue, 820_000);
        assert_eq!(perf.budget, 510_000);
        for (i, &a) in [1, 5].iter().enumerate() {
            let now = store.actor(ActorId(a)).unwrap().unwrap();
            assert_eq!(now.experience, before[i] + 1);
        }

        assert_eq!(
            store.commit_settlement(PerformanceId(999), 1, 1),
            Err(StoreError::PerformanceNotFound(PerformanceId(999)))
        );
    }

    #[test]
    fn promote_and_award_persist() {
        let mut store = sample_store();
        store.award(ActorId(1)).unwrap();
        store.promote(ActorId(1)).unwrap();
        let actor = store.actor(ActorId(1)).unwrap().unwrap();
        assert_eq!(actor.awards_count, 4);
        assert_eq!(actor.rank, Rank::Master);
        // Top of the ladder is a no-op.
        store.promote(ActorId(3)).unwrap();
        assert_eq!(store.actor(ActorId(3)).unwrap().unwrap().rank, Rank::Peoples);
    }

    #[test]
    fn reset_restores_the_sample_company() {
        let mut store = sample_store();
        store
            .update_game_state(GameState {
                year: 2040,
                capital: 5,
            })
            .unwrap();
        let id = store
            .create_performance("Extra Season", PlotId(10), 2026, 700_000)
            .unwrap();
        assert!(store.performance(id).unwrap().is_some());

        store.reset_to_sample().unwrap();
        assert_eq!(store.game_state().unwrap(), sample::GAME_STATE);
        assert_eq!(store.performances().unwrap().len(), 3);
        assert_eq!(store.actors().unwrap().len(), 10);
    }
}
