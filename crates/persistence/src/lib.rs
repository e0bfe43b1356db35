#![deny(warnings)]

//! Persistence backends for Theater Tycoon.
//!
//! Two `TheaterStore` implementations: an in-memory store with JSON snapshot
//! save/load, and a SQLite store behind a synchronous facade. Both enforce
//! the same referential guards (plot-in-use, engaged actors, roster and
//! repertoire floors) and seed the same sample company.

pub mod memory;
pub mod sample;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
