//! `roster-infra` — persistent storage adapters.

pub mod postgres;

pub use postgres::PostgresMemberStore;
