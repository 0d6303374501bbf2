//! # horizon-database
//!
//! Persistence layer for Event Horizon: the store traits consumed by the
//! auth and service crates, PostgreSQL repositories implementing them, and
//! in-memory implementations for single-process use and tests.
//!
//! The PostgreSQL schema is provisioned outside this crate. Repositories
//! expect the tables `users`, `revoked_tokens` (unique `jti`), `events`,
//! `event_data` (`ON DELETE CASCADE` on `event_id`), `alerts` and `reports`,
//! with UUID primary keys defaulting to `gen_random_uuid()` and
//! `created_at`/`updated_at` defaulting to `NOW()`. `revoked_tokens.token_type`
//! uses the enum type `token_kind ('access', 'refresh')`.
//!
//! Email uniqueness is case-insensitive, matching the `LOWER(email)` lookups
//! in [`repositories::UserRepository`]. A plain `UNIQUE (email)` constraint is
//! not enough; the `users` table needs
//!
//! ```sql
//! CREATE UNIQUE INDEX users_email_lower_key ON users (LOWER(email));
//! ```
//!
//! so that a differently-cased duplicate surfaces as a unique violation and
//! maps to `Conflict`, as it does in the in-memory store.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod store;

pub use connection::{DatabasePool, PoolStatus};
pub use store::{
    AlertStore, EventDataStore, EventStore, ReportStore, RevocationStore, StoreSet, UserStore,
};
