//! Personal assistant memory layer — loop prevention and semantic doc recall.
//!
//! `brain` gives an automation agent two things:
//!
//! 1. **Loop prevention** — a content-addressed action ledger with a cooldown
//!    window. Before repeating work, the agent asks the cooldown gate whether
//!    the same action (with the same context) ran recently; identical repeats
//!    inside the window are blocked, repeats with new context are let through.
//! 2. **Semantic recall** — markdown documentation embedded with
//!    all-MiniLM-L6-v2 (384 dimensions) into a [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!    table, searched by vector similarity.
//!
//! Everything persists in a single SQLite database (default `~/.brain/brain.db`),
//! including the key/value state, session, and command-log bookkeeping tables.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, migrations, and health checks
//! - [`embedding`] — Text-to-vector embedding pipeline via ONNX Runtime
//! - [`guard`] — The cooldown engine: fingerprinting, action ledger, decision gate
//! - [`knowledge`] — Documentation indexing and semantic search
//! - [`state`] — Key/value state, sessions, and the command log
//! - [`stats`] — Aggregate counters across all tables

pub mod config;
pub mod db;
pub mod embedding;
pub mod guard;
pub mod knowledge;
pub mod state;
pub mod stats;
