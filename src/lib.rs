//! # Docshelf
//!
//! A local-first document organizer with grouped storage and remote
//! semantic indexing.
//!
//! Docshelf keeps Groups and Documents in an embedded SQLite store with
//! enforced referential integrity, and drives file uploads through a remote
//! indexing service, exposing transfer progress and indexing status as one
//! ordered stream of lifecycle records.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────────────┐
//! │   CLI    │──▶│   Pipeline    │──▶│ Indexing svc   │
//! │ (shelf)  │   │ upload+poll  │   │ (HTTP remote) │
//! └────┬─────┘   └──────┬───────┘   └───────────────┘
//!      │                │
//!      ▼                ▼
//! ┌─────────────────────────┐
//! │      DocumentStore       │
//! │  SQLite: groups + docs  │
//! └─────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! shelf init                          # create database
//! shelf group add "Contracts"        # create a group
//! shelf upload ./nda.pdf --group 1   # upload, index, and persist metadata
//! shelf query "termination clause" --group 1
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`store`] | Embedded relational store for groups and documents |
//! | [`pipeline`] | Upload/index lifecycle orchestration |
//! | [`transport`] | HTTP transports for the remote indexing service |
//! | [`events`] | Multicast interaction events |
//! | [`progress`] | Upload progress reporting |
//! | [`query`] | Remote semantic queries |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod events;
pub mod groups;
pub mod migrate;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod query;
pub mod store;
pub mod transport;
pub mod upload_cmd;
