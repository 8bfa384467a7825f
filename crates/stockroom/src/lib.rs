//! Stockroom - Shopify inventory ingestion for demand forecasting.
//!
//! This library materializes e-commerce platform data (locations, products,
//! variants, inventory, orders) into a normalized, platform-agnostic
//! datastore. The heart of it is the inventory sync core:
//!
//! - [`sync::SyncOrchestrator`] accepts trigger requests, collapses
//!   concurrent and rapidly repeated triggers through a database-serialized
//!   dedup gate, and enqueues background jobs;
//! - [`queue`] is the durable task queue (Redis lists per priority class,
//!   at-least-once delivery, retry with backoff) and the worker that drains
//!   it;
//! - [`shopify`] is the rate-limited, cursor-paginated platform client;
//! - the ingestion pipeline in [`sync`] fetches everything for one
//!   integration, normalizes it, and applies idempotent chunked upserts
//!   inside a single transaction;
//! - [`crypto::SecretCipher`] keeps access tokens authenticated-encrypted at
//!   rest.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stockroom::config::Settings;
//! use stockroom::queue::RedisQueue;
//! use stockroom::sync::{SyncOrchestrator, SyncRequest};
//!
//! let settings = Settings::load()?;
//! let db = stockroom::db::connect(&settings.database_url).await?;
//! let queue = Arc::new(RedisQueue::connect(&settings.redis_url).await?);
//! let orchestrator = SyncOrchestrator::new(db, queue, settings.cipher()?);
//!
//! let outcome = orchestrator
//!     .trigger_sync(SyncRequest {
//!         user_id: "usr_...".parse()?,
//!         shop_domain: "demo.myshopify.com".into(),
//!         force: false,
//!     })
//!     .await?;
//! ```

pub mod config;
pub mod crypto;
pub mod db;
pub mod entity;
pub mod id;
pub mod migration;
pub mod queue;
pub mod shopify;
pub mod store;
pub mod sync;

pub use config::Settings;
pub use crypto::SecretCipher;
pub use db::{connect, connect_and_migrate};
pub use entity::prelude::*;
