//! Generated state cache
//!
//! Remembers, per project root and profile, which source hash each
//! dependency was last built and deployed from and which image tags its
//! builds produced. State is loaded once per run, mutated in memory as
//! work completes, and written back only at explicit checkpoints.
//!
//! # Update rules
//!
//! | Event | Effect |
//! |-------|--------|
//! | Build succeeds | stored hash + image tags advance together |
//! | Build fails | nothing changes, next run retries |
//! | Deploy succeeds | deployed hash advances |
//! | Purge succeeds | deployed hash is cleared |

pub mod generated;
pub mod store;

pub use generated::{CacheConfig, GeneratedConfig, GeneratedState, ImageCache, DEFAULT_PROFILE};
pub use store::{FileStateStore, MemoryStateStore, StateStore, STATE_DIR, STATE_FILE};
