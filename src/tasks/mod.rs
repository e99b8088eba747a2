//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a cache.
//!
//! # Tasks
//! - Entry sweep: drops completed entries past a maximum age

mod sweep;

pub use sweep::spawn_sweep_task;
