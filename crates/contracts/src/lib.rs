//! # Contracts
//!
//! Frozen interface contracts shared by the path engine, playback and hosts.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Coordinate Model
//! - Decimal degrees (f64), compared after rounding to 7 digits
//! - One tick = one published fix, nominally one second

mod command;
mod config;
mod coordinate;
mod error;
mod movement;
mod session;
mod sink;

pub use command::*;
pub use config::*;
pub use coordinate::*;
pub use error::*;
pub use movement::*;
pub use session::*;
pub use sink::*;
