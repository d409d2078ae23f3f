//! Command implementations.

mod patrol;
mod route;
mod session;
mod validate;

pub use patrol::run_patrol;
pub use route::run_route;
pub use validate::run_validate;
