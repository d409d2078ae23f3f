//! # Path Engine
//!
//! 路径生成引擎。
//!
//! 负责：
//! - 大圆距离计算
//! - 正方形巡逻路径（方向状态机）
//! - 航点插值（稀疏航点 + 速度 -> 每秒一个点）
//! - 按 tick 逐点取值的 `PointSource`
//!
//! ## 使用示例
//!
//! ```
//! use contracts::{Coordinate, MovementProfile};
//! use path_engine::{PointSource, SquarePatrol};
//!
//! let mut patrol = SquarePatrol::new(Coordinate::new(35.0, 139.0), MovementProfile::Walk, 100);
//! let first = patrol.next_point();
//! assert_eq!(first, Some(Coordinate::new(35.0, 139.0)));
//! ```

pub mod geo;
mod patrol;
mod route;
mod source;

pub use contracts::{Coordinate, MovementProfile};
pub use geo::distance_meters;
pub use patrol::{PatrolBounds, PatrolPhase, SquarePatrol};
pub use route::{Repeat, RouteDescriptor, RouteSequence, WaypointPlan, MAX_ROUTE_POINTS};
pub use source::{PointSource, RoutePlayback};
