//! Wilderness value pipeline
//!
//! Everything needed to interpolate authored animation values:
//!
//! - **Values**: a closed tree of numbers, text, lists, keyed maps and
//!   middleware-tagged numeric leaves
//! - **Tree walk**: an iterative, stack-based transform over that tree, with
//!   a fixed nesting limit
//! - **Middleware**: reversible codecs (`color`, `unit`) that turn authored
//!   strings into tagged numbers and back again
//! - **Easing**: opaque `f64 -> f64` curves resolved by name
//! - **Tween**: structural linear interpolation between two identical trees
//!
//! # Example
//!
//! ```rust
//! use wilderness_core::{tween, Easing, MiddlewareStack, Value};
//!
//! let stack = MiddlewareStack::default();
//! let from = stack.input(Value::from("#000000"))?;
//! let to = stack.input(Value::from("#ffffff"))?;
//!
//! let mid = tween(&from, &to, &Easing::linear(), 0.5)?;
//! assert_eq!(stack.output(mid)?, Value::from("#808080"));
//! # Ok::<(), wilderness_core::CoreError>(())
//! ```

pub mod easing;
pub mod error;
pub mod middleware;
pub mod tree;
pub mod tween;
pub mod value;

pub use easing::{Easing, EasingRegistry};
pub use error::{CoreError, Result};
pub use middleware::{ColorMiddleware, Middleware, MiddlewareStack, UnitMiddleware};
pub use tween::tween;
pub use value::{Tagged, Value};
