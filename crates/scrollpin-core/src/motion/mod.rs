//! Motion atoms shared by the timeline evaluator and the seek animator
//!
//! - `easing` - Pure easing curves mapping [0, 1] to [0, 1]
//! - `timing` - Window fractions, clock progress and interpolation

pub mod easing;
pub mod timing;

pub use timing::{lerp, window_fraction};
