pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod motion;
pub mod range;
pub mod rebind;
pub mod scrub;
pub mod seek;
pub mod timeline;

pub use config::{AppConfig, Choreography, EasingType, ResizePolicy, ScrollConfig};
pub use engine::{choreographer_for, Engine, EngineStats, Lifecycle, Stage};
pub use error::{BindError, Error, Result};
pub use geometry::{Geometry, GeometrySampler, SectionMetrics};
pub use range::{PinState, Range, RangeBinder};
pub use rebind::EnvironmentEvent;
pub use scrub::{Frame, ScrollSample, ScrubDriver};
pub use seek::SeekTarget;
pub use timeline::{Choreographer, Timeline, VisualState};
