use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a section could not be bound.
///
/// None of these reach the host as failures: the engine logs them and stays
/// inert, leaving the page to scroll normally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("required element missing: {0}")]
    MissingElement(&'static str),

    #[error("degenerate geometry: pin distance {distance}")]
    DegenerateGeometry { distance: f64 },

    #[error("timeline has no sub-animations")]
    EmptyTimeline,

    #[error("layout {width}px wide is below the {min_width}px minimum")]
    UnsupportedLayout { width: f64, min_width: f64 },
}
