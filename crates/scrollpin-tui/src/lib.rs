pub mod app;
pub mod event;
pub mod input;
pub mod stage;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use stage::TerminalStage;
pub use theme::{load_theme, Theme};
