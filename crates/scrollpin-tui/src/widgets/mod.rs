mod deck;
mod help;
mod status_bar;
mod tab_bar;

pub use deck::DeckWidget;
pub use help::HelpWidget;
pub use status_bar::StatusBarWidget;
pub use tab_bar::TabBarWidget;
