pub mod button_menu;
pub mod buttons;

pub use button_menu::{ButtonMenu, MenuOutcome, MenuState};
pub use buttons::ButtonCode;
