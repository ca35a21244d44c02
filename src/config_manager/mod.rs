pub mod main;
pub mod system;
pub mod translator;
pub mod settings;
pub mod utils;

pub use main::Config;
pub use translator::SelectionMode;
pub use settings::{SettingsError, SettingsStore};
