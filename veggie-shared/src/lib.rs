pub mod locale;
pub mod models;

pub use locale::{display_name, AppSettings, Locale, LocalizedNames, Theme};
