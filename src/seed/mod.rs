pub mod dataset;
pub mod reference;
pub mod registry;
pub mod theme;
pub mod users;
pub mod views;

pub use dataset::*;
pub use reference::*;
pub use registry::*;
pub use theme::{embedded_theme, reset_theme, theme_from_file, validate_theme};
pub use users::*;
pub use views::default_views;
