pub mod accounting;
pub mod common;
pub mod outcome;
pub mod property;
pub mod report;
pub mod theme;
pub mod view;

pub use accounting::*;
pub use common::*;
pub use outcome::*;
pub use property::*;
pub use report::*;
pub use theme::*;
pub use view::*;
