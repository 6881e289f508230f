pub mod theme;
pub mod types;

pub use theme::{ThemeMode, ThemeToken};
pub use types::{Phase, ScrollDerived, ScrollView, TypewriterFrame};
