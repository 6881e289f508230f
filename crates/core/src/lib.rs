pub mod config;
pub mod counter;
pub mod error;
pub mod perf;
pub mod reveal;
pub mod scheduler;
pub mod scroll;
pub mod stage;
pub mod storage;
pub mod theme;
pub mod tracking;
pub mod typewriter;

pub use config::{ScrollConfig, SiteConfig, TypewriterConfig};
pub use error::ConfigError;
pub use stage::{InstanceId, Stage};
pub use typewriter::{Phrase, Typewriter, TypewriterState};
