pub mod analysis;
pub mod config;
pub mod error;
pub mod highlight;
pub mod interaction;
pub mod message;
pub mod scale;
pub mod svg;
pub mod timeline;
pub mod viewport;
pub mod views;

pub use config::TimelineConfig;
pub use error::{Error, Result};
pub use timeline::{ClickHandler, RenderedView, Timeline};
