pub mod model;
pub mod scene;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use model::{ColorMap, Event, EventKey, EventPair, Job, PairKind, TimelineData};
pub use scene::{HitTarget, Primitive, Scene, TextAlign};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use types::{Point, Rect};
