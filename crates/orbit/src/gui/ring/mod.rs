pub mod model;
pub mod view;

pub use model::{Caption, Card, RingModel};
pub use view::draw;

/// Width images are decoded at; cards are scaled from there.
pub const IMAGE_LOAD_WIDTH: i32 = 720;
pub const CARD_CORNER_RADIUS: f64 = 12.0;
pub const ACTIVE_RING_WIDTH: f64 = 4.0;
pub const ACTIVE_RING_ALPHA: f64 = 0.7;
pub const PLACEHOLDER_FONT_SIZE: f64 = 18.0;
