//! Headless engine for a draggable 3D image ring.
//!
//! The [`Carousel`] owns the rotation angle of a fixed [`Ring`] of images,
//! turns pointer drags into angular velocity, settles the ring on an item
//! after release and reports which item faces the viewer.

pub mod easing;
pub mod engine;
pub mod entrance;
pub mod projection;
pub mod ring;
pub mod settings;
pub mod settle;

pub use easing::Easing;
pub use engine::{Carousel, CursorShape, DragSession, PhaseKind, Tick};
pub use entrance::{Entrance, EntranceFrame};
pub use projection::{ItemFrame, Point, Projection, Rect};
pub use ring::{FULL_TURN, ImageRef, ItemTransform, Ring, RingError, normalize};
pub use settings::{EntranceSettings, Inertia, Responsive, RingSettings};
pub use settle::{AnimationToken, Sample, Settle};
