pub mod animator;
pub mod app;
pub mod ring;
pub mod theme;
pub mod window;
