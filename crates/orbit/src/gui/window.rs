use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use spindle::CursorShape;
use std::time::Duration;

pub fn apply_cursor(widget: &impl IsA<gtk::Widget>, shape: CursorShape) {
    let name: &'static str = shape.into();
    widget.set_cursor_from_name(Some(name));
}

/// Frame clock timestamp as a monotonic duration.
pub fn frame_time(clock: &gdk::FrameClock) -> Duration {
    Duration::from_micros(clock.frame_time().max(0) as u64)
}

pub fn drawing_size(area: &gtk::DrawingArea) -> (f64, f64) {
    (area.width() as f64, area.height() as f64)
}
