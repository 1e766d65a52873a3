use crate::gui::ring::RingModel;
use crate::gui::window::frame_time;
use gtk::prelude::*;
use gtk4 as gtk;
use spindle::{AnimationToken, Tick};
use std::cell::RefCell;
use std::rc::Rc;

type Slot = Rc<RefCell<Option<gtk::TickCallbackId>>>;

/// Owns the tick callbacks that animate the ring.
///
/// At most one settle callback is installed at a time; replacing or stopping
/// it removes the previous callback before another writer touches the angle.
#[derive(Default)]
pub struct FrameDriver {
    settle: Slot,
    entrance: Slot,
}

impl FrameDriver {
    pub fn drive_settle(
        &self,
        area: &gtk::DrawingArea,
        ring: Rc<RefCell<RingModel>>,
        token: AnimationToken,
        on_settled: impl Fn(usize) + 'static,
    ) {
        self.stop_settle();

        let slot = self.settle.clone();
        let id = area.add_tick_callback(move |widget, clock| {
            let tick = ring.borrow_mut().carousel.tick(token, frame_time(clock));
            widget.queue_draw();
            match tick {
                Tick::Running => glib::ControlFlow::Continue,
                Tick::Settled(index) => {
                    slot.borrow_mut().take();
                    on_settled(index);
                    glib::ControlFlow::Break
                }
                Tick::Stale => {
                    slot.borrow_mut().take();
                    glib::ControlFlow::Break
                }
            }
        });
        *self.settle.borrow_mut() = Some(id);
    }

    pub fn stop_settle(&self) {
        if let Some(id) = self.settle.borrow_mut().take() {
            id.remove();
        }
    }

    pub fn play_entrance(&self, area: &gtk::DrawingArea, ring: Rc<RefCell<RingModel>>) {
        self.stop_entrance();
        ring.borrow_mut().restart_entrance();

        let slot = self.entrance.clone();
        let id = area.add_tick_callback(move |widget, clock| {
            let finished = ring.borrow_mut().advance_entrance(frame_time(clock));
            widget.queue_draw();
            if finished {
                slot.borrow_mut().take();
                glib::ControlFlow::Break
            } else {
                glib::ControlFlow::Continue
            }
        });
        *self.entrance.borrow_mut() = Some(id);
    }

    pub fn stop_entrance(&self) {
        if let Some(id) = self.entrance.borrow_mut().take() {
            id.remove();
        }
    }

    pub fn stop_all(&self) {
        self.stop_settle();
        self.stop_entrance();
    }
}
