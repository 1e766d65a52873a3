use crate::config::{self, WindowConfig};
use crate::events::AppEvent;
use crate::gui::animator::FrameDriver;
use crate::gui::ring::{self, Caption, RingModel, model::stage_center};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use spindle::Point;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub struct AppModel {
    pub ring: Rc<RefCell<RingModel>>,
    pub caption: Caption,
    pub title: String,
    pub default_size: (i32, i32),
    pub config_path: PathBuf,
    pub events_tx: async_channel::Sender<AppEvent>,
    pub drawing_area: gtk::DrawingArea,
    pub frames: FrameDriver,
}

#[derive(Debug)]
pub enum AppMsg {
    DragBegin(f64),
    DragUpdate(f64),
    DragEnd,
    DragCancel,
    Hover(Point),
    HoverLeave,
    Step(i64),
    Resize(i32),
    ActiveChanged(usize),
    Settled(usize),
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ActiveChanged(i) => AppMsg::ActiveChanged(i),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Forwards active index changes from the engine into the UI event channel.
pub fn active_notifier(tx: async_channel::Sender<AppEvent>) -> impl FnMut(usize) + 'static {
    move |index| {
        if tx.try_send(AppEvent::ActiveChanged(index)).is_err() {
            log::warn!("Dropped active item change to {}", index);
        }
    }
}

pub struct AppInit {
    pub ring: RingModel,
    pub window: WindowConfig,
    pub config_path: PathBuf,
    pub events_tx: async_channel::Sender<AppEvent>,
    pub events_rx: async_channel::Receiver<AppEvent>,
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some(&model.title),
            set_default_size: (model.default_size.0, model.default_size.1),
            add_css_class: "orbit-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    let msg = if key == gtk::gdk::Key::Escape {
                        AppMsg::Quit
                    } else if key == gtk::gdk::Key::Left {
                        AppMsg::Step(-1)
                    } else if key == gtk::gdk::Key::Right {
                        AppMsg::Step(1)
                    } else {
                        return glib::Propagation::Proceed;
                    };
                    sender.input(msg);
                    glib::Propagation::Stop
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 8,

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "orbit-stage",

                    connect_resize[sender] => move |_, width, _| {
                        sender.input(AppMsg::Resize(width));
                    },

                    add_controller = gtk::EventControllerMotion {
                        connect_motion[sender] => move |_, x, y| {
                            sender.input(AppMsg::Hover(Point::new(x, y)));
                        },
                        connect_leave[sender] => move |_| {
                            sender.input(AppMsg::HoverLeave);
                        }
                    },

                    add_controller = gtk::GestureDrag {
                        connect_drag_begin[sender] => move |_, x, _| {
                            sender.input(AppMsg::DragBegin(x));
                        },
                        connect_drag_update[sender] => move |gesture, offset_x, _| {
                            if let Some((start_x, _)) = gesture.start_point() {
                                sender.input(AppMsg::DragUpdate(start_x + offset_x));
                            }
                        },
                        connect_drag_end[sender] => move |_, _, _| {
                            sender.input(AppMsg::DragEnd);
                        },
                        connect_cancel[sender] => move |_, _| {
                            sender.input(AppMsg::DragCancel);
                        }
                    }
                },

                gtk::Label {
                    set_label: "Drag to rotate",
                    add_css_class: "orbit-hint",
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 4,
                    add_css_class: "orbit-caption",

                    gtk::Label {
                        #[watch]
                        set_label: &model.caption.position,
                        add_css_class: "orbit-caption-position",
                    },
                    gtk::Label {
                        #[watch]
                        set_label: &model.caption.title,
                        add_css_class: "orbit-caption-title",
                    },
                    gtk::Label {
                        #[watch]
                        set_label: &model.caption.description,
                        set_wrap: true,
                        set_max_width_chars: 64,
                        set_justify: gtk::Justification::Center,
                        add_css_class: "orbit-caption-description",
                    },
                    gtk::Label {
                        #[watch]
                        set_label: &model.caption.tags,
                        add_css_class: "orbit-caption-tags",
                    },
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            ring,
            window: window_config,
            config_path,
            events_tx,
            events_rx,
        } = init;

        theme::load_css();

        let caption = ring.caption(ring.carousel.active_index());
        let ring = Rc::new(RefCell::new(ring));

        let model = AppModel {
            ring: ring.clone(),
            caption,
            title: window_config.title.clone(),
            default_size: (window_config.width, window_config.height),
            config_path,
            events_tx,
            drawing_area: gtk::DrawingArea::default(),
            frames: FrameDriver::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let ring_draw = model.ring.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = ring::draw(
                    cr,
                    &ring_draw.borrow(),
                    &colors,
                    width as f64,
                    height as f64,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        window::apply_cursor(&model.drawing_area, ring.borrow().carousel.cursor());
        model.frames.play_entrance(&model.drawing_area, ring);

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events_rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::DragBegin(x) => {
                // a refused drag leaves the running settle to finish
                if self.ring.borrow_mut().carousel.pointer_down(x) {
                    self.frames.stop_settle();
                    self.refresh_cursor();
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::DragUpdate(x) => {
                self.ring.borrow_mut().carousel.pointer_move(x);
                self.drawing_area.queue_draw();
            }
            AppMsg::DragEnd => {
                let token = self.ring.borrow_mut().carousel.pointer_up();
                if let Some(token) = token {
                    self.drive_settle(token, &sender);
                }
                self.refresh_cursor();
            }
            AppMsg::DragCancel => {
                self.ring.borrow_mut().carousel.pointer_cancel();
                self.refresh_cursor();
            }
            AppMsg::Hover(point) => {
                let changed = {
                    let mut ring = self.ring.borrow_mut();
                    if ring.carousel.is_dragging() {
                        return;
                    }
                    let (w, h) = window::drawing_size(&self.drawing_area);
                    let hit = ring.card_at(point, stage_center(w, h));
                    ring.carousel.hover(hit)
                };
                if changed {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::HoverLeave => {
                if self.ring.borrow_mut().carousel.hover(None) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Step(offset) => {
                let token = self.ring.borrow_mut().carousel.step_by(offset);
                if let Some(token) = token {
                    self.drive_settle(token, &sender);
                }
            }
            AppMsg::Resize(width) => {
                if self
                    .ring
                    .borrow_mut()
                    .carousel
                    .set_viewport_width(width as f64)
                {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::ActiveChanged(index) => {
                self.caption = self.ring.borrow().caption(index);
            }
            AppMsg::Settled(index) => {
                log::debug!("Ring settled on item {}", index);
            }
            AppMsg::ConfigReload => self.reload(),
            AppMsg::Quit => {
                self.frames.stop_all();
                self.ring.borrow_mut().carousel.cancel();
                relm4::main_application().quit();
            }
        }
    }
}

impl AppModel {
    fn drive_settle(&self, token: spindle::AnimationToken, sender: &ComponentSender<Self>) {
        let sender = sender.clone();
        self.frames
            .drive_settle(&self.drawing_area, self.ring.clone(), token, move |index| {
                sender.input(AppMsg::Settled(index));
            });
    }

    fn refresh_cursor(&self) {
        window::apply_cursor(&self.drawing_area, self.ring.borrow().carousel.cursor());
    }

    fn reload(&mut self) {
        let new_config = match config::load_config(&self.config_path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };

        let notifier = active_notifier(self.events_tx.clone());
        match RingModel::from_config(&new_config, &self.config_path, notifier) {
            Ok(new_ring) => {
                self.frames.stop_all();
                *self.ring.borrow_mut() = new_ring;
                let (width, _) = window::drawing_size(&self.drawing_area);
                self.ring
                    .borrow_mut()
                    .carousel
                    .set_viewport_width(width);
                self.frames
                    .play_entrance(&self.drawing_area, self.ring.clone());
                self.refresh_cursor();
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Keeping the current ring: {}", e),
        }
    }
}
