use super::model::{Card, RingModel, stage_center};
use super::{ACTIVE_RING_ALPHA, ACTIVE_RING_WIDTH, CARD_CORNER_RADIUS, PLACEHOLDER_FONT_SIZE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use spindle::{ItemFrame, Point, Rect};
use std::f64::consts::PI;

struct CardRenderer<'a> {
    card: &'a Card,
    frame: &'a ItemFrame,
    rect: Rect,
}

impl<'a> CardRenderer<'a> {
    fn new(card: &'a Card, frame: &'a ItemFrame, center: Point) -> Self {
        Self {
            card,
            frame,
            rect: frame.rect.translate(center.x, center.y),
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if self.rect.width < 1.0 || self.frame.opacity <= 0.0 {
            return Ok(());
        }
        cr.save()?;
        self.card_path(cr);
        cr.clip();
        self.draw_content(cr, colors)?;
        cr.restore()?;
        if self.frame.active {
            self.draw_active_ring(cr, colors)?;
        }
        Ok(())
    }

    fn card_path(&self, cr: &Context) {
        let Rect {
            x,
            y,
            width,
            height,
        } = self.rect;
        let r = CARD_CORNER_RADIUS
            .min(width / 2.0)
            .min(height / 2.0);
        cr.new_sub_path();
        cr.arc(x + width - r, y + r, r, -PI / 2.0, 0.0);
        cr.arc(x + width - r, y + height - r, r, 0.0, PI / 2.0);
        cr.arc(x + r, y + height - r, r, PI / 2.0, PI);
        cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
        cr.close_path();
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        match &self.card.pixbuf {
            Some(pixbuf) => self.draw_image(cr, pixbuf),
            None => self.draw_placeholder(cr, colors),
        }
    }

    fn draw_image(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        // cover the card, then slide the image by the parallax offset
        let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
        let cover = (self.rect.width / pw).max(self.rect.height / ph);
        let (iw, ih) = (pw * cover, ph * cover);
        let ix = self.rect.x + (self.rect.width - iw) / 2.0 + self.frame.background_offset;
        let iy = self.rect.y + (self.rect.height - ih) / 2.0;

        cr.translate(ix, iy);
        cr.scale(cover, cover);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint_with_alpha(self.frame.opacity)
    }

    fn draw_placeholder(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let (r, g, b, a) = colors.placeholder.into_components();
        cr.set_source_rgba(r, g, b, a * self.frame.opacity);
        cr.paint()?;

        let (r, g, b, _) = colors.text.into_components();
        cr.set_source_rgba(r, g, b, self.frame.opacity);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(PLACEHOLDER_FONT_SIZE * (self.rect.height / 170.0).clamp(0.5, 2.0));
        if let Ok(ext) = cr.text_extents(&self.card.item.title) {
            let c = self.rect.center();
            cr.move_to(c.x - ext.width() / 2.0, c.y + ext.height() / 2.0);
            cr.show_text(&self.card.item.title)?;
        }
        Ok(())
    }

    fn draw_active_ring(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let (r, g, b, _) = colors.accent.into_components();
        cr.set_source_rgba(r, g, b, ACTIVE_RING_ALPHA * self.frame.opacity);
        cr.set_line_width(ACTIVE_RING_WIDTH);
        self.card_path(cr);
        cr.stroke()
    }
}

pub fn draw(
    cr: &Context,
    ring: &RingModel,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    if let Some(bg) = ring.background {
        let (r, g, b) = bg.to_rgb();
        cr.set_source_rgb(r, g, b);
        cr.paint()?;
    }

    let center = stage_center(width, height);
    for frame in ring.frames() {
        if let Some(card) = ring.cards.get(frame.index) {
            CardRenderer::new(card, &frame, center).draw(cr, colors)?;
        }
    }
    Ok(())
}
