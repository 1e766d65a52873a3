use crate::ring::ItemTransform;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// A card on the inside of a ring of `radius`, seen from `perspective` in front of the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Horizontal offset of the card centre from the axis, on screen.
    pub x: f64,
    /// Perspective magnification, 1.0 at the axis plane.
    pub scale: f64,
    /// Horizontal foreshortening in `[0, 1]`.
    pub squash: f64,
    /// Distance towards the viewer; larger is closer.
    pub depth: f64,
    /// Whether the card's face points at the viewer.
    pub facing: bool,
}

pub fn project(effective_rotation: f64, radius: f64, perspective: f64) -> Projection {
    let (sin, cos) = effective_rotation.to_radians().sin_cos();
    let (x, z) = (radius * sin, -radius * cos);

    // cards face the axis, so the face normal is (-sin, 0, cos)
    let (vx, vz) = (-x, perspective - z);
    let facing_dot = -sin * vx + cos * vz;
    let view_len = vx.hypot(vz);

    let scale = perspective / (perspective - z);
    Projection {
        x: x * scale,
        scale,
        squash: if view_len > 0.0 {
            (facing_dot / view_len).clamp(0.0, 1.0)
        } else {
            0.0
        },
        depth: z,
        facing: facing_dot > 0.0,
    }
}

/// Everything a renderer needs to paint one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemFrame {
    pub index: usize,
    pub transform: ItemTransform,
    /// Card bounds relative to the stage centre.
    pub rect: Rect,
    pub depth: f64,
    /// Parallax shift of the image inside the card, on screen.
    pub background_offset: f64,
    pub opacity: f64,
    pub active: bool,
}

/// Card under `point`, nearest the viewer first. `frames` must be in paint order.
pub fn hit_test(frames: &[ItemFrame], point: Point) -> Option<usize> {
    frames
        .iter()
        .rev()
        .find(|f| f.rect.contains(point))
        .map(|f| f.index)
}

pub fn sort_for_painting(frames: &mut [ItemFrame]) {
    frames.sort_by(|a, b| a.depth.total_cmp(&b.depth));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize, rect: Rect, depth: f64) -> ItemFrame {
        ItemFrame {
            index,
            transform: ItemTransform {
                rotation: 0.0,
                depth: -500.0,
                effective_rotation: 0.0,
                background_offset: 0.0,
            },
            rect,
            depth,
            background_offset: 0.0,
            opacity: 1.0,
            active: false,
        }
    }

    #[test]
    fn test_front_card_faces_viewer_centered() {
        let p = project(0.0, 500.0, 2000.0);
        assert!(p.facing);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.depth, -500.0);
        assert!((p.scale - 0.8).abs() < 1e-12);
        assert!((p.squash - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_back_of_ring_is_hidden() {
        assert!(!project(180.0, 500.0, 2000.0).facing);
        assert!(!project(150.0, 500.0, 2000.0).facing);
    }

    #[test]
    fn test_side_cards_are_foreshortened_and_closer() {
        let front = project(0.0, 500.0, 2000.0);
        let side = project(60.0, 500.0, 2000.0);
        assert!(side.facing);
        assert!(side.squash < front.squash);
        assert!(side.depth > front.depth);
        assert!(side.scale > front.scale);
        assert!(side.x > 0.0);
        assert!(project(-60.0, 500.0, 2000.0).x < 0.0);
    }

    #[test]
    fn test_projection_is_symmetric() {
        let left = project(-40.0, 400.0, 1500.0);
        let right = project(40.0, 400.0, 1500.0);
        assert!((left.x + right.x).abs() < 1e-9);
        assert!((left.squash - right.squash).abs() < 1e-12);
    }

    #[test]
    fn test_hit_test_prefers_nearest_card() {
        let mut frames = vec![
            frame(0, Rect::centered(Point::default(), 100.0, 60.0), 50.0),
            frame(1, Rect::centered(Point::new(40.0, 0.0), 100.0, 60.0), -50.0),
        ];
        sort_for_painting(&mut frames);
        assert_eq!(frames[0].index, 1);
        assert_eq!(hit_test(&frames, Point::new(10.0, 0.0)), Some(0));
        assert_eq!(hit_test(&frames, Point::new(85.0, 0.0)), Some(1));
        assert_eq!(hit_test(&frames, Point::new(0.0, 100.0)), None);
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::centered(Point::new(10.0, 20.0), 4.0, 6.0);
        assert_eq!(r, Rect { x: 8.0, y: 17.0, width: 4.0, height: 6.0 });
        assert_eq!(r.center(), Point::new(10.0, 20.0));
        assert!(r.translate(1.0, 1.0).contains(Point::new(12.5, 23.5)));
    }
}
