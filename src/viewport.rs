use egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.05;
pub const MAX_ZOOM: f32 = 3.0;
/// Fit-to-container leaves a 10% margin around the document.
pub const FIT_MARGIN: f32 = 0.9;

/// What the pointer is currently doing. The modes are mutually exclusive;
/// entering `Dragging` or `Panning` requires resolving through the hit
/// tester first, and any pointer release returns to `Idle`.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionMode {
    Idle,
    Dragging {
        id: String,
        /// Offset from the grab point to the element anchor, in document
        /// pixels, so the element does not jump under the pointer.
        grab_offset: Vec2,
    },
    Panning {
        last: Pos2,
    },
    Pinching {
        last_distance: f32,
    },
}

/// Zoom/pan transform between screen space and document pixel space. Owns no
/// document state.
#[derive(Debug)]
pub struct Viewport {
    zoom: f32,
    pub pan: Vec2,
    pub mode: InteractionMode,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            mode: InteractionMode::Idle,
        }
    }
}

impl Viewport {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    /// Scale the document to fit the container with a margin and reset the
    /// pan. Called on load, on container resize, and whenever the document
    /// dimensions change.
    pub fn fit_to_container(&mut self, container: Vec2, doc_w: u32, doc_h: u32) {
        if doc_w == 0 || doc_h == 0 || container.x <= 0.0 || container.y <= 0.0 {
            return;
        }
        let scale_x = container.x / doc_w as f32;
        let scale_y = container.y / doc_h as f32;
        self.set_zoom(scale_x.min(scale_y) * FIT_MARGIN);
        self.pan = Vec2::ZERO;
    }

    /// The rect the rendered document occupies on screen: document size
    /// scaled by zoom, centered in the panel, shifted by the pan offset.
    pub fn canvas_rect(&self, panel: Rect, doc_w: u32, doc_h: u32) -> Rect {
        let size = Vec2::new(doc_w as f32 * self.zoom, doc_h as f32 * self.zoom);
        Rect::from_center_size(panel.center() + self.pan, size)
    }

    pub fn begin_drag(&mut self, id: String, grab_offset: Vec2) {
        self.mode = InteractionMode::Dragging { id, grab_offset };
    }

    pub fn begin_pan(&mut self, at: Pos2) {
        self.mode = InteractionMode::Panning { last: at };
    }

    /// Pan by the pointer delta since the last move, then rebase.
    pub fn pan_move(&mut self, at: Pos2) {
        if let InteractionMode::Panning { last } = &mut self.mode {
            let delta = at - *last;
            *last = at;
            self.pan += delta;
        }
    }

    /// First contact of a two-pointer gesture: record the inter-pointer
    /// distance. A pinch supersedes any drag or pan in progress.
    pub fn begin_pinch(&mut self, distance: f32) {
        self.mode = InteractionMode::Pinching {
            last_distance: distance,
        };
    }

    /// Subsequent two-pointer move: multiplicative zoom, continuously
    /// rebased against the previous frame's distance (not the initial one).
    pub fn pinch_move(&mut self, distance: f32) {
        if let InteractionMode::Pinching { last_distance } = &mut self.mode {
            if *last_distance > 0.0 {
                let scale = distance / *last_distance;
                *last_distance = distance;
                self.set_zoom(self.zoom * scale);
            } else {
                *last_distance = distance;
            }
        }
    }

    /// Pointer released: back to idle regardless of mode.
    pub fn end_interaction(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    pub fn dragged_id(&self) -> Option<&str> {
        match &self.mode {
            InteractionMode::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_formula() {
        let mut vp = Viewport::default();
        vp.pan = Vec2::new(3.0, 4.0);
        vp.fit_to_container(Vec2::new(800.0, 600.0), 1080, 1080);
        let expected = (800.0f32 / 1080.0).min(600.0 / 1080.0) * 0.9;
        assert!((vp.zoom() - expected).abs() < 1e-6);
        assert_eq!(vp.pan, Vec2::ZERO);
    }

    #[test]
    fn zoom_clamped() {
        let mut vp = Viewport::default();
        vp.set_zoom(5.0);
        assert_eq!(vp.zoom(), MAX_ZOOM);
        vp.set_zoom(0.001);
        assert_eq!(vp.zoom(), MIN_ZOOM);
    }

    #[test]
    fn pinch_rebases_every_frame() {
        let mut vp = Viewport::default();
        vp.set_zoom(1.0);
        vp.begin_pinch(100.0);
        vp.pinch_move(150.0); // 1.0 * 1.5
        assert!((vp.zoom() - 1.5).abs() < 1e-6);
        vp.pinch_move(150.0); // rebased: no further change
        assert!((vp.zoom() - 1.5).abs() < 1e-6);
        vp.pinch_move(75.0); // 1.5 * 0.5
        assert!((vp.zoom() - 0.75).abs() < 1e-6);
        vp.end_interaction();
        assert_eq!(vp.mode, InteractionMode::Idle);
    }

    #[test]
    fn pan_adds_delta_and_rebases() {
        let mut vp = Viewport::default();
        vp.begin_pan(Pos2::new(10.0, 10.0));
        vp.pan_move(Pos2::new(15.0, 7.0));
        assert_eq!(vp.pan, Vec2::new(5.0, -3.0));
        vp.pan_move(Pos2::new(20.0, 7.0));
        assert_eq!(vp.pan, Vec2::new(10.0, -3.0));
    }

    #[test]
    fn canvas_rect_is_zoom_scaled_and_pan_shifted() {
        let mut vp = Viewport::default();
        vp.set_zoom(0.5);
        vp.pan = Vec2::new(10.0, -20.0);
        let panel = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let rect = vp.canvas_rect(panel, 1080, 1080);
        assert_eq!(rect.size(), Vec2::new(540.0, 540.0));
        assert_eq!(rect.center(), Pos2::new(410.0, 280.0));
    }
}
