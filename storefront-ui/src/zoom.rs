//! Click and pinch zoom for the product detail image.

use crate::dom::ElementHandle;
use crate::error::Result;

pub const MIN_PINCH_SCALE: f64 = 1.0;
pub const MAX_PINCH_SCALE: f64 = 2.0;

const ZOOMED_CLASS: &str = "zoomed";
const CURSOR_ZOOM_IN: &str = "zoom-in";
const CURSOR_ZOOM_OUT: &str = "zoom-out";

/// One finger, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub page_x: f64,
    pub page_y: f64,
}

impl TouchPoint {
    pub fn new(page_x: f64, page_y: f64) -> Self {
        Self { page_x, page_y }
    }
}

/// Distance between two fingers, or `None` unless exactly two are down.
pub fn pinch_distance(touches: &[TouchPoint]) -> Option<f64> {
    match touches {
        [a, b] => Some((a.page_x - b.page_x).hypot(a.page_y - b.page_y)),
        _ => None,
    }
}

/// Pinch scale for the current finger distance, clamped to
/// `[MIN_PINCH_SCALE, MAX_PINCH_SCALE]`. `None` without a usable start
/// distance.
pub fn pinch_scale(start_distance: f64, current_distance: f64) -> Option<f64> {
    if start_distance.is_nan() || start_distance <= 0.0 || !current_distance.is_finite() {
        return None;
    }
    Some((current_distance / start_distance).clamp(MIN_PINCH_SCALE, MAX_PINCH_SCALE))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    pub zoomed: bool,
    pub scale: f64,
    pub start_distance: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            zoomed: false,
            scale: MIN_PINCH_SCALE,
            start_distance: 0.0,
        }
    }
}

/// Zoom behaviour bound to a single image element.
#[derive(Debug, Clone)]
pub struct ProductZoom<E> {
    image: E,
    state: ZoomState,
}

impl<E: ElementHandle> ProductZoom<E> {
    pub fn new(image: E) -> Self {
        Self {
            image,
            state: ZoomState::default(),
        }
    }

    pub fn image(&self) -> &E {
        &self.image
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    /// Toggle between normal and zoomed.
    pub fn click(&mut self) {
        self.state.zoomed = !self.state.zoomed;
        let zoomed = self.state.zoomed;
        if let Err(e) = self.show_zoomed(zoomed) {
            log::error!("Error toggling product zoom: {}", e);
        }
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) {
        if let Some(distance) = pinch_distance(touches) {
            self.state.start_distance = distance;
        }
    }

    /// Returns true when the move was a pinch and the browser's own gesture
    /// handling should be suppressed.
    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> bool {
        let Some(distance) = pinch_distance(touches) else {
            return false;
        };
        let Some(scale) = pinch_scale(self.state.start_distance, distance) else {
            log::debug!("Pinch move without a start distance, ignoring");
            return true;
        };

        self.state.scale = scale;
        if let Err(e) = self.image.set_style("transform", &scale_transform(scale)) {
            log::error!("Error applying pinch zoom: {}", e);
        }
        true
    }

    pub fn touch_end(&mut self) {
        if self.state.scale > MIN_PINCH_SCALE {
            return;
        }
        self.state.zoomed = false;
        let reset = self
            .show_zoomed(false)
            .and_then(|()| self.image.set_style("transform", &scale_transform(MIN_PINCH_SCALE)));
        if let Err(e) = reset {
            log::error!("Error resetting product zoom: {}", e);
        }
    }

    fn show_zoomed(&self, zoomed: bool) -> Result<()> {
        self.image.set_class(ZOOMED_CLASS, zoomed)?;
        self.image
            .set_style("cursor", if zoomed { CURSOR_ZOOM_OUT } else { CURSOR_ZOOM_IN })
    }
}

fn scale_transform(scale: f64) -> String {
    format!("scale({scale})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDocument, MemoryElement};

    fn zoom() -> ProductZoom<MemoryElement> {
        let doc = MemoryDocument::new();
        ProductZoom::new(doc.create("img").with_id("productImage"))
    }

    fn fingers(distance: f64) -> [TouchPoint; 2] {
        [TouchPoint::new(0.0, 0.0), TouchPoint::new(distance, 0.0)]
    }

    #[test]
    fn click_toggles_zoom() {
        let mut zoom = zoom();
        zoom.click();
        assert!(zoom.state().zoomed);
        assert!(zoom.image().has_class("zoomed"));
        assert_eq!(zoom.image().style("cursor").as_deref(), Some("zoom-out"));

        zoom.click();
        assert!(!zoom.state().zoomed);
        assert!(!zoom.image().has_class("zoomed"));
        assert_eq!(zoom.image().style("cursor").as_deref(), Some("zoom-in"));
    }

    #[test]
    fn pinch_scale_clamps_to_two() {
        let mut zoom = zoom();
        zoom.touch_start(&fingers(100.0));
        assert!(zoom.touch_move(&fingers(300.0)));
        assert_eq!(zoom.state().scale, 2.0);
        assert_eq!(zoom.image().style("transform").as_deref(), Some("scale(2)"));
    }

    #[test]
    fn pinch_scale_is_proportional_within_bounds() {
        let mut zoom = zoom();
        zoom.touch_start(&fingers(100.0));
        zoom.touch_move(&fingers(150.0));
        assert_eq!(zoom.image().style("transform").as_deref(), Some("scale(1.5)"));
    }

    #[test]
    fn pinch_in_clamps_to_one_and_resets_on_release() {
        let mut zoom = zoom();
        zoom.click();
        zoom.touch_start(&fingers(200.0));
        zoom.touch_move(&fingers(50.0));
        assert_eq!(zoom.state().scale, 1.0);

        zoom.touch_end();
        assert!(!zoom.state().zoomed);
        assert!(!zoom.image().has_class("zoomed"));
        assert_eq!(zoom.image().style("transform").as_deref(), Some("scale(1)"));
        assert_eq!(zoom.image().style("cursor").as_deref(), Some("zoom-in"));
    }

    #[test]
    fn release_while_scaled_keeps_zoom() {
        let mut zoom = zoom();
        zoom.click();
        zoom.touch_start(&fingers(100.0));
        zoom.touch_move(&fingers(180.0));
        zoom.touch_end();
        assert!(zoom.state().zoomed);
        assert!(zoom.image().has_class("zoomed"));
    }

    #[test]
    fn single_finger_is_ignored() {
        let mut zoom = zoom();
        zoom.touch_start(&[TouchPoint::new(1.0, 1.0)]);
        assert_eq!(zoom.state().start_distance, 0.0);
        assert!(!zoom.touch_move(&[TouchPoint::new(5.0, 5.0)]));
        assert_eq!(zoom.image().style("transform"), None);
    }

    #[test]
    fn move_without_start_distance_is_ignored() {
        let mut zoom = zoom();
        assert!(zoom.touch_move(&fingers(120.0)));
        assert_eq!(zoom.state().scale, 1.0);
        assert_eq!(zoom.image().style("transform"), None);
    }

    #[test]
    fn pinch_distance_uses_both_axes() {
        let distance = pinch_distance(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(3.0, 4.0)]);
        assert_eq!(distance, Some(5.0));
        assert_eq!(pinch_scale(0.0, 10.0), None);
    }
}
