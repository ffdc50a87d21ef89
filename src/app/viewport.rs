use eframe::egui::{Pos2, Rect, Vec2, vec2};

const MIN_ZOOM: f32 = 0.25;
const MAX_ZOOM: f32 = 2.5;
const DEFAULT_PAN: Vec2 = vec2(0.0, 20.0);
const DEFAULT_ZOOM: f32 = 0.82;
/// Zoom change per unit of scroll delta.
const SCROLL_ZOOM_STEP: f32 = 0.001;
const FIT_MARGIN: f32 = 0.9;

/// Pan and zoom of the canvas. Screen coordinates here are relative to the
/// canvas' top-left corner: `screen = graph * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: DEFAULT_PAN,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    pub fn to_screen(&self, graph: Pos2) -> Pos2 {
        (graph.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    pub fn to_graph(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn zoom_by_scroll(&mut self, scroll: f32) {
        self.set_zoom(self.zoom + scroll * SCROLL_ZOOM_STEP);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Centres `bounds` in a viewport of `size` and zooms so it fits with a
    /// margin. Degenerate bounds count as one unit wide.
    pub fn fit_to_bounds(&mut self, bounds: Rect, size: Vec2) {
        if !bounds.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }

        let width = bounds.width().max(1.0);
        let height = bounds.height().max(1.0);
        self.set_zoom((size.x / width).min(size.y / height) * FIT_MARGIN);
        self.pan = size * 0.5 - bounds.center().to_vec2() * self.zoom;
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum Gesture {
    Idle,
    NodeDrag {
        id: String,
        start_pointer: Pos2,
        origin: Pos2,
        current: Pos2,
    },
    Pan {
        start_pointer: Pos2,
        start_pan: Vec2,
    },
}

/// Decides at pointer-down whether a drag moves a node or the canvas, and
/// sticks to that decision until release.
#[derive(Debug)]
pub(in crate::app) struct GestureController {
    gesture: Gesture,
}

impl Default for GestureController {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
        }
    }
}

impl GestureController {
    /// `hit` is the node under the pointer with its resolved graph position.
    pub fn begin(&mut self, pointer: Pos2, hit: Option<(String, Pos2)>, viewport: &Viewport) {
        self.gesture = match hit {
            Some((id, origin)) => Gesture::NodeDrag {
                id,
                start_pointer: pointer,
                origin,
                current: origin,
            },
            None => Gesture::Pan {
                start_pointer: pointer,
                start_pan: viewport.pan,
            },
        };
    }

    pub fn update(&mut self, pointer: Pos2, viewport: &mut Viewport) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::NodeDrag {
                start_pointer,
                origin,
                current,
                ..
            } => {
                let moved = viewport.to_graph(pointer) - viewport.to_graph(*start_pointer);
                *current = *origin + moved;
            }
            Gesture::Pan {
                start_pointer,
                start_pan,
            } => {
                viewport.pan = *start_pan + (pointer - *start_pointer);
            }
        }
    }

    /// Finishes the gesture, yielding the dropped node and its final position.
    pub fn end(&mut self) -> Option<(String, Pos2)> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::NodeDrag { id, current, .. } => Some((id, current)),
            Gesture::Idle | Gesture::Pan { .. } => None,
        }
    }

    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Node currently being dragged and its live position.
    pub fn dragged_node(&self) -> Option<(&str, Pos2)> {
        match &self.gesture {
            Gesture::NodeDrag { id, current, .. } => Some((id.as_str(), *current)),
            Gesture::Idle | Gesture::Pan { .. } => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }
}
