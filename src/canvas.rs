//! What the viewer needs from a graphics toolkit.

use crate::presenter::Highlight;
use crate::state::Vector3;

/// How something should look. The toolkit picks the actual colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    OwnShip,
    InRange,
    NewInRange,
    Label,
    TargetLine,
    Hud,
}
impl From<Highlight> for Style {
    fn from(highlight: Highlight) -> Self {
        match highlight {
            Highlight::Own => Style::OwnShip,
            Highlight::Steady => Style::InRange,
            Highlight::NewInRange => Style::NewInRange,
        }
    }
}

/// Draw calls in world coordinates.
pub trait Canvas {
    fn draw_circle(&mut self, center: Vector3, radius: f64, stroke_width: f64, style: Style);
    fn draw_line(&mut self, from: Vector3, to: Vector3, stroke_width: f64, style: Style);
    fn draw_label(&mut self, position: Vector3, text: &str, style: Style);
    /// Text fixed to the screen's corner.
    fn draw_hud_label(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Digit(u8),
    Left,
    Right,
    Up,
    Down,
    MouseLeft,
}

pub trait Input {
    /// Held down this frame.
    fn is_pressed(&self, key: Key) -> bool;
    /// Went down this frame.
    fn just_pressed(&self, key: Key) -> bool;
    /// Scroll steps this frame. Positive zooms in.
    fn mouse_scroll(&self) -> f64;
    fn mouse_world_position(&self) -> Vector3;
}
