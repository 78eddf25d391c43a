use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::util::{parse_hex_color, soc_major_group, stable_pair};

/// Nominal and maximum element sizes for semantic zoom. Sizes are in world
/// units; drawing multiplies by the zoom scale, so on-screen growth is
/// capped at `max` while the nominal size is kept whenever the view is
/// zoomed out past 1.0.
pub(super) const NOMINAL_STROKE_WIDTH: f32 = 1.0;
pub(super) const MAX_STROKE_WIDTH: f32 = 4.5;
pub(super) const NOMINAL_NODE_RADIUS: f32 = 5.0;
pub(super) const MAX_NODE_RADIUS: f32 = 22.5;
pub(super) const NOMINAL_LABEL_SIZE: f32 = 10.0;
pub(super) const MAX_LABEL_SIZE: f32 = 45.0;

pub(super) const EDGE_COLOR: Color32 = Color32::from_rgb(118, 124, 134);

const NODE_PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

pub(super) fn stroke_width(zoom: f32) -> f32 {
    (MAX_STROKE_WIDTH / zoom).min(NOMINAL_STROKE_WIDTH)
}

pub(super) fn label_font_size(zoom: f32) -> f32 {
    (MAX_LABEL_SIZE / zoom).min(NOMINAL_LABEL_SIZE)
}

fn base_node_radius(zoom: f32) -> f32 {
    (MAX_NODE_RADIUS / zoom).min(NOMINAL_NODE_RADIUS)
}

/// World-unit radius for a node under semantic zoom. Sized nodes scale
/// their size radius by the clamped base factor; unsized nodes fall back
/// to the clamped base radius itself.
pub(super) fn node_radius(size_radius: Option<f32>, zoom: f32) -> f32 {
    let base = base_node_radius(zoom);
    match size_radius {
        Some(radius) => radius * (base / NOMINAL_NODE_RADIUS),
        None => base,
    }
}

pub(super) fn size_radius(size: f32) -> f32 {
    (NOMINAL_NODE_RADIUS * size.max(0.0).sqrt()).clamp(2.0, 30.0)
}

pub(super) fn node_fill(color: Option<&str>, code: &str) -> Color32 {
    if let Some(raw) = color
        && let Some((r, g, b)) = parse_hex_color(raw)
    {
        return Color32::from_rgb(r, g, b);
    }

    let slot = match soc_major_group(code) {
        Some(group) => group as usize,
        None => {
            let (x, _y) = stable_pair(code);
            ((x + 1.0) * 64.0) as usize
        }
    };
    NODE_PALETTE[slot % NODE_PALETTE.len()]
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(21, 24, 30));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(58, 66, 78, 66)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(58, 66, 78, 66)),
        );
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}
