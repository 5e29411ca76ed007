//! Bubble chart: a pure layout pass plus a canvas widget that draws it.
//!
//! Layout works in "physical" units where one unit is the same length on
//! both axes. A terminal cell is about twice as tall as it is wide, so the
//! canvas height in units is twice its row count; circles then stay round.

use crate::app::App;
use crate::dashboard::BubblePoint;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders,
    },
    Frame,
};

/// Fraction of a grid cell a maximum-size bubble may fill.
const FILL: f64 = 0.9;
/// Smallest drawn radius so single-member genres stay visible.
const MIN_RADIUS: f64 = 0.75;

/// Where one bubble lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleSlot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Width of the grid cell, for fitting the label.
    pub cell_width: f64,
}

/// Place `points` on a `width` x `height` canvas.
///
/// Bubbles fill a grid in reading order (left to right, top to bottom), one
/// per cell. Bubble area is proportional to `size`: the largest point gets
/// the full cell radius and the others scale by `sqrt(size / max)`.
pub fn layout_bubbles(points: &[BubblePoint], width: f64, height: f64) -> Vec<BubbleSlot> {
    let n = points.len();
    if n == 0 || width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }

    let cols = ((n as f64 * width / height).sqrt().ceil() as usize).clamp(1, n);
    let rows = n.div_ceil(cols);
    let cell_w = width / cols as f64;
    let cell_h = height / rows as f64;
    let max_radius = (cell_w.min(cell_h) / 2.0 * FILL).max(MIN_RADIUS);
    let max_size = points.iter().map(|p| p.size).max().unwrap_or(0).max(1) as f64;

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let col = i % cols;
            let row = i / cols;
            let scale = (point.size as f64 / max_size).sqrt();
            BubbleSlot {
                x: (col as f64 + 0.5) * cell_w,
                y: height - (row as f64 + 0.5) * cell_h,
                radius: (max_radius * scale).max(MIN_RADIUS),
                cell_width: cell_w,
            }
        })
        .collect()
}

fn fg(style: Style) -> Color {
    style.fg.unwrap_or(Color::Reset)
}

/// Render the chart for the current payload.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(Span::styled(
            format!(" {} ", app.payload.title),
            app.style("chart_title"),
        ));
    if app.payload.show_back {
        block = block.title_bottom(Line::from(" Esc: back to all genres ").right_aligned());
    }

    let inner = block.inner(area);
    let width = f64::from(inner.width);
    let height = f64::from(inner.height) * 2.0;
    let slots = layout_bubbles(&app.payload.points, width, height);

    let normal = fg(app.style("bubble_normal"));
    let selected = fg(app.style("bubble_selected"));
    let label_style = app.style("bubble_label");
    let selected_label_style = app.style("bubble_selected");

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for (i, slot) in slots.iter().enumerate() {
                let is_selected = i == app.selected;
                let color = if is_selected { selected } else { normal };
                ctx.draw(&Circle {
                    x: slot.x,
                    y: slot.y,
                    radius: slot.radius,
                    color,
                });
                if is_selected && slot.radius > 1.5 {
                    ctx.draw(&Circle {
                        x: slot.x,
                        y: slot.y,
                        radius: slot.radius - 1.0,
                        color,
                    });
                }
            }

            // Labels go on a layer above the circles.
            ctx.layer();
            for (i, (slot, point)) in slots.iter().zip(&app.payload.points).enumerate() {
                let max_chars = slot.cell_width.floor().max(1.0) as usize;
                let text = format!("{} ({})", point.label, point.size);
                let text = truncate_to_width(&text, max_chars).into_owned();
                let half = (text.chars().count() as f64 / 2.0).floor();
                let style = if i == app.selected {
                    selected_label_style
                } else {
                    label_style
                };
                ctx.print(
                    (slot.x - half).max(0.0),
                    slot.y,
                    Line::from(Span::styled(text, style)),
                );
            }
        });

    f.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn points(sizes: &[usize]) -> Vec<BubblePoint> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| BubblePoint {
                label: format!("g{i}"),
                size,
            })
            .collect()
    }

    #[test]
    fn test_empty_layout() {
        assert!(layout_bubbles(&[], 100.0, 50.0).is_empty());
        assert!(layout_bubbles(&points(&[1]), 0.0, 50.0).is_empty());
    }

    #[test]
    fn test_single_bubble_is_centered() {
        let slots = layout_bubbles(&points(&[5]), 100.0, 60.0);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].x, 50.0);
        assert_eq!(slots[0].y, 30.0);
        assert!((slots[0].radius - 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_proportional_to_size() {
        let slots = layout_bubbles(&points(&[100, 25]), 200.0, 100.0);
        let ratio = slots[1].radius / slots[0].radius;
        assert!((ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_reading_order() {
        let slots = layout_bubbles(&points(&[1, 1, 1, 1]), 100.0, 100.0);
        // 2x2 grid
        assert!(slots[0].x < slots[1].x);
        assert_eq!(slots[0].y, slots[1].y);
        assert!(slots[2].y < slots[0].y);
        assert_eq!(slots[2].x, slots[0].x);
    }

    proptest! {
        #[test]
        fn bubbles_stay_inside_canvas(
            sizes in prop::collection::vec(1usize..500, 1..60),
            width in 20.0f64..300.0,
            height in 20.0f64..200.0,
        ) {
            let slots = layout_bubbles(&points(&sizes), width, height);
            prop_assert_eq!(slots.len(), sizes.len());
            for slot in slots {
                prop_assert!(slot.x > 0.0 && slot.x < width);
                prop_assert!(slot.y > 0.0 && slot.y < height);
                prop_assert!(slot.radius >= MIN_RADIUS);
            }
        }
    }
}
