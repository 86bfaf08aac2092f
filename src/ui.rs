use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use tui_globe::braille::BrailleCanvas;
use tui_globe::map::{LayerKind, PaintOp, Stroke};

/// Render the UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Globe
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_globe(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_globe(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Globe ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Snapshot the viewport at the drawable braille resolution.
    let mut viewport = app.viewport.clone();
    let _ = viewport.resize(inner.width as i32 * 2, inner.height as i32 * 4);

    let ops = app.compositor.composite(&viewport, &app.layers);
    let layers = ops
        .iter()
        .map(|op| rasterize(op, inner.width as usize, inner.height as usize))
        .collect();

    frame.render_widget(GlobeWidget { layers }, inner);
}

/// Rasterize one paint operation onto its own canvas; the widget blits the
/// canvases back-to-front in the compositor's order.
fn rasterize(op: &PaintOp, width: usize, height: usize) -> (Color, BrailleCanvas) {
    let mut canvas = BrailleCanvas::new(width, height);
    for chain in &op.path.chains {
        match op.style.stroke {
            Stroke::Fill => {
                if chain.closed {
                    canvas.fill_polygon(&chain.points);
                } else {
                    // A fill ring split at the horizon degrades to its outline.
                    canvas.stroke_path(&chain.points, false, false);
                }
            }
            Stroke::Solid => canvas.stroke_path(&chain.points, chain.closed, false),
            Stroke::Dotted => canvas.stroke_path(&chain.points, chain.closed, true),
        }
    }
    (to_color(op.style.color), canvas)
}

fn to_color(rgba: [f32; 4]) -> Color {
    Color::Rgb(
        (rgba[0].clamp(0.0, 1.0) * 255.0) as u8,
        (rgba[1].clamp(0.0, 1.0) * 255.0) as u8,
        (rgba[2].clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Widget that overlays one colored braille canvas per layer.
struct GlobeWidget {
    layers: Vec<(Color, BrailleCanvas)>,
}

impl Widget for GlobeWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (color, canvas) in &self.layers {
            for (row_idx, row_str) in canvas.rows().enumerate() {
                if row_idx >= area.height as usize {
                    break;
                }
                let y = area.y + row_idx as u16;
                for (col_idx, ch) in row_str.chars().enumerate() {
                    if col_idx >= area.width as usize {
                        break;
                    }
                    // Skip empty braille characters (U+2800).
                    if ch == '\u{2800}' {
                        continue;
                    }
                    let x = area.x + col_idx as u16;
                    buf[(x, y)].set_char(ch).set_fg(*color);
                }
            }
        }
    }
}

fn toggle_span(label_on: &'static str, label_off: &'static str, on: bool) -> Span<'static> {
    Span::styled(
        if on { label_on } else { label_off },
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let compositor = &app.compositor;

    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" ", Style::default()),
        toggle_span("[I]ce ", "[i]ce ", compositor.is_visible(LayerKind::Ice)),
        toggle_span(
            "[B]orders ",
            "[b]orders ",
            compositor.is_visible(LayerKind::CountryBorder),
        ),
        toggle_span(
            "[R]ivers ",
            "[r]ivers ",
            compositor.is_visible(LayerKind::River),
        ),
        toggle_span(
            "[L]akes ",
            "[l]akes ",
            compositor.is_visible(LayerKind::Lake),
        ),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | arrows:rotate +/-:zoom 0:home q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
