use crate::app::{App, Focus};
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    if fullscreen {
        (frame_area.width.saturating_sub(2), frame_area.height.saturating_sub(2))
    } else {
        let canvas_width = frame_area.width.saturating_sub(SIDEBAR_WIDTH + 2);
        let canvas_height = frame_area.height.saturating_sub(2);
        (canvas_width, canvas_height)
    }
}

/// Terminal cell of the canvas's top-left corner (inside the border)
pub fn get_canvas_origin(fullscreen: bool) -> (u16, u16) {
    if fullscreen {
        (1, 1)
    } else {
        (SIDEBAR_WIDTH + 1, 1)
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),  // Status
            Constraint::Length(10), // Parameters
            Constraint::Min(6),     // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Particle Field ");

    let (status_text, status_color) = if app.field.is_running() {
        ("RUNNING", Color::Green)
    } else {
        ("STOPPED", HIGHLIGHT_COLOR)
    };

    let pointer_text = if app.field.pointer.is_active() {
        format!("({:.0}, {:.0})", app.field.pointer.x, app.field.pointer.y)
    } else {
        "-".to_string()
    };

    let content = vec![
        Line::from(Span::styled(
            format!(
                "{} @ {:.0}x{:.0}",
                app.field.particles.len(),
                app.field.width,
                app.field.height
            ),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("Pointer: {}", pointer_text),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
        Line::from(Span::styled(
            app.status_message.clone().unwrap_or_default(),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let settings = &app.field.settings;

    let content = vec![
        make_line("Particles", format!("{}", app.field.count), app.focus == Focus::Particles),
        make_line(
            "Links",
            format!("{:.0}", settings.connection_distance),
            app.focus == Focus::Links,
        ),
        make_line(
            "Link Alpha",
            format!("{:.2}", settings.link_opacity),
            app.focus == Focus::LinkOpacity,
        ),
        make_line("Force", format!("{:.0}", settings.force_radius), app.focus == Focus::Force),
        make_line(
            "Reach",
            format!("{:.0}", settings.pointer_link_radius),
            app.focus == Focus::Reach,
        ),
        make_line(
            "Render",
            settings.render_mode.name().to_string(),
            app.focus == Focus::Render,
        ),
        make_line(
            "Edges",
            settings.boundary_behavior.name().to_string(),
            app.focus == Focus::Boundary,
        ),
        make_line(
            "Color",
            app.color_scheme.name().to_string(),
            app.focus == Focus::ColorScheme,
        ),
    ];

    // Calculate scroll to keep focused item visible based on actual area
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2); // minus borders
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0
    } else if focus_line >= visible_height {
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0
    };

    let paragraph = Paragraph::new(content).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, _app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "start/stop"),
        make_control("R", "respawn"),
        make_control("G", "circles/glyphs"),
        make_control("B", "edge behavior"),
        make_control("C", "color scheme"),
        make_control("V", "fullscreen"),
        make_control("Tab", "select param"),
        make_control("↑/↓", "adjust param"),
        make_control("S", "save config"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = braille::render_to_braille(&app.canvas, &app.color_lut);

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
            frame.render_widget(Paragraph::new(Line::from(span)), cell_rect);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(30);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("PARTICLE FIELD", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Particles drift and bounce off the edges. Nearby particles are joined by lines that fade with distance."),
        Line::from(""),
        Line::from(Span::styled("MOUSE:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Move over the canvas to pull nearby particles toward the cursor and link them to it. Leaving the canvas releases them."),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Links - distance under which particles connect"),
        Line::from("Force - radius of the cursor pull"),
        Line::from("Reach - radius of cursor links"),
        Line::from("Edges - Clamp (stop at edge) or Bounce (mirror)"),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Start/Stop, R=Respawn, G=Glyphs, C=Colors, V=Fullscreen, Tab/Arrows=Adjust, S=Save config, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2);
    let is_scrollable = content_height > visible_height;

    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_size_excludes_sidebar_and_borders() {
        let area = Rect::new(0, 0, 120, 40);
        assert_eq!(get_canvas_size(area, false), (120 - SIDEBAR_WIDTH - 2, 38));
        assert_eq!(get_canvas_size(area, true), (118, 38));

        let tiny = Rect::new(0, 0, 10, 1);
        assert_eq!(get_canvas_size(tiny, false), (0, 0));
    }

    #[test]
    fn test_canvas_origin_follows_layout() {
        assert_eq!(get_canvas_origin(true), (1, 1));
        assert_eq!(get_canvas_origin(false), (SIDEBAR_WIDTH + 1, 1));
    }
}
