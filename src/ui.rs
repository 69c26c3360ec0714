use ascii_globe::app::App;
use ascii_globe::globe::SamplePoint;
use ascii_globe::render::{Presenter, Surface};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Split into globe area and status bar
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

fn render_globe(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " ASCII Globe ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (presenter, points) = app.frame_parts();
    frame.render_widget(GlobeWidget { presenter, points }, inner);
}

/// Draws the latest frame through the presenter
struct GlobeWidget<'a> {
    presenter: &'a mut Presenter,
    points: &'a [SamplePoint],
}

impl Widget for GlobeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut surface = BufferSurface { buf, area };
        self.presenter.present(self.points, &mut surface);
    }
}

/// A region of the terminal buffer as a drawing surface
struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl Surface for BufferSurface<'_> {
    fn size(&self) -> (u16, u16) {
        (self.area.width, self.area.height)
    }

    fn clear(&mut self, background: Color) {
        for y in self.area.top()..self.area.bottom() {
            for x in self.area.left()..self.area.right() {
                self.buf[(x, y)].set_char(' ').set_bg(background);
            }
        }
    }

    fn draw_glyph(&mut self, col: u16, row: u16, glyph: char, fg: Color) {
        if col >= self.area.width || row >= self.area.height {
            return;
        }
        self.buf[(self.area.x + col, self.area.y + row)]
            .set_char(glyph)
            .set_fg(fg);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let stats = &app.stats;
    let probe = app
        .center_probe()
        .map(|p| match app.shape_at(p) {
            Some(shape) => format!("{:.0},{:.0} {} #{shape} ", p.lat, p.lon, p.terrain.label()),
            None => format!("{:.0},{:.0} {} ", p.lat, p.lon, p.terrain.label()),
        })
        .unwrap_or_default();

    let status = Line::from(vec![
        Span::styled(" Frames: ", Style::default().fg(Color::DarkGray)),
        Span::styled(stats.frames.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", Style::default().fg(Color::DarkGray)),
        Span::styled(app.backend_name(), Style::default().fg(Color::Magenta)),
        Span::styled(
            format!(" {:.1}ms", stats.last_compute.as_secs_f64() * 1000.0),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(") ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{} pts ", stats.last_points),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("{}°x{}° ", app.grid.lat_step_deg, app.grid.lon_step_deg),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            if app.controller.is_dragging() { "[drag] " } else { "" },
            Style::default().fg(Color::Red),
        ),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(probe, Style::default().fg(Color::White)),
        Span::styled(app.rotation_summary(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | drag/hjkl:rotate +/-:detail r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(status);
    frame.render_widget(paragraph, area);
}
