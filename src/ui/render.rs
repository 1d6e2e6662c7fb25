use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};

use super::braille::{BrailleCanvas, DIGIT_HEIGHT};
use super::overlay::{render_overlay, OverlayMessage};
use crate::config::{DisplayConfig, PhysicsConfig};
use crate::game::{MatchState, Side};

// Layout: header with Braille scores and text hints, bordered playable area
// Rows 0-3: score area (digits are 10px tall, header is 16px)
// Row 3: top border shares the bottom pixel row of the header
// Rows 4 to N-2: playable area
// Row N-1: bottom border
const UI_HEADER_ROWS: u16 = 4;
const UI_FOOTER_ROWS: u16 = 1;

/// Text shown around the board
#[derive(Debug, Clone)]
pub struct Hud {
    /// "Player 1 vs AI", shown between the scores
    pub title: String,
    /// Key hint line
    pub controls: String,
}

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(color[0], color[1], color[2])
}

/// Maps board units onto Braille pixels of the playable area
#[derive(Debug, Clone, Copy)]
struct Projection {
    scale_x: f32,
    scale_y: f32,
    offset_y: usize,
}

impl Projection {
    fn x(&self, board_x: f32) -> f32 {
        board_x * self.scale_x
    }

    fn y(&self, board_y: f32) -> f32 {
        board_y * self.scale_y + self.offset_y as f32
    }
}

pub fn render(
    frame: &mut Frame,
    state: &MatchState,
    physics: &PhysicsConfig,
    display: &DisplayConfig,
    hud: &Hud,
    overlay: Option<&OverlayMessage>,
) {
    let area = frame.area();

    // Draw background (true black RGB, not terminal default)
    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, area);

    if area.height <= UI_HEADER_ROWS + UI_FOOTER_ROWS || area.width < 4 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);

    canvas.set_pen(rgb(display.score_color));
    draw_scores(&mut canvas, state);

    let playable_rows = area.height - UI_HEADER_ROWS - UI_FOOTER_ROWS;
    let playable_height = playable_rows as usize * 4;
    let offset_y = UI_HEADER_ROWS as usize * 4;

    canvas.set_pen(rgb(display.center_line_color));
    canvas.draw_horizontal_line(offset_y - 1);
    canvas.draw_horizontal_line(offset_y + playable_height);
    draw_center_line(&mut canvas, offset_y, playable_height);

    let projection = Projection {
        scale_x: canvas.pixel_width() as f32 / physics.board_width,
        scale_y: playable_height as f32 / physics.board_height,
        offset_y,
    };

    canvas.set_pen(rgb(display.paddle_color));
    for side in [Side::Left, Side::Right] {
        draw_paddle(&mut canvas, &projection, state, physics, side);
    }

    canvas.set_pen(rgb(display.ball_color));
    let ball = &state.ball;
    canvas.fill_ellipse(
        projection.x(ball.x),
        projection.y(ball.y),
        ball.radius * projection.scale_x,
        ball.radius * projection.scale_y,
    );

    frame.render_widget(Paragraph::new(canvas.lines()), area);

    draw_text_row(frame, area, 0, &hud.title, Color::Gray);
    draw_text_row(frame, area, 2, &hud.controls, Color::DarkGray);

    if let Some(message) = overlay {
        render_overlay(frame, message, area);
    }
}

fn draw_scores(canvas: &mut BrailleCanvas, state: &MatchState) {
    let width = canvas.pixel_width();
    // Vertically centered in the header
    let y = (UI_HEADER_ROWS as usize * 4).saturating_sub(DIGIT_HEIGHT) / 2;

    let left = state.score.left;
    let left_x = (width / 3).saturating_sub(BrailleCanvas::number_width(left) / 2);
    canvas.draw_number(left, left_x, y);

    let right = state.score.right;
    let right_x = (width * 2 / 3).saturating_sub(BrailleCanvas::number_width(right) / 2);
    canvas.draw_number(right, right_x, y);
}

fn draw_center_line(canvas: &mut BrailleCanvas, offset_y: usize, height: usize) {
    let center_x = canvas.pixel_width() / 2;
    for y in (0..height).step_by(4) {
        canvas.set_pixel(center_x, offset_y + y);
        canvas.set_pixel(center_x, offset_y + y + 1);
    }
}

fn draw_paddle(
    canvas: &mut BrailleCanvas,
    projection: &Projection,
    state: &MatchState,
    physics: &PhysicsConfig,
    side: Side,
) {
    let paddle = state.paddle(side);
    let board_x = match side {
        Side::Left => 0.0,
        Side::Right => physics.board_width - physics.paddle_width,
    };

    let x = projection.x(board_x).round() as usize;
    let width = (physics.paddle_width * projection.scale_x).round().max(1.0) as usize;
    let top = projection.y(paddle.top(physics)).round() as usize;
    let height = (physics.paddle_height * projection.scale_y).round().max(1.0) as usize;

    canvas.fill_rect(x, top, width, height);
}

fn draw_text_row(frame: &mut Frame, area: Rect, row: u16, text: &str, color: Color) {
    if row >= area.height {
        return;
    }
    let widget = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);

    let row_area = Rect {
        x: area.x,
        y: area.y + row,
        width: area.width,
        height: 1,
    };
    frame.render_widget(widget, row_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MatchStatus;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn hud() -> Hud {
        Hud {
            title: "Player 1 vs AI".to_string(),
            controls: "W/S: Move  Esc: Menu".to_string(),
        }
    }

    #[test]
    fn test_render_draws_board_and_hud() {
        let physics = PhysicsConfig::default();
        let state = MatchState::new(&physics);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        terminal
            .draw(|f| render(f, &state, &physics, &DisplayConfig::default(), &hud(), None))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Player 1 vs AI"));
        assert!(text.contains('⣿'));
    }

    #[test]
    fn test_render_overlay_on_match_over() {
        let physics = PhysicsConfig::default();
        let mut state = MatchState::new(&physics);
        state.status = MatchStatus::MatchOver { winner: Side::Right };
        let overlay = OverlayMessage::info(vec!["AI Wins!".to_string()]);
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

        terminal
            .draw(|f| {
                render(
                    f,
                    &state,
                    &physics,
                    &DisplayConfig::default(),
                    &hud(),
                    Some(&overlay),
                )
            })
            .unwrap();

        assert!(screen_text(&terminal).contains("AI Wins!"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let physics = PhysicsConfig::default();
        let state = MatchState::new(&physics);
        let mut terminal = Terminal::new(TestBackend::new(3, 3)).unwrap();

        terminal
            .draw(|f| render(f, &state, &physics, &DisplayConfig::default(), &hud(), None))
            .unwrap();
    }
}
