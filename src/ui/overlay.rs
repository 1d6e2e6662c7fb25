// Overlay message system for displaying centered text on screen

use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// A message to display as an overlay in the center of the screen
#[derive(Debug, Clone)]
pub struct OverlayMessage {
    pub lines: Vec<String>,
    pub title: Option<String>,
    pub style: OverlayStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayStyle {
    /// Match results and prompts
    Info,
    /// Something went wrong, e.g. the controller could not be reached
    Error,
}

impl OverlayMessage {
    pub fn info(lines: Vec<String>) -> Self {
        Self {
            lines,
            title: None,
            style: OverlayStyle::Info,
        }
    }

    pub fn error(lines: Vec<String>) -> Self {
        Self {
            lines,
            title: None,
            style: OverlayStyle::Error,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn border_color(&self) -> Color {
        match self.style {
            OverlayStyle::Info => Color::Cyan,
            OverlayStyle::Error => Color::Red,
        }
    }

    fn text_color(&self) -> Color {
        match self.style {
            OverlayStyle::Info => Color::White,
            OverlayStyle::Error => Color::LightRed,
        }
    }
}

/// Size of the box needed for `message`, limited to `area`
fn overlay_rect(message: &OverlayMessage, area: Rect) -> Rect {
    let max_line_length = message
        .lines
        .iter()
        .map(|line| line.chars().count())
        .chain(message.title.iter().map(|t| t.chars().count() + 2))
        .max()
        .unwrap_or(0);

    // Padding for borders and spacing
    let width = (max_line_length as u16 + 6).min(area.width);
    let height = (message.lines.len() as u16 + 4).min(area.height);

    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Render an overlay message in the center of `area`
pub fn render_overlay(frame: &mut Frame, message: &OverlayMessage, area: Rect) {
    let overlay_area = overlay_rect(message, area);

    frame.render_widget(Clear, overlay_area);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(message.border_color()))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));

    if let Some(ref title) = message.title {
        block = block.title(format!(" {} ", title));
    }

    frame.render_widget(block, overlay_area);

    let text_lines: Vec<Line> = message
        .lines
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                line.clone(),
                Style::default().fg(message.text_color()),
            ))
        })
        .collect();

    let paragraph = Paragraph::new(text_lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, overlay_area.inner(Margin::new(2, 1)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_is_centered() {
        let message = OverlayMessage::info(vec!["Player 1 Wins!".to_string(), String::new()]);
        let rect = overlay_rect(&message, Rect::new(0, 0, 80, 24));

        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 6);
        assert_eq!(rect.x, 30);
        assert_eq!(rect.y, 9);
    }

    #[test]
    fn test_overlay_never_exceeds_area() {
        let message = OverlayMessage::error(vec!["x".repeat(200)]).with_title("Controller");
        let area = Rect::new(2, 1, 10, 3);
        let rect = overlay_rect(&message, area);

        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
        assert!(rect.x >= area.x && rect.y >= area.y);
    }
}
