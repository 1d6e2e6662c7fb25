// Menu rendering with Ratatui

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::state::MenuState;
use crate::config::Config;

const TITLE_ART: [&str; 6] = [
    "██████╗  ██████╗ ███╗   ██╗ ██████╗ ",
    "██╔══██╗██╔═══██╗████╗  ██║██╔════╝ ",
    "██████╔╝██║   ██║██╔██╗ ██║██║  ███╗",
    "██╔═══╝ ██║   ██║██║╚██╗██║██║   ██║",
    "██║     ╚██████╔╝██║ ╚████║╚██████╔╝",
    "╚═╝      ╚═════╝ ╚═╝  ╚═══╝ ╚═════╝ ",
];

fn title_lines() -> Vec<Line<'static>> {
    let style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(
        "R  E  T  R  O",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(TITLE_ART.iter().map(|row| Line::from(Span::styled(*row, style))));
    lines
}

fn key_hint(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, what)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(Color::Gray)));
        spans.push(Span::styled(format!(": {}", what), Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn clear_background(frame: &mut Frame) {
    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    let area = frame.area();
    frame.render_widget(bg, area);
}

/// Render the main menu
pub fn render_menu(frame: &mut Frame, menu_state: &MenuState) {
    clear_background(frame);
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Title area
            Constraint::Min(6),    // Menu items
            Constraint::Length(2), // Controls hint
        ])
        .split(area);

    let title = Paragraph::new(title_lines()).alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let menu_items: Vec<Line> = menu_state
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let is_selected = i == menu_state.selected_index;
            let prefix = if is_selected { "> " } else { "  " };
            let text = format!("{}{}", prefix, item.display_text());

            if is_selected {
                Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(text, Style::default().fg(Color::White)))
            }
        })
        .collect();

    let menu = Paragraph::new(menu_items).alignment(Alignment::Center);
    frame.render_widget(menu, chunks[1]);

    let controls = Paragraph::new(key_hint(&[("↑/↓", "Navigate"), ("Enter", "Select"), ("Q/Esc", "Quit")]))
        .alignment(Alignment::Center);
    frame.render_widget(controls, chunks[2]);

    if menu_state.in_difficulty_selection {
        render_difficulty_dialog(frame, menu_state);
    }
}

/// Difficulty picker shown over the menu
fn render_difficulty_dialog(frame: &mut Frame, menu_state: &MenuState) {
    let area = frame.area();

    let dialog_width = 56.min(area.width);
    let dialog_height = (menu_state.difficulties.len() as u16 + 6).min(area.height);
    let dialog_area = Rect {
        x: area.x + area.width.saturating_sub(dialog_width) / 2,
        y: area.y + area.height.saturating_sub(dialog_height) / 2,
        width: dialog_width,
        height: dialog_height,
    };

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Choose AI Difficulty ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));
    frame.render_widget(block, dialog_area);

    let inner = dialog_area.inner(Margin::new(2, 1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(menu_state.difficulties.len() as u16),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let options: Vec<Line> = menu_state
        .difficulties
        .iter()
        .enumerate()
        .map(|(i, difficulty)| {
            if i == menu_state.selected_difficulty_index {
                Line::from(Span::styled(
                    format!("> {}", difficulty.display_name()),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {}", difficulty.display_name()),
                    Style::default().fg(Color::White),
                ))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(options), chunks[0]);

    let description = Paragraph::new(menu_state.selected_difficulty().description().to_string())
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(description, chunks[2]);

    let hint = Paragraph::new(key_hint(&[("Enter", "Play"), ("Esc", "Back")])).alignment(Alignment::Center);
    frame.render_widget(hint, chunks[3]);
}

/// Render the how-to-play screen
pub fn render_instructions(frame: &mut Frame, config: &Config) {
    clear_background(frame);
    let area = frame.area();
    let keys = &config.keybindings;
    let physics = &config.physics;

    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let label = Style::default().fg(Color::Yellow);

    let text = vec![
        Line::from(Span::styled("Game Instructions", heading)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Objective: ", label),
            Span::raw(format!("Be the first to score {} points!", physics.winning_score)),
        ]),
        Line::from(vec![
            Span::styled("Ball Speed: ", label),
            Span::raw(format!(
                "The ball starts slow and speeds up with each paddle hit for the first {} hits, then keeps accelerating.",
                physics.ramp_up_hits
            )),
        ]),
        Line::from(""),
        Line::from(Span::styled("Controls", heading)),
        Line::from(vec![
            Span::styled("Player 1 (left paddle): ", label),
            Span::raw(format!("{} up, {} down", keys.left_paddle_up, keys.left_paddle_down)),
        ]),
        Line::from(vec![
            Span::styled("Player 2 (right paddle, Player vs Player): ", label),
            Span::raw(format!("{} up, {} down", keys.right_paddle_up, keys.right_paddle_down)),
        ]),
        Line::from(vec![
            Span::styled("Game: ", label),
            Span::raw(format!(
                "{} returns to the menu, {} starts a rematch",
                keys.abort, keys.rematch
            )),
        ]),
    ];

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2)])
        .split(area);

    let body = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(body, chunks[0].inner(Margin::new(2, 1)));

    let hint = Paragraph::new(key_hint(&[("Enter", "Proceed to Menu"), ("Q", "Quit")]))
        .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[1]);
}
