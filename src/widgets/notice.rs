use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::form;

/// Blocking confirmation shown after a save. Input is swallowed until it is
/// dismissed.
pub fn render(f: &mut ratatui::Frame, message: &str) {
    let inner = form::render_modal_frame(f, "Saved", 40, 20);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] OK",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let body = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(body, inner);
}
