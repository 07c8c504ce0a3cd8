use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::form;

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

pub fn render(f: &mut ratatui::Frame) {
    let inner = form::render_modal_frame(f, "Keybindings", 60, 60);

    let lines = vec![
        heading("Navigation"),
        Line::from("  Tab / Shift+Tab: next / previous field"),
        Line::from("  Up / Down or j / k (in pickers): choose tag or restaurant"),
        Line::from(""),
        heading("Editing"),
        Line::from("  Type to fill Dish Name, Dish Description and Image"),
        Line::from("  Backspace: delete last character"),
        Line::from("  Enter (on Image): select the file; several paths may be"),
        Line::from("    separated by commas, only the first is kept;"),
        Line::from("    an empty path clears the selection"),
        Line::from(""),
        heading("Actions"),
        Line::from("  Enter (on Save) or Ctrl+S: save the dish"),
        Line::from("  ? (outside text fields): this help"),
        Line::from("  Esc or Ctrl+C: quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let body = Paragraph::new(lines).block(Block::default());
    f.render_widget(body, inner);
}
