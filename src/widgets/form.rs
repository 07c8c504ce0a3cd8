use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear};

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn render_modal_frame(
    f: &mut ratatui::Frame,
    title: &str,
    percent_x: u16,
    percent_y: u16,
) -> Rect {
    let area = centered_rect(percent_x, percent_y, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title));
    let inner = block.inner(area);
    f.render_widget(block, area);
    inner
}

fn label_style(focused: bool) -> Style {
    Style::default().fg(if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    })
}

fn label_text(label: &str, required: bool) -> String {
    if required {
        format!("{} *", label)
    } else {
        label.to_string()
    }
}

/// Render a single-line text input with label.
pub fn render_text_input(
    lines: &mut Vec<Line>,
    label: &str,
    value: &str,
    required: bool,
    focused: bool,
) {
    let cursor = if focused { "_" } else { "" };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{}: ", label_text(label, required)),
            label_style(focused),
        ),
        Span::styled(
            value.to_string(),
            Style::default().fg(Color::White).add_modifier(if focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            }),
        ),
        Span::styled(cursor, Style::default().fg(Color::DarkGray)),
    ]));
}

/// Render a picker list. `selected` is the stored choice, if any.
pub fn render_picker(
    lines: &mut Vec<Line>,
    label: &str,
    options: &[String],
    selected: Option<usize>,
    focused: bool,
) {
    lines.push(Line::from(Span::styled(format!("{}:", label), label_style(focused))));
    if options.is_empty() {
        lines.push(Line::from(Span::styled(
            "    (no options loaded)",
            Style::default().fg(Color::DarkGray),
        )));
        return;
    }
    for (i, option) in options.iter().enumerate() {
        let is_selected = Some(i) == selected;
        let prefix = if is_selected { "> " } else { "  " };
        let style = if is_selected && focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if is_selected {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("  {}{}", prefix, option),
            style,
        )));
    }
}

/// Render a full-width button line.
pub fn render_button(lines: &mut Vec<Line>, label: &str, focused: bool) {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    lines.push(Line::from(Span::styled(format!("[ {} ]", label), style)));
}
