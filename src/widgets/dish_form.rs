use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::form;
use crate::app::{DishForm, Field};

pub fn render(f: &mut ratatui::Frame, area: Rect, app: &DishForm) {
    let lines = build_lines(app);
    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Dish Form "),
    );
    f.render_widget(body, area);
}

fn selected_index(options: &[(String, String)], value: &str) -> Option<usize> {
    options.iter().position(|(v, _)| v == value)
}

pub fn build_lines(app: &DishForm) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    form::render_text_input(
        &mut lines,
        Field::Name.label(),
        &app.name,
        true,
        app.focused == Field::Name,
    );
    lines.push(Line::from(""));

    form::render_text_input(
        &mut lines,
        Field::Description.label(),
        &app.description,
        true,
        app.focused == Field::Description,
    );
    lines.push(Line::from(""));

    let tag_options = app.tag_options();
    let tag_labels: Vec<String> = tag_options.iter().map(|(_, l)| l.clone()).collect();
    form::render_picker(
        &mut lines,
        Field::Tag.label(),
        &tag_labels,
        selected_index(&tag_options, &app.tag),
        app.focused == Field::Tag,
    );
    lines.push(Line::from(""));

    let restaurant_options = app.restaurant_options();
    let restaurant_labels: Vec<String> =
        restaurant_options.iter().map(|(_, l)| l.clone()).collect();
    form::render_picker(
        &mut lines,
        Field::Restaurant.label(),
        &restaurant_labels,
        selected_index(&restaurant_options, &app.restaurant),
        app.focused == Field::Restaurant,
    );
    lines.push(Line::from(""));

    form::render_text_input(
        &mut lines,
        Field::Image.label(),
        &app.image_input,
        false,
        app.focused == Field::Image,
    );
    let chosen = match &app.image {
        Some(image) => format!("    selected: {}", image.file_name),
        None => "    no file selected".to_string(),
    };
    lines.push(Line::from(Span::styled(
        chosen,
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    form::render_button(&mut lines, Field::Save.label(), app.focused == Field::Save);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FormMode;
    use crate::loader::LoadMessage;
    use crate::models::Restaurant;

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn restaurant_picker_shows_name_for_stored_id() {
        let mut app = DishForm::new(FormMode::Creating);
        app.apply(LoadMessage::RestaurantsLoaded(Ok(vec![
            Restaurant {
                id: "1".to_string(),
                name: "Lyllys Cafe".to_string(),
            },
            Restaurant {
                id: "2".to_string(),
                name: "Cantina".to_string(),
            },
        ])));
        app.set_restaurant("2");

        let rendered = text(&build_lines(&app));
        assert!(rendered.contains(&"  > Cantina".to_string()));
        assert!(rendered.contains(&"    Lyllys Cafe".to_string()));
    }

    #[test]
    fn image_status_line_reflects_selection() {
        let mut app = DishForm::new(FormMode::Creating);
        assert!(text(&build_lines(&app)).contains(&"    no file selected".to_string()));

        app.select_image(vec!["/fotos/prato.png".into()]);
        assert!(text(&build_lines(&app)).contains(&"    selected: prato.png".to_string()));
    }
}
