mod api_client;
mod app;
mod config;
mod loader;
mod models;
mod widgets;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::api_client::HttpDishApi;
use crate::app::{DishForm, Field, FormMode};
use crate::loader::SharedApi;
use crate::models::DishPayload;

/// Create a dish, or edit one with --id.
#[derive(Debug, Parser)]
#[command(name = "alfood-admin", version)]
struct Cli {
    /// Id of the dish to edit. Without it a new dish is created.
    #[arg(long)]
    id: Option<String>,

    /// Backend base URL, overriding the config file.
    #[arg(long, env = "ALFOOD_API_URL")]
    base_url: Option<String>,

    /// Config file to use instead of ~/.config/alfood-admin/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,

    /// Log requests at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn load_effective_config(cli: &Cli) -> Result<config::AppConfig> {
    let loaded = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    let mut config = loaded.unwrap_or_default();
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
    }
    Ok(config)
}

/// Diagnostics go to a file so they never draw over the terminal UI.
fn init_logging(path: &Path, verbose: bool) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_effective_config(&cli)?;

    if cli.write_config {
        let path = match &cli.config {
            Some(path) => config::save_config_to(&config, path)?,
            None => config::save_config(&config)?,
        };
        println!("Wrote {}", path.display());
        return Ok(());
    }

    init_logging(&config.log_file()?, cli.verbose)?;

    let api: SharedApi = Arc::new(
        HttpDishApi::new(&config.api).context("Failed to set up the backend client")?,
    );
    let mode = FormMode::from_route(cli.id.clone());
    tracing::info!(base_url = %config.api.base_url, mode = %mode.label(), "starting dish form");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, api, mode).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: SharedApi,
    mode: FormMode,
) -> Result<()> {
    let mut app = DishForm::new(mode);
    let (bg_tx, mut bg_rx) = tokio::sync::mpsc::unbounded_channel();

    loader::mount(&api, app.mode(), &bg_tx);

    loop {
        while let Ok(message) = bg_rx.try_recv() {
            app.apply(message);
        }

        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(120))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(payload) = handle_key(&mut app, key) {
                    loader::spawn_submit(&api, app.mode().clone(), payload, &bg_tx);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn ui(f: &mut ratatui::Frame, app: &DishForm) {
    use ratatui::layout::{Constraint, Direction, Layout};
    use ratatui::style::{Color, Style};
    use ratatui::text::{Line, Span};

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Form
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    widgets::dish_form::render(f, chunks[0], app);

    let status_text = if let Some(ref flash) = app.flash {
        Span::styled(flash.as_str(), Style::default().fg(Color::Red))
    } else {
        let saving = if app.pending_submits > 0 {
            "  saving..."
        } else {
            ""
        };
        Span::styled(
            format!(
                " mode: {}  tags: {}  restaurants: {}{}  Tab: next field  Ctrl+S: save  ?: keys  Esc: quit ",
                app.mode().label(),
                app.tags.len(),
                app.restaurants.len(),
                saving
            ),
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(
        ratatui::widgets::Paragraph::new(Line::from(status_text)),
        chunks[1],
    );

    if app.show_keybindings {
        widgets::keybindings_help::render(f);
    }
    if let Some(ref notice) = app.notice {
        widgets::notice::render(f, notice);
    }
}

/// Apply one key press. Returns a payload when the key asked for a save and
/// the form passed its required-field check.
fn handle_key(app: &mut DishForm, key: KeyEvent) -> Option<DishPayload> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }

    if app.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return None;
    }

    if app.show_keybindings {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            app.show_keybindings = false;
        }
        return None;
    }

    // Clear flash on any keypress
    app.flash = None;

    let in_picker = matches!(app.focused, Field::Tag | Field::Restaurant);
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('s') if ctrl => return app.prepare_submit(),
        KeyCode::Tab => app.next_field(),
        KeyCode::BackTab => app.prev_field(),
        KeyCode::Enter => match app.focused {
            Field::Save => return app.prepare_submit(),
            Field::Image => {
                app.commit_image_input();
            }
            _ => app.next_field(),
        },
        KeyCode::Down if in_picker => app.move_picker(1),
        KeyCode::Up if in_picker => app.move_picker(-1),
        KeyCode::Char('j') if in_picker => app.move_picker(1),
        KeyCode::Char('k') if in_picker => app.move_picker(-1),
        KeyCode::Char('?') if !app.focused.is_text_entry() => app.show_keybindings = true,
        KeyCode::Char(c) if !ctrl => app.type_char(c),
        KeyCode::Backspace => app.backspace(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadMessage;

    fn press(app: &mut DishForm, code: KeyCode) -> Option<DishPayload> {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut DishForm, c: char) -> Option<DishPayload> {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_str(app: &mut DishForm, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn keyboard_fills_form_and_submits_from_save() {
        let mut app = DishForm::new(FormMode::Creating);
        type_str(&mut app, "Feijoada");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Prato típico");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused, Field::Save);

        let payload = press(&mut app, KeyCode::Enter).expect("payload");
        assert_eq!(payload.name, "Feijoada");
        assert_eq!(payload.description, "Prato típico");
        assert!(payload.image.is_none());
    }

    #[test]
    fn ctrl_s_is_blocked_by_empty_required_field() {
        let mut app = DishForm::new(FormMode::Creating);
        type_str(&mut app, "Feijoada");
        assert!(ctrl(&mut app, 's').is_none());
        assert_eq!(app.focused, Field::Description);
        assert!(app.flash.is_some());
        assert_eq!(app.name, "Feijoada");
    }

    #[test]
    fn notice_swallows_input_until_dismissed() {
        let mut app = DishForm::new(FormMode::Creating);
        app.apply(LoadMessage::Submitted(Ok(())));
        assert!(app.notice.is_some());

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.name, "");
        assert!(app.notice.is_some());

        press(&mut app, KeyCode::Enter);
        assert!(app.notice.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn question_mark_is_text_in_inputs_and_help_elsewhere() {
        let mut app = DishForm::new(FormMode::Creating);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.name, "?");
        assert!(!app.show_keybindings);

        app.focused = Field::Tag;
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_keybindings);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_keybindings);
        assert!(!app.should_quit);
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut app = DishForm::new(FormMode::Creating);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);

        let mut app = DishForm::new(FormMode::Creating);
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn cli_base_url_overrides_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://from-file/\"\n").expect("write");

        let cli = Cli::parse_from([
            "alfood-admin",
            "--config",
            path.to_str().expect("utf8 path"),
            "--base-url",
            "http://from-flag/",
            "--id",
            "4",
        ]);
        let config = load_effective_config(&cli).expect("config");
        assert_eq!(config.api.base_url, "http://from-flag/");
        assert_eq!(
            FormMode::from_route(cli.id),
            FormMode::Editing("4".to_string())
        );
    }

    fn filled_form() -> DishForm {
        let mut app = DishForm::new(FormMode::Creating);
        type_str(&mut app, "Feijoada");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Prato típico");
        app
    }

    #[test]
    fn ctrl_s_sends_image_path_typed_without_enter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image_path = dir.path().join("feijoada.png");
        std::fs::write(&image_path, b"png").expect("write image");

        let mut app = filled_form();
        app.focused = Field::Image;
        type_str(&mut app, image_path.to_str().expect("utf8 path"));

        let payload = ctrl(&mut app, 's').expect("payload");
        let image = payload.image.expect("image part");
        assert_eq!(image.path, image_path);
        assert_eq!(app.image.as_ref().map(|i| i.path.clone()), Some(image_path));
    }

    #[test]
    fn save_button_sends_image_path_typed_without_enter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image_path = dir.path().join("moqueca.jpg");
        std::fs::write(&image_path, b"jpeg").expect("write image");

        let mut app = filled_form();
        app.focused = Field::Image;
        type_str(&mut app, image_path.to_str().expect("utf8 path"));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused, Field::Save);

        let payload = press(&mut app, KeyCode::Enter).expect("payload");
        assert_eq!(payload.image.map(|i| i.path), Some(image_path));
    }

    #[test]
    fn ctrl_s_with_unreadable_typed_image_is_blocked() {
        let mut app = filled_form();
        app.focused = Field::Image;
        type_str(&mut app, "/nao/existe/foto.png");
        app.focused = Field::Save;

        assert!(ctrl(&mut app, 's').is_none());
        assert_eq!(app.focused, Field::Image);
        assert!(app
            .flash
            .as_deref()
            .unwrap_or_default()
            .starts_with("Image not found"));
        assert_eq!(app.pending_submits, 0);
    }
}
