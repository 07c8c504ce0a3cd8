use std::path::PathBuf;

use crate::api_client::ApiError;
use crate::loader::LoadMessage;
use crate::models::{DishPayload, ImageFile, Restaurant, Tag};

/// Whether the form creates a new dish or edits an existing one. Fixed for
/// the lifetime of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(String),
}

impl FormMode {
    pub fn from_route(id: Option<String>) -> Self {
        match id.filter(|id| !id.trim().is_empty()) {
            Some(id) => FormMode::Editing(id.trim().to_string()),
            None => FormMode::Creating,
        }
    }

    pub fn dish_id(&self) -> Option<&str> {
        match self {
            FormMode::Creating => None,
            FormMode::Editing(id) => Some(id),
        }
    }

    pub fn success_notice(&self) -> &'static str {
        match self {
            FormMode::Creating => "Dish created successfully!",
            FormMode::Editing(_) => "Dish updated successfully!",
        }
    }

    pub fn label(&self) -> String {
        match self {
            FormMode::Creating => "create".to_string(),
            FormMode::Editing(id) => format!("edit #{}", id),
        }
    }
}

/// Focusable controls, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Tag,
    Restaurant,
    Image,
    Save,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Name => Field::Description,
            Field::Description => Field::Tag,
            Field::Tag => Field::Restaurant,
            Field::Restaurant => Field::Image,
            Field::Image => Field::Save,
            Field::Save => Field::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::Name => Field::Save,
            Field::Description => Field::Name,
            Field::Tag => Field::Description,
            Field::Restaurant => Field::Tag,
            Field::Image => Field::Restaurant,
            Field::Save => Field::Image,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Dish Name",
            Field::Description => "Dish Description",
            Field::Tag => "Tag",
            Field::Restaurant => "Restaurant",
            Field::Image => "Image",
            Field::Save => "Save",
        }
    }

    pub fn is_text_entry(&self) -> bool {
        matches!(self, Field::Name | Field::Description | Field::Image)
    }
}

/// Full state of the dish form.
pub struct DishForm {
    mode: FormMode,
    pub name: String,
    pub description: String,
    /// The chosen tag's display value.
    pub tag: String,
    /// The chosen restaurant's id.
    pub restaurant: String,
    pub image: Option<ImageFile>,
    /// Raw text typed into the image path input. Committed with Enter.
    pub image_input: String,
    pub tags: Vec<Tag>,
    pub restaurants: Vec<Restaurant>,
    pub focused: Field,
    /// Blocking confirmation shown after a successful save.
    pub notice: Option<String>,
    /// Flash message for local input problems, cleared on next keypress.
    pub flash: Option<String>,
    /// Number of saves sent but not yet answered.
    pub pending_submits: usize,
    pub show_keybindings: bool,
    pub should_quit: bool,
}

impl DishForm {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            name: String::new(),
            description: String::new(),
            tag: String::new(),
            restaurant: String::new(),
            image: None,
            image_input: String::new(),
            tags: Vec::new(),
            restaurants: Vec::new(),
            focused: Field::Name,
            notice: None,
            flash: None,
            pending_submits: 0,
            show_keybindings: false,
            should_quit: false,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    pub fn set_tag(&mut self, value: impl Into<String>) {
        self.tag = value.into();
    }

    pub fn set_restaurant(&mut self, value: impl Into<String>) {
        self.restaurant = value.into();
    }

    /// Keep only the first of the chosen files. An empty choice clears the
    /// selection.
    pub fn select_image(&mut self, files: Vec<PathBuf>) {
        self.image = files.into_iter().next().map(ImageFile::from_path);
    }

    pub fn next_field(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn prev_field(&mut self) {
        self.focused = self.focused.prev();
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            Field::Name => Some(&mut self.name),
            Field::Description => Some(&mut self.description),
            Field::Image => Some(&mut self.image_input),
            _ => None,
        }
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(text) = self.focused_text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    /// Tag picker options as `(stored value, label)`.
    pub fn tag_options(&self) -> Vec<(String, String)> {
        self.tags
            .iter()
            .map(|t| (t.value.clone(), t.value.clone()))
            .collect()
    }

    /// Restaurant picker options as `(stored id, label)`.
    pub fn restaurant_options(&self) -> Vec<(String, String)> {
        self.restaurants
            .iter()
            .map(|r| (r.id.clone(), r.name.clone()))
            .collect()
    }

    /// Move the focused picker by `delta` and store the newly highlighted
    /// value. With nothing chosen yet the first step lands on the first option.
    pub fn move_picker(&mut self, delta: isize) {
        let (options, current) = match self.focused {
            Field::Tag => (self.tag_options(), &self.tag),
            Field::Restaurant => (self.restaurant_options(), &self.restaurant),
            _ => return,
        };
        if options.is_empty() {
            return;
        }

        let last = options.len() as isize - 1;
        let next = match options.iter().position(|(value, _)| value == current) {
            Some(idx) => (idx as isize + delta).clamp(0, last),
            None => 0,
        };
        let value = options[next as usize].0.clone();

        match self.focused {
            Field::Tag => self.set_tag(value),
            Field::Restaurant => self.set_restaurant(value),
            _ => {}
        }
    }

    fn image_input_paths(&self) -> Vec<PathBuf> {
        self.image_input
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// True when a path is typed into the image input but differs from the
    /// current selection.
    pub fn image_input_pending(&self) -> bool {
        match self.image_input_paths().first() {
            Some(first) => self.image.as_ref().map(|i| &i.path) != Some(first),
            None => false,
        }
    }

    /// Turn the typed image input into a selection. Several paths may be
    /// given separated by commas; only the first is kept. Returns false when
    /// the first path is not a readable file and the selection is unchanged.
    pub fn commit_image_input(&mut self) -> bool {
        let paths = self.image_input_paths();

        if let Some(first) = paths.first() {
            if !first.is_file() {
                self.flash = Some(format!("Image not found: {}", first.display()));
                return false;
            }
        }

        self.select_image(paths);
        self.flash = Some(match &self.image {
            Some(image) => format!("Image selected: {}", image.file_name),
            None => "Image cleared".to_string(),
        });
        true
    }

    /// Name and description are required, everything else is optional.
    pub fn missing_required_field(&self) -> Option<Field> {
        if self.name.is_empty() {
            Some(Field::Name)
        } else if self.description.is_empty() {
            Some(Field::Description)
        } else {
            None
        }
    }

    pub fn payload(&self) -> DishPayload {
        DishPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            tag: self.tag.clone(),
            restaurant: self.restaurant.clone(),
            image: self.image.clone(),
        }
    }

    /// Snapshot the form for sending, or point at the first empty required
    /// field. A typed but unconfirmed image path is committed first.
    pub fn prepare_submit(&mut self) -> Option<DishPayload> {
        if let Some(field) = self.missing_required_field() {
            self.focused = field;
            self.flash = Some(format!("Please fill out {}", field.label()));
            return None;
        }
        if self.image_input_pending() && !self.commit_image_input() {
            self.focused = Field::Image;
            return None;
        }
        self.pending_submits += 1;
        Some(self.payload())
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn apply(&mut self, message: LoadMessage) {
        match message {
            LoadMessage::TagsLoaded(Ok(tags)) => self.tags = tags,
            LoadMessage::RestaurantsLoaded(Ok(restaurants)) => self.restaurants = restaurants,
            LoadMessage::DishPrefilled(Ok(dish)) => self.set_name(dish.name),
            LoadMessage::TagsLoaded(Err(e)) => {
                tracing::warn!(error = %e, load = "tags", "reference load failed");
            }
            LoadMessage::RestaurantsLoaded(Err(e)) => {
                tracing::warn!(error = %e, load = "restaurants", "reference load failed");
            }
            LoadMessage::DishPrefilled(Err(e)) => {
                tracing::warn!(error = %e, dish_id = ?self.mode.dish_id(), "dish prefill failed");
            }
            LoadMessage::Submitted(result) => self.finish_submit(result),
        }
    }

    fn finish_submit(&mut self, result: Result<(), ApiError>) {
        self.pending_submits = self.pending_submits.saturating_sub(1);
        match result {
            Ok(()) => {
                self.set_name("");
                self.set_description("");
                self.set_tag("");
                self.set_restaurant("");
                self.notice = Some(self.mode.success_notice().to_string());
                tracing::info!(mode = %self.mode.label(), "dish saved");
            }
            Err(e) => {
                tracing::error!(error = %e, mode = %self.mode.label(), "saving dish failed");
            }
        }
    }
}
