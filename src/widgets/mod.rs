pub mod dish_form;
pub mod form;
pub mod keybindings_help;
pub mod notice;
