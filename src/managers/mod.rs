pub mod settings_panel;
pub mod transcript;
