pub mod line_editor;
pub mod unicode;
