pub mod app;
pub mod audio;
pub mod graphics;
pub mod pixels_renderer;
pub mod ui;
