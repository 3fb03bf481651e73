pub mod element;
pub mod grid;
pub mod keybindings;
pub mod screen;
pub mod scrollbar;
pub mod surface;
pub mod tile;
pub mod window;

pub use grid::{Grid, GridClick};
pub use screen::ScreenshotScreen;
pub use window::MainWindow;
