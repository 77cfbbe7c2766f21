mod frame;
mod palette;
mod rendering;

pub use frame::{paint_frame, render_frame};
pub use palette::color_of;
pub use rendering::Renderer;

use macroquad::prelude::Color;

// Rendering constants
pub const BACKGROUND_COLOR: Color = Color::new(0.0, 0.0, 0.0, 1.0);
pub const SUCCESS_BAR_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.5);
pub const HUD_FONT_SIZE: f32 = 20.0;
