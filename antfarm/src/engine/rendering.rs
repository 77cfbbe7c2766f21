use antgrid::Simulation;
use macroquad::prelude::*;

use super::{BACKGROUND_COLOR, HUD_FONT_SIZE, paint_frame, render_frame};

/// Draws the grid through a nearest-filtered texture, letterboxed to fit
/// the window.
pub struct Renderer {
    /// CPU-side frame, repainted every draw.
    image: Image,
    /// GPU copy of `image`.
    texture: Texture2D,
    /// Pixels per cell.
    scale: u32,
}

impl Renderer {
    pub fn new(simulation: &Simulation, scale: u32) -> Self {
        let image = render_frame(&simulation.grid, simulation.feedings, scale);
        let texture = Texture2D::from_image(&image);
        texture.set_filter(FilterMode::Nearest);
        Self {
            image,
            texture,
            scale,
        }
    }

    /// The frame as of the last [`Renderer::render`].
    pub fn frame(&self) -> &Image {
        &self.image
    }

    /// Repaints the frame from the simulation and draws it.
    pub fn render(&mut self, simulation: &Simulation, status: &str) {
        paint_frame(
            &mut self.image,
            &simulation.grid,
            simulation.feedings,
            self.scale,
        );
        self.texture.update(&self.image);

        clear_background(BACKGROUND_COLOR);
        let (x, y, w, h) = self.letterbox();
        draw_texture_ex(
            &self.texture,
            x,
            y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(w, h)),
                ..Default::default()
            },
        );
        self.draw_status(status);
    }

    /// Largest rectangle with the frame's aspect ratio that fits the screen.
    fn letterbox(&self) -> (f32, f32, f32, f32) {
        let frame_w = self.image.width() as f32;
        let frame_h = self.image.height() as f32;
        let fit = (screen_width() / frame_w).min(screen_height() / frame_h);
        let (w, h) = (frame_w * fit, frame_h * fit);
        ((screen_width() - w) / 2.0, (screen_height() - h) / 2.0, w, h)
    }

    fn draw_status(&self, status: &str) {
        let y = screen_height() - 8.0;
        draw_text(status, 9.0, y + 1.0, HUD_FONT_SIZE, BLACK);
        draw_text(status, 8.0, y, HUD_FONT_SIZE, WHITE);
    }
}
