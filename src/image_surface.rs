use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::RgbaImage;

use crate::{color::Color, render_loop::DisplaySurface};

const GLYPH_SIZE: u32 = 8;

/// Off-screen display surface backed by an RGBA image.
///
/// The window surface draws into one of these before uploading it to the
/// GPU; tests use it directly.
pub struct ImageSurface {
    image: RgbaImage,
    in_frame: bool,
    presented: u64,
    close_after: Option<u64>,
    closed: bool,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            in_frame: false,
            presented: 0,
            close_after: None,
            closed: false,
        }
    }

    /// Reports a close request once `frames` frames have been presented.
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        (*self.image.get_pixel(x, y)).into()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, color.into());
        }
    }
}

impl DisplaySurface for ImageSurface {
    fn clear(&mut self, color: Color) {
        let pixel: image::Rgba<u8> = color.into();
        self.image.pixels_mut().for_each(|p| *p = pixel);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.put(x, y, color);
    }

    /// Renders `text` with 8x8 bitmap glyphs scaled to roughly `size` pixels.
    /// Characters without a glyph advance the pen but draw nothing.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: u32, color: Color) {
        let scale = (size / GLYPH_SIZE).max(1) as i32;
        let advance = GLYPH_SIZE as i32 * scale;

        let mut pen_x = x;
        for ch in text.chars() {
            if let Some(glyph) = BASIC_FONTS.get(ch) {
                for (row, &bits) in glyph.iter().enumerate() {
                    for column in 0..GLYPH_SIZE as i32 {
                        // Bit 0 is the leftmost pixel.
                        if (bits >> column) & 1 == 0 {
                            continue;
                        }
                        let gx = pen_x + column * scale;
                        let gy = y + row as i32 * scale;
                        for dy in 0..scale {
                            for dx in 0..scale {
                                self.put(gx + dx, gy + dy, color);
                            }
                        }
                    }
                }
            }
            pen_x += advance;
        }
    }

    fn begin_frame(&mut self) {
        self.in_frame = true;
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
        self.presented += 1;
    }

    fn should_close(&mut self) -> bool {
        self.closed || self.close_after.is_some_and(|frames| self.presented >= frames)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut surface = ImageSurface::new(4, 4);
        surface.clear(Color::BLACK);
        surface.set_pixel(-1, 0, Color::RED);
        surface.set_pixel(4, 0, Color::RED);
        surface.set_pixel(0, 4, Color::RED);
        surface.set_pixel(3, 3, Color::RED);
        assert_eq!(surface.pixel(3, 3), Color::RED);
        let red = surface
            .image()
            .pixels()
            .filter(|p| Color::from(**p) == Color::RED)
            .count();
        assert_eq!(red, 1);
    }

    #[test]
    fn text_stays_inside_its_box() {
        let mut surface = ImageSurface::new(64, 32);
        surface.clear(Color::BLACK);
        surface.draw_text("Hi", 2, 3, 16, Color::GRAY);

        let mut drawn = 0;
        for (x, y, pixel) in surface.image().enumerate_pixels() {
            if Color::from(*pixel) == Color::GRAY {
                drawn += 1;
                // Two glyphs at scale 2.
                assert!((2..2 + 32).contains(&x));
                assert!((3..3 + 16).contains(&y));
            }
        }
        assert!(drawn > 0);
    }

    #[test]
    fn blank_text_draws_nothing() {
        let mut surface = ImageSurface::new(16, 16);
        surface.clear(Color::BLACK);
        surface.draw_text("  ", 0, 0, 8, Color::RED);
        assert!(surface
            .image()
            .pixels()
            .all(|p| Color::from(*p) == Color::BLACK));
    }

    #[test]
    fn schedules_close_after_presented_frames() {
        let mut surface = ImageSurface::new(2, 2).close_after(2);
        assert!(!surface.should_close());
        for _ in 0..2 {
            surface.begin_frame();
            assert!(surface.in_frame());
            surface.end_frame();
        }
        assert!(!surface.in_frame());
        assert!(surface.should_close());
        surface.close();
        assert!(surface.is_closed());
    }
}
