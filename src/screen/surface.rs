//! Pixel drawing primitives for virtual screen surfaces.
//!
//! Everything draws into an `RgbaImage` with source-over blending; text uses
//! the 8x8 `font8x8` glyph set, one glyph per character cell.

use font8x8::legacy::BASIC_LEGACY;
use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

use super::layout::PixelRect;

pub const GLYPH_SIZE: u32 = 8;

pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba<u8> {
    Rgba([r, g, b, a])
}

pub fn text_width(text: &str) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE
}

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

pub struct Canvas<'a> {
    image: &'a mut RgbaImage,
}

impl<'a> Canvas<'a> {
    pub fn new(image: &'a mut RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Overwrite every pixel, ignoring alpha blending.
    pub fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        let right = rect.right().min(self.width());
        let bottom = rect.bottom().min(self.height());
        for y in rect.y..bottom {
            for x in rect.x..right {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// One-pixel outline along the inside edge of `rect`.
    pub fn stroke_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let right = rect.right() - 1;
        let bottom = rect.bottom() - 1;
        let last_x = right.min(self.width().saturating_sub(1));
        for x in rect.x..=last_x {
            self.blend_pixel(x, rect.y, color);
            if bottom != rect.y {
                self.blend_pixel(x, bottom, color);
            }
        }
        for y in rect.y.saturating_add(1)..bottom.min(self.height()) {
            self.blend_pixel(rect.x, y, color);
            if right != rect.x {
                self.blend_pixel(right, y, color);
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`), clipped to
    /// `clip_right`. Returns the x just past the last drawn glyph.
    pub fn draw_text_clipped(&mut self, x: u32, y: u32, text: &str, color: Rgba<u8>, clip_right: u32) -> u32 {
        let clip_right = clip_right.min(self.width());
        let mut cursor = x;
        for ch in text.chars() {
            if cursor >= clip_right {
                break;
            }
            let glyph = glyph_for_char(ch);
            for (row, bits) in glyph.iter().enumerate() {
                let py = y.saturating_add(row as u32);
                for bit in 0..GLYPH_SIZE {
                    if (bits >> bit) & 0x01 == 0 {
                        continue;
                    }
                    let px = cursor + bit;
                    if px < clip_right {
                        self.blend_pixel(px, py, color);
                    }
                }
            }
            cursor += GLYPH_SIZE;
        }
        cursor.min(clip_right)
    }

    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Rgba<u8>) -> u32 {
        let right = self.width();
        self.draw_text_clipped(x, y, text, color, right)
    }

    pub fn draw_text_centered(&mut self, center_x: u32, center_y: u32, text: &str, color: Rgba<u8>) {
        let x = center_x.saturating_sub(text_width(text) / 2);
        let y = center_y.saturating_sub(GLYPH_SIZE / 2);
        self.draw_text(x, y, text, color);
    }

    pub fn draw_text_right(&mut self, right_x: u32, center_y: u32, text: &str, color: Rgba<u8>) {
        let x = right_x.saturating_sub(text_width(text));
        let y = center_y.saturating_sub(GLYPH_SIZE / 2);
        self.draw_text(x, y, text, color);
    }

    /// Scale `image` into `rect` and blend it over the surface.
    pub fn draw_image(&mut self, image: &RgbaImage, rect: PixelRect) {
        if rect.width == 0 || rect.height == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        if image.dimensions() == (rect.width, rect.height) {
            imageops::overlay(&mut *self.image, image, rect.x as i64, rect.y as i64);
        } else {
            let scaled = imageops::resize(image, rect.width, rect.height, FilterType::Triangle);
            imageops::overlay(&mut *self.image, &scaled, rect.x as i64, rect.y as i64);
        }
    }

    /// Fill `rect` with `image`, cropping instead of letterboxing: wide
    /// images lose their sides, tall images keep their top.
    pub fn draw_image_cover(&mut self, image: &RgbaImage, rect: PixelRect) {
        if rect.width == 0 || rect.height == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let (source_x, source_y, source_width, source_height) =
            cover_source(image.width(), image.height(), rect.width, rect.height);
        let cropped = imageops::crop_imm(image, source_x, source_y, source_width, source_height).to_image();
        self.draw_image(&cropped, rect);
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        if color[3] == 255 {
            self.image.put_pixel(x, y, color);
        } else {
            self.image.get_pixel_mut(x, y).blend(&color);
        }
    }
}

/// Source window `(x, y, width, height)` of an image drawn in cover mode
/// into a container of the given size.
pub fn cover_source(image_width: u32, image_height: u32, container_width: u32, container_height: u32) -> (u32, u32, u32, u32) {
    let image_ratio = image_width as f64 / image_height as f64;
    let container_ratio = container_width as f64 / container_height as f64;
    if image_ratio > container_ratio {
        let target_width = ((image_height as f64 * container_ratio).round() as u32).clamp(1, image_width);
        ((image_width - target_width) / 2, 0, target_width, image_height)
    } else {
        let target_height = ((image_width as f64 / container_ratio).round() as u32).clamp(1, image_height);
        (0, 0, image_width, target_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_is_clipped_to_the_surface() {
        let mut image = RgbaImage::new(8, 8);
        let mut canvas = Canvas::new(&mut image);
        canvas.fill_rect(PixelRect::new(6, 6, 10, 10), rgb(255, 0, 0));
        assert_eq!(image.get_pixel(7, 7), &rgb(255, 0, 0));
        assert_eq!(image.get_pixel(5, 5), &rgba(0, 0, 0, 0));
    }

    #[test]
    fn translucent_fill_blends() {
        let mut image = RgbaImage::from_pixel(2, 2, rgb(255, 255, 255));
        Canvas::new(&mut image).fill_rect(PixelRect::new(0, 0, 2, 2), rgba(0, 0, 0, 128));
        let pixel = image.get_pixel(0, 0);
        assert!(pixel[0] > 100 && pixel[0] < 150);
        assert!(pixel[3] >= 254);
    }

    #[test]
    fn stroke_leaves_the_interior_untouched() {
        let mut image = RgbaImage::new(5, 5);
        Canvas::new(&mut image).stroke_rect(PixelRect::new(0, 0, 5, 5), rgb(1, 2, 3));
        assert_eq!(image.get_pixel(0, 0), &rgb(1, 2, 3));
        assert_eq!(image.get_pixel(4, 4), &rgb(1, 2, 3));
        assert_eq!(image.get_pixel(0, 3), &rgb(1, 2, 3));
        assert_eq!(image.get_pixel(2, 2), &rgba(0, 0, 0, 0));
    }

    #[test]
    fn text_draws_glyph_pixels() {
        let mut image = RgbaImage::new(32, 8);
        let end = Canvas::new(&mut image).draw_text(0, 0, "H", rgb(255, 255, 255));
        assert_eq!(end, 8);
        let lit = image.pixels().filter(|pixel| pixel[3] == 255).count();
        assert!(lit > 0);
        assert!(image.pixels().skip(8).step_by(32).all(|pixel| pixel[3] == 0));
    }

    #[test]
    fn wide_images_are_cropped_on_the_sides() {
        assert_eq!(cover_source(400, 100, 100, 100), (150, 0, 100, 100));
    }

    #[test]
    fn tall_images_keep_their_top() {
        assert_eq!(cover_source(100, 400, 100, 50), (0, 0, 100, 50));
    }

    #[test]
    fn cover_fills_the_whole_rect() {
        let source = RgbaImage::from_pixel(30, 10, rgb(0, 200, 0));
        let mut image = RgbaImage::new(16, 16);
        Canvas::new(&mut image).draw_image_cover(&source, PixelRect::new(2, 2, 12, 12));
        assert_eq!(image.get_pixel(2, 2), &rgb(0, 200, 0));
        assert_eq!(image.get_pixel(13, 13), &rgb(0, 200, 0));
        assert_eq!(image.get_pixel(1, 1), &rgba(0, 0, 0, 0));
    }
}
