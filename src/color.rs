/// Opaque 8-bit RGBA color, laid out to match `Rgba8UnormSrgb` texels.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RAYWHITE: Color = Color::rgb(245, 245, 245);
    pub const GRAY: Color = Color::rgb(130, 130, 130);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba(color.to_array())
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Self { r, g, b, a }
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        wgpu::Color {
            r: color.r as f64 / 255.0,
            g: color.g as f64 / 255.0,
            b: color.b as f64 / 255.0,
            a: color.a as f64 / 255.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_opaque() {
        for color in [Color::BLACK, Color::RAYWHITE, Color::GRAY, Color::RED] {
            assert_eq!(color.a, 255);
        }
    }

    #[test]
    fn converts_to_image_pixel() {
        let pixel: image::Rgba<u8> = Color::new(1, 2, 3, 4).into();
        assert_eq!(pixel.0, [1, 2, 3, 4]);
        assert_eq!(Color::from(pixel), Color::new(1, 2, 3, 4));
    }

    #[test]
    fn casts_to_texel_bytes() {
        let colors = [Color::RED, Color::BLUE];
        let bytes: &[u8] = bytemuck::cast_slice(&colors);
        assert_eq!(bytes, &[255, 0, 0, 255, 0, 0, 255, 255]);
    }
}
