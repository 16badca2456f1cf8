/// 8-bit ARGB color in sRGB space with straight alpha.
///
/// Constructor argument order is alpha first, matching how device colors are
/// usually written in configuration (`255, 140, 186, 250`).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(255, 0, 0, 0);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Normalized straight-alpha sRGB components `[r, g, b, a]`.
    #[inline]
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Linear-space straight-alpha components `[r, g, b, a]`.
    #[inline]
    pub fn to_linear(self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a as f32 / 255.0,
        ]
    }

    /// Linear-space premultiplied components, as expected by the blend state of
    /// every renderer.
    #[inline]
    pub fn to_linear_premul(self) -> [f32; 4] {
        let [r, g, b, a] = self.to_linear();
        [r * a, g * a, b * a, a]
    }

    /// Clear color for a render pass attachment.
    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.to_linear_premul();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
