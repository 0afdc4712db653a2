//! Colors used when committing fills to a render surface.

/// A device color value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// DeviceGray (0.0 = black, 1.0 = white).
    Gray(f32),
    /// DeviceRGB.
    Rgb(f32, f32, f32),
    /// DeviceCMYK.
    Cmyk(f32, f32, f32, f32),
}

impl Color {
    /// Opaque black.
    pub fn black() -> Self {
        Color::Gray(0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}
