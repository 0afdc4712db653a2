//! Render surface interface for glyph fills.

use pdfscan_core::{Color, Ctm, Path};

/// A target that glyph outlines are filled onto.
///
/// Paths arrive in user space; the surface's own transform maps them to
/// device space.
pub trait RenderSurface {
    /// Fill `path` with `color`.
    fn fill(&mut self, path: &Path, color: Color);

    /// Transform from user space to device space currently in effect.
    fn transform(&self) -> Ctm {
        Ctm::identity()
    }
}

/// One fill committed to a [`PathRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilledPath {
    pub path: Path,
    pub color: Color,
    /// Surface transform at the time of the fill.
    pub transform: Ctm,
}

/// A surface that records fills instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct PathRecorder {
    transform: Ctm,
    fills: Vec<FilledPath>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose device transform is `transform`.
    pub fn with_transform(transform: Ctm) -> Self {
        Self {
            transform,
            fills: Vec::new(),
        }
    }

    pub fn fills(&self) -> &[FilledPath] {
        &self.fills
    }

    pub fn into_fills(self) -> Vec<FilledPath> {
        self.fills
    }
}

impl RenderSurface for PathRecorder {
    fn fill(&mut self, path: &Path, color: Color) {
        self.fills.push(FilledPath {
            path: path.clone(),
            color,
            transform: self.transform,
        });
    }

    fn transform(&self) -> Ctm {
        self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_fills_in_order() {
        let mut recorder = PathRecorder::with_transform(Ctm::translation(0.0, 10.0));
        let mut a = Path::new();
        a.rectangle(0.0, 0.0, 1.0, 1.0);
        let mut b = Path::new();
        b.rectangle(5.0, 5.0, 1.0, 1.0);

        recorder.fill(&a, Color::black());
        recorder.fill(&b, Color::Rgb(1.0, 0.0, 0.0));

        let fills = recorder.into_fills();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].path, a);
        assert_eq!(fills[1].color, Color::Rgb(1.0, 0.0, 0.0));
        assert_eq!(fills[1].transform, Ctm::translation(0.0, 10.0));
    }

    #[test]
    fn default_transform_is_identity() {
        struct Sink;
        impl RenderSurface for Sink {
            fn fill(&mut self, _path: &Path, _color: Color) {}
        }
        assert_eq!(Sink.transform(), Ctm::identity());
        assert_eq!(PathRecorder::new().transform(), Ctm::identity());
    }
}
