// Destinations for laid-out figures

use std::fs;
use std::path::{Path, PathBuf};

use crate::figure::Figure;
use crate::render::render_svg;
use crate::PlotError;

/// Receives each figure as soon as it has been laid out.
///
/// `present` must return without waiting on any viewer; the caller moves on
/// to the next figure immediately.
pub trait FigureSink {
    fn present(&mut self, figure: &Figure) -> Result<(), PlotError>;
}

/// Keeps the layouts themselves.
impl FigureSink for Vec<Figure> {
    fn present(&mut self, figure: &Figure) -> Result<(), PlotError> {
        self.push(figure.clone());
        Ok(())
    }
}

impl<S: FigureSink + ?Sized> FigureSink for &mut S {
    fn present(&mut self, figure: &Figure) -> Result<(), PlotError> {
        (**self).present(figure)
    }
}

/// Writes every figure as an SVG file into a directory.
///
/// Files are named `<seq>_<stem>.svg` with a three-digit sequence number
/// counting from 1, so repeated plots of the same plane do not overwrite
/// each other.
#[derive(Debug)]
pub struct SvgDirectory {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl SvgDirectory {
    /// Creates the directory (and parents) if missing.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, PlotError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create output directory {:?}: {}", dir, e))?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in presentation order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FigureSink for SvgDirectory {
    fn present(&mut self, figure: &Figure) -> Result<(), PlotError> {
        let path = self
            .dir
            .join(format!("{:03}_{}.svg", self.written.len() + 1, figure.file_stem()));
        let svg = render_svg(figure)?;
        fs::write(&path, svg).map_err(|e| format!("Failed to write {:?}: {}", path, e))?;
        log::info!("Wrote {:?}.", path);
        self.written.push(path);
        Ok(())
    }
}

/// Renders every figure to an in-memory SVG document.
#[derive(Debug, Default)]
pub struct SvgCollector {
    /// `(file stem, svg document)` in presentation order.
    pub documents: Vec<(String, String)>,
}

impl SvgCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FigureSink for SvgCollector {
    fn present(&mut self, figure: &Figure) -> Result<(), PlotError> {
        let svg = render_svg(figure)?;
        self.documents.push((figure.file_stem(), svg));
        Ok(())
    }
}
