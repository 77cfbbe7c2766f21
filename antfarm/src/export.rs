use anyhow::{Context, Result};
use macroquad::prelude::Image;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Writes frames as `run-<millis>/set-<NNNN>/f<NNNNNNNN>.png`.
pub struct FrameExporter {
    run_dir: PathBuf,
    set_dir: Option<PathBuf>,
    pub frames_written: u64,
}

impl FrameExporter {
    /// Creates the run directory under `root`, named after the current time.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self::with_run_dir(root.as_ref().join(format!("run-{}", millis)))
    }

    pub fn with_run_dir(run_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&run_dir)
            .with_context(|| format!("Failed to create export directory '{}'", run_dir.display()))?;
        info!("Exporting frames to '{}'", run_dir.display());
        Ok(Self {
            run_dir,
            set_dir: None,
            frames_written: 0,
        })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Starts the directory for run number `set`.
    pub fn begin_set(&mut self, set: u32) -> Result<()> {
        let dir = self.run_dir.join(format!("set-{:04}", set));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create set directory '{}'", dir.display()))?;
        self.set_dir = Some(dir);
        Ok(())
    }

    pub fn frame_path(&self, frame: u64) -> Option<PathBuf> {
        self.set_dir
            .as_ref()
            .map(|dir| dir.join(format!("f{:08}.png", frame)))
    }

    /// Writes `image` as frame number `frame` of the current set.
    pub fn write(&mut self, image: &Image, frame: u64) -> Result<()> {
        let path = self
            .frame_path(frame)
            .context("No set started before writing a frame")?;
        let path_str = path
            .to_str()
            .with_context(|| format!("Export path '{}' is not valid UTF-8", path.display()))?;
        // `export_png` writes rows bottom-up, as for a GPU readback.
        flipped_rows(image).export_png(path_str);
        self.frames_written += 1;
        Ok(())
    }
}

/// A copy of `image` with its rows in reverse order.
fn flipped_rows(image: &Image) -> Image {
    let stride = image.width as usize * 4;
    let bytes = if stride == 0 {
        Vec::new()
    } else {
        image.bytes.chunks_exact(stride).rev().flatten().copied().collect()
    };
    Image {
        bytes,
        width: image.width,
        height: image.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::render_frame;
    use antgrid::{EntityKind, Grid};

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("antfarm-export-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_frame_paths_follow_set_layout() {
        let root = scratch("paths");
        let mut exporter = FrameExporter::with_run_dir(root.join("run-1")).unwrap();
        assert_eq!(exporter.frame_path(0), None);
        exporter.begin_set(3).unwrap();
        assert_eq!(
            exporter.frame_path(12),
            Some(root.join("run-1").join("set-0003").join("f00000012.png"))
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn test_write_requires_a_set() {
        let root = scratch("noset");
        let mut exporter = FrameExporter::with_run_dir(root.clone()).unwrap();
        let image = render_frame(&Grid::new(2, 2).unwrap(), 0, 1);
        assert!(exporter.write(&image, 0).is_err());
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn test_write_creates_png() {
        let root = scratch("png");
        let mut exporter = FrameExporter::with_run_dir(root.clone()).unwrap();
        exporter.begin_set(0).unwrap();
        let image = render_frame(&Grid::new(4, 3).unwrap(), 2, 2);
        exporter.write(&image, 7).unwrap();
        let path = exporter.frame_path(7).unwrap();
        let bytes = fs::read(path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        assert_eq!(exporter.frames_written, 1);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn test_png_keeps_top_row_on_top() {
        let root = scratch("orientation");
        let mut exporter = FrameExporter::with_run_dir(root.clone()).unwrap();
        exporter.begin_set(0).unwrap();
        let mut grid = Grid::new(1, 4).unwrap();
        grid.put(0, 0, EntityKind::Water);
        let frame = render_frame(&grid, 0, 1);
        exporter.write(&frame, 0).unwrap();

        let bytes = fs::read(exporter.frame_path(0).unwrap()).unwrap();
        let png = Image::from_file_with_format(&bytes, None).unwrap();
        assert_eq!((png.width, png.height), (1, 4));
        assert_eq!(png.get_pixel(0, 0), frame.get_pixel(0, 0));
        assert_eq!(png.get_pixel(0, 3), frame.get_pixel(0, 3));
        assert_ne!(png.get_pixel(0, 0), png.get_pixel(0, 3));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn test_flipped_rows_reverses_rows_only() {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.put(1, 0, EntityKind::Food);
        let image = render_frame(&grid, 0, 1);
        let flipped = flipped_rows(&image);
        assert_eq!(flipped.get_pixel(1, 2), image.get_pixel(1, 0));
        assert_eq!(flipped.get_pixel(0, 1), image.get_pixel(0, 1));
        assert_eq!(flipped_rows(&flipped).bytes, image.bytes);
    }
}
