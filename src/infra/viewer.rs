// ============================================================
// Layer 6 — Prediction Viewer
// ============================================================
// Shows annotated prediction frames one at a time.
//
// There is no window: each frame is written as a PNG into the
// output directory and its path printed, then the viewer waits
// for a line on its input.
//
//   Enter / anything   → next frame
//   Esc or q           → stop
//   end of input       → next frame without waiting
//
// The last rule lets `predict` run unattended with stdin closed.

use anyhow::{Context, Result};
use image::RgbImage;
use std::{
    fs,
    io::{self, BufRead, StdinLock},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    Next,
    Quit,
}

pub trait Viewer {
    fn show(&mut self, index: usize, frame: &RgbImage) -> Result<ViewerAction>;
}

pub struct FrameViewer<R: BufRead> {
    dir:   PathBuf,
    input: R,
}

impl FrameViewer<StdinLock<'static>> {
    pub fn stdin(dir: impl AsRef<Path>) -> Result<Self> {
        Self::new(dir, io::stdin().lock())
    }
}

impl<R: BufRead> FrameViewer<R> {
    pub fn new(dir: impl AsRef<Path>, input: R) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir, input })
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("predict_{index}.png"))
    }

    fn wait_for_key(&mut self) -> Result<ViewerAction> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Cannot read from stdin")?;
        if read == 0 {
            return Ok(ViewerAction::Next);
        }
        Ok(parse_key(&line))
    }
}

impl<R: BufRead> Viewer for FrameViewer<R> {
    fn show(&mut self, index: usize, frame: &RgbImage) -> Result<ViewerAction> {
        let path = self.frame_path(index);
        frame
            .save(&path)
            .with_context(|| format!("Cannot write frame '{}'", path.display()))?;

        println!("{}  [Enter: next, Esc/q: quit]", path.display());
        self.wait_for_key()
    }
}

fn parse_key(line: &str) -> ViewerAction {
    let key = line.trim_end_matches(['\r', '\n']);
    if key.contains('\u{1b}') || key.trim().eq_ignore_ascii_case("q") {
        ViewerAction::Quit
    } else {
        ViewerAction::Next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("\n"), ViewerAction::Next);
        assert_eq!(parse_key("x\n"), ViewerAction::Next);
        assert_eq!(parse_key("q\n"), ViewerAction::Quit);
        assert_eq!(parse_key("Q\r\n"), ViewerAction::Quit);
        assert_eq!(parse_key("\u{1b}\n"), ViewerAction::Quit);
    }

    #[test]
    fn test_show_writes_png_and_reads_key() {
        let tmp    = tempfile::tempdir().unwrap();
        let mut v  = FrameViewer::new(tmp.path().join("out"), Cursor::new("\nq\n")).unwrap();
        let frame  = RgbImage::new(4, 4);

        assert_eq!(v.show(0, &frame).unwrap(), ViewerAction::Next);
        assert_eq!(v.show(1, &frame).unwrap(), ViewerAction::Quit);
        assert!(tmp.path().join("out/predict_0.png").exists());
        assert!(tmp.path().join("out/predict_1.png").exists());
    }

    #[test]
    fn test_end_of_input_advances() {
        let tmp   = tempfile::tempdir().unwrap();
        let mut v = FrameViewer::new(tmp.path(), Cursor::new("")).unwrap();
        assert_eq!(v.show(0, &RgbImage::new(2, 2)).unwrap(), ViewerAction::Next);
        assert_eq!(v.show(1, &RgbImage::new(2, 2)).unwrap(), ViewerAction::Next);
    }
}
