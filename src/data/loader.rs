// ============================================================
// Layer 4 — Label File Loader
// ============================================================
// Loads labelled face images described by plain-text label
// files inside a data directory:
//
//   data/
//     train.txt        ← required
//     test.txt         ← optional; without it train.txt is split 80/20
//     images/...       ← paths in the label files are relative to data/
//
// Two line layouts are accepted (whitespace separated):
//
//   <image> <42 normalised landmark values>
//       the image is already a face crop
//
//   <image> <x1 y1 x2 y2> <42 landmark values in pixels>
//       the image is a full photo; the face rectangle is cropped
//       and the landmarks re-expressed relative to the crop
//
// Blank lines and lines starting with '#' are skipped.
//
// Reference: image crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use image::{DynamicImage, GenericImageView};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::{augment, preprocessor::Preprocessor, splitter::split_train_val};
use crate::domain::landmarks::{points, LANDMARK_VALUES};
use crate::domain::rotation::RotationPolicy;
use crate::domain::sample::LandmarkSample;
use crate::domain::traits::{SampleSource, SampleSplit};

pub const TRAIN_LABELS: &str = "train.txt";
pub const TEST_LABELS:  &str = "test.txt";

/// Fraction of train.txt kept for training when there is no test.txt
const TRAIN_FRACTION: f64 = 0.8;

/// One parsed line of a label file
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLine {
    pub image:     PathBuf,
    /// Face rectangle (x1, y1, x2, y2) in pixels, if the image is a full photo
    pub face:      Option<[f32; 4]>,
    pub landmarks: Vec<f32>,
}

/// Parse one non-empty label line.
pub fn parse_label_line(line: &str) -> Result<LabelLine> {
    let mut tokens = line.split_whitespace();
    let image = tokens
        .next()
        .map(PathBuf::from)
        .context("empty label line")?;

    let values = tokens
        .map(|t| t.parse::<f32>().with_context(|| format!("'{t}' is not a number")))
        .collect::<Result<Vec<f32>>>()?;

    match values.len() {
        LANDMARK_VALUES => Ok(LabelLine { image, face: None, landmarks: values }),
        n if n == LANDMARK_VALUES + 4 => Ok(LabelLine {
            image,
            face:      Some([values[0], values[1], values[2], values[3]]),
            landmarks: values[4..].to_vec(),
        }),
        n => bail!(
            "expected {} landmark values (optionally preceded by a 4-value face box), found {}",
            LANDMARK_VALUES,
            n
        ),
    }
}

/// Loads samples from `train.txt` / `test.txt` under a directory.
/// Implements the SampleSource trait from Layer 3.
pub struct LabelFileSource {
    dir:          PathBuf,
    preprocessor: Preprocessor,
    seed:         u64,
}

impl LabelFileSource {
    pub fn new(dir: impl Into<PathBuf>, crop_size: usize, seed: u64) -> Self {
        Self {
            dir:          dir.into(),
            preprocessor: Preprocessor::new(crop_size),
            seed,
        }
    }

    fn load_file(&self, path: &Path) -> Result<Vec<LandmarkSample>> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read label file '{}'", path.display()))?;

        let mut samples = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let label = parse_label_line(line)
                .with_context(|| format!("{}:{}", path.display(), idx + 1))?;
            samples.push(self.load_sample(&label)?);
        }

        tracing::info!("Loaded {} samples from '{}'", samples.len(), path.display());
        Ok(samples)
    }

    fn load_sample(&self, label: &LabelLine) -> Result<LandmarkSample> {
        let path = self.dir.join(&label.image);
        let img  = image::open(&path)
            .with_context(|| format!("Cannot open image '{}'", path.display()))?;

        let (img, landmarks) = match label.face {
            Some(face) => crop_face(&img, face, &label.landmarks),
            None       => (img, label.landmarks.clone()),
        };

        let size = self.preprocessor.crop_size();
        Ok(LandmarkSample::new(self.preprocessor.prepare(&img), size, size, landmarks))
    }
}

/// Crop the face rectangle and express pixel landmarks relative to it.
fn crop_face(img: &DynamicImage, face: [f32; 4], landmarks: &[f32]) -> (DynamicImage, Vec<f32>) {
    let (img_w, img_h) = img.dimensions();
    let x1 = face[0].max(0.0).min(img_w.saturating_sub(1) as f32) as u32;
    let y1 = face[1].max(0.0).min(img_h.saturating_sub(1) as f32) as u32;
    let x2 = (face[2].max(0.0) as u32).clamp(x1 + 1, img_w.max(x1 + 1));
    let y2 = (face[3].max(0.0) as u32).clamp(y1 + 1, img_h.max(y1 + 1));
    let (w, h) = (x2 - x1, y2 - y1);

    let normalised = points(landmarks)
        .flat_map(|(x, y)| [(x - x1 as f32) / w as f32, (y - y1 as f32) / h as f32])
        .collect();

    (img.crop_imm(x1, y1, w, h), normalised)
}

impl SampleSource for LabelFileSource {
    fn load_split(&self, rotation: RotationPolicy) -> Result<SampleSplit> {
        let train_path = self.dir.join(TRAIN_LABELS);
        if !train_path.exists() {
            bail!(
                "No '{}' in data directory '{}'. Point --data-dir at a labelled dataset \
                 or use --synthetic N.",
                TRAIN_LABELS,
                self.dir.display()
            );
        }

        let train_all  = self.load_file(&train_path)?;
        let test_path  = self.dir.join(TEST_LABELS);
        let (train, test) = if test_path.exists() {
            (train_all, self.load_file(&test_path)?)
        } else {
            tracing::info!("No '{}' found — splitting '{}'", TEST_LABELS, TRAIN_LABELS);
            split_train_val(train_all, TRAIN_FRACTION, self.seed)
        };

        Ok(SampleSplit { train: augment::apply(train, rotation), test })
    }
}
