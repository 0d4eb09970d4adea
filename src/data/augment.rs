// ============================================================
// Layer 4 — Training Augmentation
// ============================================================
// Applies the rotation policy to the training split by
// appending transformed copies of every sample:
//
//   none     → samples unchanged
//   flip     → + horizontal mirror            (x → 1 - x)
//   allangle → + 90°, 180°, 270° clockwise     (x, y) → (1 - y, x)
//
// Pixel buffers and landmarks are transformed together so the
// labels keep pointing at the same facial features.

use crate::domain::landmarks::points;
use crate::domain::rotation::RotationPolicy;
use crate::domain::sample::LandmarkSample;

pub fn apply(mut samples: Vec<LandmarkSample>, policy: RotationPolicy) -> Vec<LandmarkSample> {
    let extra: Vec<LandmarkSample> = match policy {
        RotationPolicy::None => return samples,
        RotationPolicy::Flip => samples.iter().map(flip_horizontal).collect(),
        RotationPolicy::AllAngle => samples
            .iter()
            .flat_map(|s| {
                let r90  = rotate90(s);
                let r180 = rotate90(&r90);
                let r270 = rotate90(&r180);
                [r90, r180, r270]
            })
            .collect(),
    };
    tracing::debug!("Augmentation '{}' added {} samples", policy, extra.len());
    samples.extend(extra);
    samples
}

/// Mirror left-right.
pub fn flip_horizontal(s: &LandmarkSample) -> LandmarkSample {
    let (w, h) = (s.width, s.height);
    let mut image = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            image.push(s.pixel(w - 1 - x, y));
        }
    }
    let landmarks = points(&s.landmarks)
        .flat_map(|(x, y)| [1.0 - x, y])
        .collect();
    LandmarkSample::new(image, w, h, landmarks)
}

/// Rotate 90° clockwise; width and height swap.
pub fn rotate90(s: &LandmarkSample) -> LandmarkSample {
    let (w, h) = (s.width, s.height);
    // out(x', y') = in(y', h - 1 - x'), output is h wide and w tall
    let mut image = Vec::with_capacity(w * h);
    for y_out in 0..w {
        for x_out in 0..h {
            image.push(s.pixel(y_out, h - 1 - x_out));
        }
    }
    let landmarks = points(&s.landmarks)
        .flat_map(|(x, y)| [1.0 - y, x])
        .collect();
    LandmarkSample::new(image, h, w, landmarks)
}
