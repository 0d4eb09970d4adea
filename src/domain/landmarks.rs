// ============================================================
// Layer 3 — Landmark Layout
// ============================================================
// A landmark vector holds 21 facial keypoints as 42 floats,
// x and y interleaved:
//
//   [x0, y0, x1, y1, ..., x20, y20]
//
// Every coordinate is normalised by the image width (x) or
// height (y), so 0.0 is the left/top edge and 1.0 the right/
// bottom edge regardless of the crop resolution.

/// Number of facial keypoints predicted per face
pub const NUM_LANDMARKS: usize = 21;

/// Length of a landmark vector (x and y per keypoint)
pub const LANDMARK_VALUES: usize = NUM_LANDMARKS * 2;

/// Iterate the (x, y) pairs of an interleaved landmark vector.
/// A trailing unpaired value is ignored.
pub fn points(landmarks: &[f32]) -> impl Iterator<Item = (f32, f32)> + '_ {
    landmarks.chunks_exact(2).map(|p| (p[0], p[1]))
}

/// Scale normalised landmarks to integer pixel positions.
///
/// Truncates toward zero, so a point at x = 0.999 on a 108 px wide
/// image lands on column 107.
pub fn to_pixels(landmarks: &[f32], width: u32, height: u32) -> Vec<(i32, i32)> {
    let (w, h) = (width as f32, height as f32);
    points(landmarks)
        .map(|(x, y)| ((x * w) as i32, (y * h) as i32))
        .collect()
}
