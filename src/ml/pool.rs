// ============================================================
// Layer 5 — Ceil-mode Average Pooling
// ============================================================
// 2x2 / stride 2 average pooling that keeps the partial window
// on an odd edge instead of dropping it:
//
//   11 x 11 → 6 x 6 (floor mode would give 5 x 5)
//
// The partial window is averaged over the elements it actually
// covers. The map is zero-padded on the bottom/right edge and
// divided by the pooled coverage of an all-ones mask, which is
// 1.0 for full windows and 0.5 / 0.25 on the ragged edge.

use burn::{
    nn::pool::{AvgPool2d, AvgPool2dConfig},
    prelude::*,
};

#[derive(Module, Clone, Debug)]
pub struct CeilAvgPool {
    pool: AvgPool2d,
}

impl CeilAvgPool {
    pub fn new() -> Self {
        Self {
            pool: AvgPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
        }
    }

    /// Output side is ceil(side / 2).
    pub fn forward<B: Backend>(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let [_, _, height, width] = input.dims();
        let (pad_rows, pad_cols) = (height % 2, width % 2);
        if pad_rows == 0 && pad_cols == 0 {
            return self.pool.forward(input);
        }

        let device   = input.device();
        let coverage = pad_bottom_right(
            Tensor::<B, 4>::ones([1, 1, height, width], &device),
            pad_rows,
            pad_cols,
        );
        let padded = pad_bottom_right(input, pad_rows, pad_cols);

        self.pool.forward(padded) / self.pool.forward(coverage)
    }
}

impl Default for CeilAvgPool {
    fn default() -> Self {
        Self::new()
    }
}

fn pad_bottom_right<B: Backend>(x: Tensor<B, 4>, rows: usize, cols: usize) -> Tensor<B, 4> {
    let device = x.device();
    let [batch, channels, height, width] = x.dims();

    let x = if cols > 0 {
        Tensor::cat(vec![x, Tensor::zeros([batch, channels, height, cols], &device)], 3)
    } else {
        x
    };
    if rows > 0 {
        Tensor::cat(vec![x, Tensor::zeros([batch, channels, rows, width + cols], &device)], 2)
    } else {
        x
    }
}
