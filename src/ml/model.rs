// ============================================================
// Layer 5 — Landmark Detector Network
// ============================================================
// A small CNN that regresses 21 (x, y) landmarks from a
// 108 x 108 grayscale face crop.
//
//   input  [N, 1, 108, 108]
//   block1 conv5x5/2  1→8    PReLU  pool  norm      52 → 26
//   block2 conv3x3    8→16   PReLU
//          conv3x3   16→16   PReLU  pool  norm      26 → 24 → 22 → 11
//   block3 conv3x3   16→24   PReLU
//          conv3x3   24→24   PReLU  pool  norm      11 → 9 → 7 → 4
//   block4 conv3x3   24→40   PReLU  (same padding)
//          conv3x3   40→80   PReLU  (same padding)   4 → 4
//   head   1280 → 128 PReLU → 128 PReLU → 42
//
// The three normalisation layers exist whether or not batch_norm
// is enabled, so a checkpoint has the same layout either way.

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::{MseLoss, Reduction},
        Linear, LinearConfig, PRelu, PReluConfig, PaddingConfig2d,
    },
    prelude::*,
};

use crate::domain::landmarks::LANDMARK_VALUES;
use crate::ml::norm::{ChannelNorm, ChannelNormConfig};
use crate::ml::pool::CeilAvgPool;

/// Channels x height x width of the final feature map
pub const HEAD_INPUT: usize = 80 * 4 * 4;
const HIDDEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Eval,
}

#[derive(Config, Debug)]
pub struct DetectorConfig {
    #[config(default = true)]
    pub batch_norm: bool,
}

impl DetectorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Detector<B> {
        let reduce = vec![
            ReduceBlock::new(
                vec![Conv2dConfig::new([1, 8], [5, 5]).with_stride([2, 2])],
                device,
            ),
            ReduceBlock::new(
                vec![
                    Conv2dConfig::new([8, 16], [3, 3]),
                    Conv2dConfig::new([16, 16], [3, 3]),
                ],
                device,
            ),
            ReduceBlock::new(
                vec![
                    Conv2dConfig::new([16, 24], [3, 3]),
                    Conv2dConfig::new([24, 24], [3, 3]),
                ],
                device,
            ),
        ];

        let trunk = vec![
            ConvUnit::new(Conv2dConfig::new([24, 40], [3, 3]).with_padding(PaddingConfig2d::Same), device),
            ConvUnit::new(Conv2dConfig::new([40, 80], [3, 3]).with_padding(PaddingConfig2d::Same), device),
        ];

        Detector {
            reduce,
            trunk,
            head: LandmarkHead::new(device),
            pool: CeilAvgPool::new(),
            batch_norm: self.batch_norm,
        }
    }
}

// ─── Building blocks ──────────────────────────────────────────────────────────

#[derive(Module, Debug)]
pub struct ConvUnit<B: Backend> {
    pub conv: Conv2d<B>,
    pub act:  PRelu<B>,
}

impl<B: Backend> ConvUnit<B> {
    fn new(conv: Conv2dConfig, device: &B::Device) -> Self {
        Self {
            conv: conv.init(device),
            act:  PReluConfig::new().init(device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.act.forward(self.conv.forward(x))
    }
}

/// Convolutions, then ceil-mode pooling, then optional normalisation
#[derive(Module, Debug)]
pub struct ReduceBlock<B: Backend> {
    pub units: Vec<ConvUnit<B>>,
    pub norm:  ChannelNorm<B>,
}

impl<B: Backend> ReduceBlock<B> {
    fn new(convs: Vec<Conv2dConfig>, device: &B::Device) -> Self {
        let channels = convs.last().map(|c| c.channels[1]).unwrap_or(1);
        Self {
            units: convs.into_iter().map(|c| ConvUnit::new(c, device)).collect(),
            norm:  ChannelNormConfig::new(channels).init(device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>, pool: &CeilAvgPool, batch_norm: bool) -> Tensor<B, 4> {
        let x = self.units.iter().fold(x, |x, unit| unit.forward(x));
        let x = pool.forward(x);
        if batch_norm { self.norm.forward(x) } else { x }
    }
}

#[derive(Module, Debug)]
pub struct LandmarkHead<B: Backend> {
    pub fc1:  Linear<B>,
    pub act1: PRelu<B>,
    pub fc2:  Linear<B>,
    pub act2: PRelu<B>,
    pub out:  Linear<B>,
}

impl<B: Backend> LandmarkHead<B> {
    fn new(device: &B::Device) -> Self {
        Self {
            fc1:  LinearConfig::new(HEAD_INPUT, HIDDEN).init(device),
            act1: PReluConfig::new().init(device),
            fc2:  LinearConfig::new(HIDDEN, HIDDEN).init(device),
            act2: PReluConfig::new().init(device),
            out:  LinearConfig::new(HIDDEN, LANDMARK_VALUES).init(device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.act1.forward(self.fc1.forward(x));
        let x = self.act2.forward(self.fc2.forward(x));
        self.out.forward(x)
    }
}

// ─── Detector ─────────────────────────────────────────────────────────────────

#[derive(Module, Debug)]
pub struct Detector<B: Backend> {
    pub reduce: Vec<ReduceBlock<B>>,
    pub trunk:  Vec<ConvUnit<B>>,
    pub head:   LandmarkHead<B>,
    pub pool:   CeilAvgPool,
    batch_norm: bool,
}

impl<B: Backend> Detector<B> {
    pub fn batch_norm(&self) -> bool {
        self.batch_norm
    }

    /// images: [N, 1, 108, 108] → landmarks: [N, 42]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self
            .reduce
            .iter()
            .fold(images, |x, block| block.forward(x, &self.pool, self.batch_norm));
        let x = self.trunk.iter().fold(x, |x, unit| unit.forward(x));

        let [batch, channels, height, width] = x.dims();
        self.head.forward(x.reshape([batch, channels * height * width]))
    }

    /// Returns (loss, predictions)
    pub fn forward_loss(&self, images: Tensor<B, 4>, targets: Tensor<B, 2>) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let output = self.forward(images);
        let loss   = landmark_loss(output.clone(), targets);
        (loss, output)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        for block in self.reduce.iter_mut() {
            block.norm.set_training(mode == Mode::Train);
        }
    }

    #[cfg(test)]
    pub fn mode(&self) -> Mode {
        match self.reduce.first() {
            Some(block) if !block.norm.is_training() => Mode::Eval,
            _ => Mode::Train,
        }
    }

    pub fn set_running_stats(&mut self, track: bool) {
        for block in self.reduce.iter_mut() {
            block.norm.set_track_running_stats(track);
        }
    }
}

/// Mean squared error over every coordinate of every sample
pub fn landmark_loss<B: Backend>(output: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    MseLoss::new().forward(output, targets, Reduction::Mean)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    fn input(device: &NdArrayDevice) -> Tensor<TestBackend, 4> {
        Tensor::random([2, 1, 108, 108], Distribution::Normal(0.0, 1.0), device)
    }

    fn max_abs_diff(a: Tensor<TestBackend, 2>, b: Tensor<TestBackend, 2>) -> f32 {
        let a = a.into_data().to_vec::<f32>().unwrap();
        let b = b.into_data().to_vec::<f32>().unwrap();
        a.iter().zip(&b).map(|(x, y)| (x - y).abs()).fold(0.0, f32::max)
    }

    #[test]
    fn test_output_shape_with_and_without_norm() {
        let device = NdArrayDevice::default();
        for batch_norm in [true, false] {
            let model = DetectorConfig::new().with_batch_norm(batch_norm).init::<TestBackend>(&device);
            assert_eq!(model.forward(input(&device)).dims(), [2, LANDMARK_VALUES]);
        }
    }

    #[test]
    fn test_train_and_eval_differ_only_with_norm() {
        let device = NdArrayDevice::default();
        let x = input(&device);

        let mut with_bn = DetectorConfig::new().init::<TestBackend>(&device);
        with_bn.set_running_stats(false);
        with_bn.set_mode(Mode::Train);
        let train_out = with_bn.forward(x.clone());
        with_bn.set_mode(Mode::Eval);
        let eval_out = with_bn.forward(x.clone());
        assert!(max_abs_diff(train_out, eval_out) > 1e-6);

        let mut without_bn = DetectorConfig::new().with_batch_norm(false).init::<TestBackend>(&device);
        without_bn.set_mode(Mode::Train);
        let train_out = without_bn.forward(x.clone());
        without_bn.set_mode(Mode::Eval);
        let eval_out = without_bn.forward(x);
        assert_eq!(max_abs_diff(train_out, eval_out), 0.0);
    }

    #[test]
    fn test_running_stats_move_only_when_training_and_tracking() {
        let device = NdArrayDevice::default();
        let mut model = DetectorConfig::new().init::<TestBackend>(&device);
        let running = |m: &Detector<TestBackend>| {
            m.reduce[0].norm.running_mean.value_sync().into_data().to_vec::<f32>().unwrap()
        };
        let fresh = running(&model);

        model.set_mode(Mode::Eval);
        model.forward(input(&device));
        assert_eq!(running(&model), fresh);

        model.set_mode(Mode::Train);
        model.set_running_stats(false);
        model.forward(input(&device));
        assert_eq!(running(&model), fresh);

        model.set_running_stats(true);
        model.forward(input(&device));
        assert_ne!(running(&model), fresh);
    }

    #[test]
    fn test_mode_defaults_to_train() {
        let device = NdArrayDevice::default();
        let mut model = DetectorConfig::new().init::<TestBackend>(&device);
        assert_eq!(model.mode(), Mode::Train);
        model.set_mode(Mode::Eval);
        assert_eq!(model.mode(), Mode::Eval);
    }

    #[test]
    fn test_loss_zero_only_on_exact_match() {
        let device = NdArrayDevice::default();
        let target = Tensor::<TestBackend, 2>::random([3, LANDMARK_VALUES], Distribution::Default, &device);

        let same: f32 = landmark_loss(target.clone(), target.clone()).into_scalar().elem();
        assert_eq!(same, 0.0);

        let shifted: f32 = landmark_loss(target.clone().add_scalar(0.5), target).into_scalar().elem();
        assert!((shifted - 0.25).abs() < 1e-5);
    }
}
