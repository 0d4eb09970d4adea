// ============================================================
// Layer 5 — Channel Normalisation (batch norm, explicit mode)
// ============================================================
// Per-channel batch normalisation for [N, C, H, W] maps.
//
// Burn's own BatchNorm picks batch vs running statistics from
// the backend (autodiff or not). The detector needs both flags
// as explicit state that the trainer flips before each phase:
//
//   training  track_running_stats   statistics used   running stats
//   ────────  ───────────────────   ───────────────   ─────────────
//   true      true                  batch             updated
//   true      false                 batch             frozen
//   false     (ignored)             running           frozen
//
// Running variance is updated with the unbiased batch variance;
// normalisation itself uses the biased one.
//
// Reference: Ioffe & Szegedy (2015) Batch Normalization

use burn::{
    module::{Param, RunningState},
    nn::Initializer,
    prelude::*,
};

#[derive(Config, Debug)]
pub struct ChannelNormConfig {
    pub num_features: usize,
    #[config(default = 0.1)]
    pub momentum: f64,
    #[config(default = 1e-5)]
    pub epsilon: f64,
}

impl ChannelNormConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ChannelNorm<B> {
        let gamma = Initializer::Ones.init([self.num_features], device);
        let beta  = Initializer::Zeros.init([self.num_features], device);

        let running_mean = Tensor::zeros([self.num_features], device);
        let running_var  = Tensor::ones([self.num_features], device);

        ChannelNorm {
            gamma,
            beta,
            running_mean:        RunningState::new(running_mean),
            running_var:         RunningState::new(running_var),
            momentum:            self.momentum,
            epsilon:             self.epsilon,
            training:            true,
            track_running_stats: true,
        }
    }
}

#[derive(Module, Debug)]
pub struct ChannelNorm<B: Backend> {
    pub gamma:        Param<Tensor<B, 1>>,
    pub beta:         Param<Tensor<B, 1>>,
    pub running_mean: RunningState<Tensor<B, 1>>,
    pub running_var:  RunningState<Tensor<B, 1>>,
    momentum:            f64,
    epsilon:             f64,
    training:            bool,
    track_running_stats: bool,
}

impl<B: Backend> ChannelNorm<B> {
    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    pub fn set_track_running_stats(&mut self, track: bool) {
        self.track_running_stats = track;
    }

    #[cfg(test)]
    pub fn is_training(&self) -> bool {
        self.training
    }

    #[cfg(test)]
    pub fn tracks_running_stats(&self) -> bool {
        self.track_running_stats
    }

    /// input: [batch, channels, height, width]
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        if self.training {
            self.forward_batch_stats(input)
        } else {
            self.forward_running_stats(input)
        }
    }

    fn forward_running_stats(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let channels = input.dims()[1];
        let mean = self.running_mean.value_sync().reshape([1, channels, 1, 1]);
        let var  = self.running_var.value_sync().reshape([1, channels, 1, 1]);
        self.normalize(input, mean, var)
    }

    fn forward_batch_stats(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let [batch, channels, height, width] = input.dims();
        let count = batch * height * width;

        // [C, N*H*W] so every row holds one channel
        let flat     = input.clone().swap_dims(0, 1).reshape([channels, count]);
        let mean     = flat.clone().mean_dim(1);
        let centered = flat - mean.clone();
        let var      = (centered.clone() * centered).mean_dim(1);

        if self.track_running_stats {
            let correction = if count > 1 { count as f64 / (count - 1) as f64 } else { 1.0 };
            let batch_mean = mean.clone().detach().reshape([channels]);
            let batch_var  = var.clone().detach().reshape([channels]).mul_scalar(correction);

            let running_mean = self.running_mean.value_sync();
            let running_var  = self.running_var.value_sync();

            self.running_mean.update(
                running_mean.mul_scalar(1.0 - self.momentum) + batch_mean.mul_scalar(self.momentum),
            );
            self.running_var.update(
                running_var.mul_scalar(1.0 - self.momentum) + batch_var.mul_scalar(self.momentum),
            );
        }

        self.normalize(
            input,
            mean.reshape([1, channels, 1, 1]),
            var.reshape([1, channels, 1, 1]),
        )
    }

    fn normalize(&self, input: Tensor<B, 4>, mean: Tensor<B, 4>, var: Tensor<B, 4>) -> Tensor<B, 4> {
        let channels = input.dims()[1];
        let std   = var.add_scalar(self.epsilon).sqrt();
        let gamma = self.gamma.val().reshape([1, channels, 1, 1]);
        let beta  = self.beta.val().reshape([1, channels, 1, 1]);
        (input - mean) / std * gamma + beta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    fn values<const D: usize>(t: Tensor<TestBackend, D>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_training_output_is_normalised_per_channel() {
        let device = NdArrayDevice::default();
        let norm   = ChannelNormConfig::new(2).init::<TestBackend>(&device);
        let input  = Tensor::<TestBackend, 4>::random([4, 2, 3, 3], Distribution::Normal(5.0, 2.0), &device);

        let out  = norm.forward(input);
        let flat = out.swap_dims(0, 1).reshape([2, 36]);
        for m in values(flat.clone().mean_dim(1)) {
            assert!(m.abs() < 1e-4, "channel mean {m}");
        }
        let centered = flat.clone() - flat.mean_dim(1);
        for v in values((centered.clone() * centered).mean_dim(1)) {
            assert!((v - 1.0).abs() < 1e-3, "channel var {v}");
        }
    }

    #[test]
    fn test_running_stats_update_only_when_tracking() {
        let device = NdArrayDevice::default();
        let mut norm = ChannelNormConfig::new(1).init::<TestBackend>(&device);
        let input = Tensor::<TestBackend, 4>::ones([2, 1, 2, 2], &device).mul_scalar(3.0);

        norm.set_track_running_stats(false);
        assert!(!norm.tracks_running_stats());
        norm.forward(input.clone());
        assert_eq!(values(norm.running_mean.value_sync()), vec![0.0]);

        norm.set_track_running_stats(true);
        norm.forward(input.clone());
        let mean = values(norm.running_mean.value_sync())[0];
        assert!((mean - 0.3).abs() < 1e-6);

        norm.set_training(false);
        norm.forward(input);
        let again = values(norm.running_mean.value_sync())[0];
        assert!((again - mean).abs() < 1e-9);
    }

    #[test]
    fn test_eval_sees_stats_from_previous_training_pass() {
        let device = NdArrayDevice::default();
        let mut norm = ChannelNormConfig::new(1).init::<TestBackend>(&device);
        let input = Tensor::<TestBackend, 4>::ones([2, 1, 2, 2], &device).mul_scalar(3.0);

        norm.forward(input.clone());
        norm.set_training(false);

        // running mean 0.3, running var 0.9 after one tracked pass
        let expected = (3.0 - 0.3) / (0.9f32 + 1e-5).sqrt();
        for v in values(norm.forward(input)) {
            assert!((v - expected).abs() < 1e-4, "{v} != {expected}");
        }
    }

    #[test]
    fn test_eval_uses_running_stats() {
        let device = NdArrayDevice::default();
        let mut norm = ChannelNormConfig::new(1).init::<TestBackend>(&device);
        norm.set_training(false);

        // fresh running stats are mean 0 / var 1, so eval is ~identity
        let input = Tensor::<TestBackend, 4>::ones([1, 1, 2, 2], &device).mul_scalar(2.0);
        for v in values(norm.forward(input)) {
            assert!((v - 2.0).abs() < 1e-4);
        }
    }
}
