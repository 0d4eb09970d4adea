// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// CPU runs on burn's ndarray backend. The wgpu backend is only
// compiled in with `--features wgpu`; asking for the GPU in a
// build without it falls back to the CPU with a warning.

pub type CpuBackend  = burn::backend::NdArray;
pub type CpuTraining = burn::backend::Autodiff<CpuBackend>;

#[cfg(feature = "wgpu")]
pub type GpuBackend  = burn::backend::Wgpu;
#[cfg(feature = "wgpu")]
pub type GpuTraining = burn::backend::Autodiff<GpuBackend>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeDevice {
    Cpu,
    #[cfg(feature = "wgpu")]
    Gpu,
}

pub fn select_device(use_gpu: bool) -> ComputeDevice {
    #[cfg(feature = "wgpu")]
    if use_gpu {
        tracing::info!("Using WGPU device: {:?}", burn::backend::wgpu::WgpuDevice::default());
        return ComputeDevice::Gpu;
    }

    #[cfg(not(feature = "wgpu"))]
    if use_gpu {
        tracing::warn!("GPU requested but this build has no `wgpu` feature, using the CPU");
    }

    tracing::info!("Using CPU device (ndarray)");
    ComputeDevice::Cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_gpu_selects_cpu() {
        assert_eq!(select_device(false), ComputeDevice::Cpu);
    }

    #[cfg(not(feature = "wgpu"))]
    #[test]
    fn test_gpu_request_falls_back_without_feature() {
        assert_eq!(select_device(true), ComputeDevice::Cpu);
    }
}
