use ndarray::{ArrayView2, s};

use crate::errors::WindowError;

///
/// What a model emits for one input sequence.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOutput {
    /// Input bases per output bin.
    pub window_stride: usize,
    /// Output bins after cropping.
    pub output_length: usize,
    /// Output channels.
    pub depth: usize,
    /// Bins cropped from each side of the raw output.
    pub edge_crop: usize,
}

impl ModelOutput {
    /// Bases covered by the cropped output.
    pub fn native_site_length(&self) -> usize {
        self.window_stride * self.output_length
    }

    /// Bases of input sequence cropped from each side.
    pub fn seq_crop(&self) -> usize {
        self.edge_crop * self.window_stride
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowWarning {
    OddOutputLength(usize),
    OddSiteBins(usize),
}

///
/// The bins of a model output that cover a site centered in the sequence.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteWindow {
    pub site_length: usize,
    pub site_bins: usize,
    pub start_bin: usize,
    pub end_bin: usize,
    pub warnings: Vec<WindowWarning>,
}

impl SiteWindow {
    ///
    /// Center a site of `site_length` bases in the model output. Without a
    /// site length the whole output is used.
    ///
    pub fn new(output: &ModelOutput, site_length: Option<usize>) -> Result<Self, WindowError> {
        let site_length = site_length.unwrap_or_else(|| output.native_site_length());
        let mut warnings = Vec::new();

        if output.output_length % 2 != 0 {
            warnings.push(WindowWarning::OddOutputLength(output.output_length));
        }
        let preds_mid = output.output_length / 2;

        if output.window_stride == 0 || site_length % output.window_stride != 0 {
            return Err(WindowError::SiteNotDivisible {
                site_length,
                stride: output.window_stride,
            });
        }
        let site_bins = site_length / output.window_stride;

        if site_bins % 2 != 0 {
            warnings.push(WindowWarning::OddSiteBins(site_bins));
        }

        let half = site_bins / 2;
        if half > preds_mid || preds_mid - half + site_bins > output.output_length {
            return Err(WindowError::SiteTooLong {
                site_bins,
                output_length: output.output_length,
            });
        }
        let start_bin = preds_mid - half;

        Ok(SiteWindow {
            site_length,
            site_bins,
            start_bin,
            end_bin: start_bin + site_bins,
            warnings,
        })
    }

    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            match warning {
                WindowWarning::OddOutputLength(n) => {
                    log::warn!("Prediction length {} is odd and therefore asymmetric", n)
                }
                WindowWarning::OddSiteBins(n) => {
                    log::warn!("Site length of {} bins is odd and therefore asymmetric", n)
                }
            }
        }
    }

    /// Rows of `preds` (length x depth) that fall inside the site.
    pub fn slice<'a>(&self, preds: ArrayView2<'a, f32>) -> ArrayView2<'a, f32> {
        preds.slice_move(s![self.start_bin..self.end_bin, ..])
    }
}
