//! Model wrappers: target slicing and rc/shift ensembling.
use ndarray::{Array2, Axis, s};

use crate::dna::{reverse_complement, shift};
use crate::errors::{PredictError, Result};
use crate::model::SequenceModel;
use crate::window::ModelOutput;

///
/// Keep only a subset of output channels, in the given order.
///
pub struct SlicedModel<M> {
    inner: M,
    targets: Vec<usize>,
}

impl<M: SequenceModel> SlicedModel<M> {
    pub fn new(inner: M, targets: Vec<usize>) -> Result<Self> {
        let depth = inner.output().depth;
        if let Some(index) = targets.iter().find(|t| **t >= depth) {
            return Err(PredictError::TargetOutOfRange {
                index: *index,
                depth,
            });
        }
        Ok(SlicedModel { inner, targets })
    }
}

impl<M: SequenceModel> SequenceModel for SlicedModel<M> {
    fn seq_length(&self) -> usize {
        self.inner.seq_length()
    }

    fn batch_size(&self) -> usize {
        self.inner.batch_size()
    }

    fn output(&self) -> ModelOutput {
        ModelOutput {
            depth: self.targets.len(),
            ..self.inner.output()
        }
    }

    fn predict(&mut self, batch: &[Array2<f32>]) -> Result<Vec<Array2<f32>>> {
        let outputs = self.inner.predict(batch)?;
        Ok(outputs
            .iter()
            .map(|preds| preds.select(Axis(1), &self.targets))
            .collect())
    }
}

///
/// Average predictions over shifted and, optionally, reverse complemented
/// copies of each input. Reverse complement outputs are flipped back along
/// the length axis before averaging.
///
pub struct EnsembleModel<M> {
    inner: M,
    rc: bool,
    shifts: Vec<i64>,
}

impl<M: SequenceModel> EnsembleModel<M> {
    pub fn new(inner: M, rc: bool, shifts: Vec<i64>) -> Self {
        let shifts = match shifts.is_empty() {
            true => vec![0],
            false => shifts,
        };
        EnsembleModel { inner, rc, shifts }
    }

    fn variants(&self) -> Vec<(i64, bool)> {
        let orientations: &[bool] = match self.rc {
            true => &[false, true],
            false => &[false],
        };
        self.shifts
            .iter()
            .flat_map(|s| orientations.iter().map(move |rc| (*s, *rc)))
            .collect()
    }
}

impl<M: SequenceModel> SequenceModel for EnsembleModel<M> {
    fn seq_length(&self) -> usize {
        self.inner.seq_length()
    }

    fn batch_size(&self) -> usize {
        self.inner.batch_size()
    }

    fn output(&self) -> ModelOutput {
        self.inner.output()
    }

    fn predict(&mut self, batch: &[Array2<f32>]) -> Result<Vec<Array2<f32>>> {
        let variants = self.variants();
        if variants == [(0, false)] {
            return self.inner.predict(batch);
        }

        let mut sums: Option<Vec<Array2<f32>>> = None;
        for (offset, rc) in &variants {
            let inputs: Vec<Array2<f32>> = batch
                .iter()
                .map(|seq| {
                    let shifted = match offset {
                        0 => seq.clone(),
                        _ => shift(seq.view(), *offset),
                    };
                    match rc {
                        true => reverse_complement(shifted.view()),
                        false => shifted,
                    }
                })
                .collect();

            let mut outputs = self.inner.predict(&inputs)?;
            if *rc {
                outputs = outputs
                    .iter()
                    .map(|preds| preds.slice(s![..;-1, ..]).to_owned())
                    .collect();
            }

            sums = Some(match sums {
                None => outputs,
                Some(mut sums) => {
                    for (sum, preds) in sums.iter_mut().zip(outputs.iter()) {
                        *sum += preds;
                    }
                    sums
                }
            });
        }

        let n = variants.len() as f32;
        Ok(sums
            .unwrap_or_default()
            .into_iter()
            .map(|sum| sum / n)
            .collect())
    }
}
