//! ONNX inference backend built on `tract`.
use std::path::Path;

use ndarray::Array2;
use tract_onnx::prelude::*;

use crate::errors::{PredictError, Result};
use crate::model::SequenceModel;
use crate::params::ModelParams;
use crate::window::ModelOutput;

type Plan = TypedRunnableModel<TypedModel>;

fn model_error(e: impl std::fmt::Display) -> PredictError {
    PredictError::Model(e.to_string())
}

///
/// A model exported to ONNX, taking `batch x seq_length x 4` one-hot input.
///
/// The graph is compiled for a fixed batch size; short batches are padded
/// with empty sequences whose outputs are dropped.
///
pub struct OnnxModel {
    plan: Plan,
    output_index: usize,
    seq_length: usize,
    batch_size: usize,
    output: ModelOutput,
}

impl OnnxModel {
    ///
    /// Load and optimize a model.
    ///
    /// # Arguments
    /// - path: the `.onnx` file
    /// - params: the parameters the model was trained with
    /// - output_index: which graph output to read (the head, or an embedding)
    ///
    pub fn load<P: AsRef<Path>>(path: P, params: &ModelParams, output_index: usize) -> Result<Self> {
        let path = path.as_ref();
        let seq_length = params.model.seq_length;
        let batch_size = params.train.batch_size;

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact([batch_size, seq_length, 4]).into()))
            .and_then(|m| m.into_optimized())
            .map_err(model_error)?;

        let fact = model.output_fact(output_index).map_err(model_error)?;
        let shape = fact.shape.as_concrete().map(|s| s.to_vec()).ok_or_else(|| {
            PredictError::Model(format!(
                "output {} of {} has no concrete shape",
                output_index,
                path.display()
            ))
        })?;
        let (output_length, depth) = match shape.as_slice() {
            [_, length, depth] => (*length, *depth),
            _ => {
                return Err(PredictError::Model(format!(
                    "output {} of {} has shape {:?}, expected batch x length x depth",
                    output_index,
                    path.display(),
                    shape
                )));
            }
        };

        let mut output = params.output(depth)?;
        if output.output_length != output_length {
            log::warn!(
                "{} emits {} bins but its parameters describe {}; using the model's length",
                path.display(),
                output_length,
                output.output_length
            );
            output.output_length = output_length;
        }

        let plan = model.into_runnable().map_err(model_error)?;
        log::info!(
            "Loaded {} (output {}: {} x {})",
            path.display(),
            output_index,
            output_length,
            depth
        );

        Ok(OnnxModel {
            plan,
            output_index,
            seq_length,
            batch_size,
            output,
        })
    }
}

impl SequenceModel for OnnxModel {
    fn seq_length(&self) -> usize {
        self.seq_length
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn output(&self) -> ModelOutput {
        self.output
    }

    fn predict(&mut self, batch: &[Array2<f32>]) -> Result<Vec<Array2<f32>>> {
        if batch.len() > self.batch_size {
            return Err(PredictError::BatchSize {
                expected: self.batch_size,
                found: batch.len(),
            });
        }

        let seq_values = self.seq_length * 4;
        let mut input = vec![0.0f32; self.batch_size * seq_values];
        for (seq, chunk) in batch.iter().zip(input.chunks_mut(seq_values)) {
            if seq.len() != seq_values {
                return Err(PredictError::Model(format!(
                    "input of {} values, expected {}",
                    seq.len(),
                    seq_values
                )));
            }
            for (dst, src) in chunk.iter_mut().zip(seq.iter()) {
                *dst = *src;
            }
        }

        let tensor = Tensor::from_shape(&[self.batch_size, self.seq_length, 4], &input)
            .map_err(model_error)?;
        let outputs = self.plan.run(tvec!(tensor.into())).map_err(model_error)?;
        let values = outputs
            .get(self.output_index)
            .ok_or_else(|| PredictError::Model(format!("no output {}", self.output_index)))?
            .to_array_view::<f32>()
            .map_err(model_error)?
            .iter()
            .copied()
            .collect::<Vec<f32>>();

        let per_seq = self.output.output_length * self.output.depth;
        values
            .chunks(per_seq)
            .take(batch.len())
            .map(|chunk| {
                Array2::from_shape_vec(
                    (self.output.output_length, self.output.depth),
                    chunk.to_vec(),
                )
                .map_err(model_error)
            })
            .collect()
    }
}
