use ndarray::Array2;

use crate::errors::{PredictError, Result};
use crate::window::ModelOutput;

///
/// A trained sequence-to-signal model.
///
/// Inputs are one-hot sequences of `seq_length x 4`; each output is
/// `output_length x depth` as described by [`SequenceModel::output`].
///
pub trait SequenceModel {
    fn seq_length(&self) -> usize;

    /// Number of sequences the model prefers per call.
    fn batch_size(&self) -> usize;

    fn output(&self) -> ModelOutput;

    ///
    /// Predict one batch, returning one output per input sequence in order.
    /// Batches may be shorter than [`SequenceModel::batch_size`].
    ///
    fn predict(&mut self, batch: &[Array2<f32>]) -> Result<Vec<Array2<f32>>>;
}

impl<M: SequenceModel + ?Sized> SequenceModel for Box<M> {
    fn seq_length(&self) -> usize {
        (**self).seq_length()
    }

    fn batch_size(&self) -> usize {
        (**self).batch_size()
    }

    fn output(&self) -> ModelOutput {
        (**self).output()
    }

    fn predict(&mut self, batch: &[Array2<f32>]) -> Result<Vec<Array2<f32>>> {
        (**self).predict(batch)
    }
}

///
/// Check that a model answered a batch with one correctly shaped output per
/// sequence.
///
pub fn check_outputs(
    output: &ModelOutput,
    batch_len: usize,
    outputs: &[Array2<f32>],
) -> Result<()> {
    if outputs.len() != batch_len {
        return Err(PredictError::BatchSize {
            expected: batch_len,
            found: outputs.len(),
        });
    }

    let expected = (output.output_length, output.depth);
    for preds in outputs {
        let found = preds.dim();
        if found != expected {
            return Err(PredictError::OutputShape { expected, found });
        }
    }

    Ok(())
}
