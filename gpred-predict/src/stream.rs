use std::collections::VecDeque;

use ndarray::Array2;

use crate::errors::Result;
use crate::model::{SequenceModel, check_outputs};

/// Batches predicted ahead of the consumer.
pub const CHUNK_BATCHES: usize = 128;

///
/// Lazily predicts a sequence of encoded inputs, a chunk at a time.
///
/// Inputs are pulled only when the buffer runs dry, and predictions come
/// out in the order their inputs were produced.
///
pub struct PredictionStream<'m, M: SequenceModel + ?Sized, I> {
    model: &'m mut M,
    seqs: I,
    chunk_size: usize,
    buffer: VecDeque<Array2<f32>>,
    cursor: usize,
}

impl<'m, M, I> PredictionStream<'m, M, I>
where
    M: SequenceModel + ?Sized,
    I: Iterator<Item = Result<Array2<f32>>>,
{
    pub fn new(model: &'m mut M, seqs: I) -> Self {
        let chunk_size = CHUNK_BATCHES * model.batch_size().max(1);
        PredictionStream {
            model,
            seqs,
            chunk_size,
            buffer: VecDeque::new(),
            cursor: 0,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Number of predictions handed out so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = Vec::with_capacity(self.chunk_size);
        for seq in self.seqs.by_ref().take(self.chunk_size) {
            chunk.push(seq?);
        }
        if chunk.is_empty() {
            return Ok(());
        }

        let output = self.model.output();
        let batch_size = self.model.batch_size().max(1);
        for batch in chunk.chunks(batch_size) {
            let preds = self.model.predict(batch)?;
            check_outputs(&output, batch.len(), &preds)?;
            self.buffer.extend(preds);
        }

        log::debug!(
            "Predicted {} sequences ({} consumed so far)",
            chunk.len(),
            self.cursor
        );

        Ok(())
    }
}

impl<M, I> Iterator for PredictionStream<'_, M, I>
where
    M: SequenceModel + ?Sized,
    I: Iterator<Item = Result<Array2<f32>>>,
{
    type Item = Result<Array2<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() {
            if let Err(e) = self.fill() {
                return Some(Err(e));
            }
        }

        let preds = self.buffer.pop_front()?;
        self.cursor += 1;
        Some(Ok(preds))
    }
}
