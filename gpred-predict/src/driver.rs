use indicatif::ProgressBar;
use ndarray::Array2;

use crate::errors::{FieldMismatch, PredictError, Result};
use crate::model::SequenceModel;
use crate::router::{Route, RoutingAssignment};
use crate::stream::PredictionStream;
use crate::window::ModelOutput;

const MODEL_A: &str = "model A";
const MODEL_B: &str = "model B";

///
/// The parts of a model two jointly used models must agree on.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub seq_length: usize,
    pub output: ModelOutput,
}

impl ModelSpec {
    pub fn of<M: SequenceModel + ?Sized>(model: &M) -> Self {
        ModelSpec {
            seq_length: model.seq_length(),
            output: model.output(),
        }
    }
}

///
/// Refuse to mix two models whose outputs do not line up. Every mismatched
/// field is reported in a single error.
///
pub fn check_compatible(a: &ModelSpec, b: &ModelSpec) -> Result<()> {
    let fields = [
        ("window_stride", a.output.window_stride, b.output.window_stride),
        ("edge_crop", a.output.edge_crop, b.output.edge_crop),
        ("seq_length", a.seq_length, b.seq_length),
        ("output_length", a.output.output_length, b.output.output_length),
        ("depth", a.output.depth, b.output.depth),
    ];

    let mismatches: Vec<FieldMismatch> = fields
        .into_iter()
        .filter(|(_, model_a, model_b)| model_a != model_b)
        .map(|(field, model_a, model_b)| FieldMismatch {
            field,
            model_a,
            model_b,
        })
        .collect();

    match mismatches.is_empty() {
        true => Ok(()),
        false => Err(PredictError::IncompatibleModels(mismatches)),
    }
}

///
/// Predict every sequence with the model it is routed to and hand the
/// predictions to `sink` in global index order.
///
/// Each model only ever sees the sequences routed to it, in ascending index
/// order; `encode` is called once per sequence.
///
/// # Arguments
/// - model_a: model for sequences routed as peaks
/// - model_b: model for the remaining sequences
/// - assignment: the routing of every sequence
/// - encode: produces the one-hot input for a sequence index
/// - sink: receives `(index, prediction)` for indices `0..n` in order
///
pub fn predict_routed<A, B, E, S>(
    model_a: &mut A,
    model_b: &mut B,
    assignment: &RoutingAssignment,
    encode: E,
    mut sink: S,
) -> Result<()>
where
    A: SequenceModel + ?Sized,
    B: SequenceModel + ?Sized,
    E: Fn(usize) -> Result<Array2<f32>>,
    S: FnMut(usize, Array2<f32>) -> Result<()>,
{
    check_compatible(&ModelSpec::of(model_a), &ModelSpec::of(model_b))?;

    let encode = &encode;
    let mut peaks =
        PredictionStream::new(model_a, assignment.peaks().iter().map(move |i| encode(*i)));
    let mut non_peaks = PredictionStream::new(
        model_b,
        assignment.non_peaks().iter().map(move |i| encode(*i)),
    );

    let bar = ProgressBar::new(assignment.len() as u64);
    for index in 0..assignment.len() {
        let preds = match assignment.route(index) {
            Route::Peak => peaks.next().ok_or(PredictError::StreamExhausted(MODEL_A))?,
            Route::NonPeak => non_peaks
                .next()
                .ok_or(PredictError::StreamExhausted(MODEL_B))?,
        }?;
        sink(index, preds)?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    if peaks.next().is_some() {
        return Err(PredictError::StreamNotExhausted(MODEL_A));
    }
    if non_peaks.next().is_some() {
        return Err(PredictError::StreamNotExhausted(MODEL_B));
    }

    log::info!(
        "Predicted {} sequences with {} and {} with {}",
        peaks.cursor(),
        MODEL_A,
        non_peaks.cursor(),
        MODEL_B
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    /// Tags each output with a model id and the input's marker value.
    struct Tagger {
        id: f32,
        seen: Vec<f32>,
        output: ModelOutput,
        seq_length: usize,
    }

    impl Tagger {
        fn new(id: f32) -> Self {
            Tagger {
                id,
                seen: vec![],
                output: ModelOutput {
                    window_stride: 2,
                    output_length: 1,
                    depth: 2,
                    edge_crop: 0,
                },
                seq_length: 2,
            }
        }
    }

    impl SequenceModel for Tagger {
        fn seq_length(&self) -> usize {
            self.seq_length
        }

        fn batch_size(&self) -> usize {
            2
        }

        fn output(&self) -> ModelOutput {
            self.output
        }

        fn predict(&mut self, batch: &[Array2<f32>]) -> Result<Vec<Array2<f32>>> {
            Ok(batch
                .iter()
                .map(|seq| {
                    self.seen.push(seq[[0, 0]]);
                    ndarray::array![[self.id, seq[[0, 0]]]]
                })
                .collect())
        }
    }

    fn marker(index: usize) -> Result<Array2<f32>> {
        Ok(Array2::from_elem((2, 4), index as f32))
    }

    #[rstest]
    #[case(vec![0.9, 0.1, 0.8, 0.2, 0.3, 0.7, 0.6])]
    #[case(vec![0.9, 0.9, 0.9])]
    #[case(vec![0.0, 0.0])]
    fn test_reassembly_order(#[case] scores: Vec<f32>) {
        let assignment = RoutingAssignment::from_scores(&scores, 0.5).unwrap();
        let mut model_a = Tagger::new(1.0);
        let mut model_b = Tagger::new(2.0);

        let mut rows: Vec<(usize, f32, f32)> = vec![];
        predict_routed(&mut model_a, &mut model_b, &assignment, marker, |i, preds| {
            rows.push((i, preds[[0, 0]], preds[[0, 1]]));
            Ok(())
        })
        .unwrap();

        assert_eq!(rows.len(), scores.len());
        for (i, (index, id, seen)) in rows.iter().enumerate() {
            let expected_id = if scores[i] >= 0.5 { 1.0 } else { 2.0 };
            assert_eq!(*index, i);
            assert_eq!(*id, expected_id);
            assert_eq!(*seen, i as f32);
        }

        // each model saw only its own sequences, in generation order
        let peaks: Vec<f32> = assignment.peaks().iter().map(|i| *i as f32).collect();
        let non_peaks: Vec<f32> = assignment.non_peaks().iter().map(|i| *i as f32).collect();
        assert_eq!(model_a.seen, peaks);
        assert_eq!(model_b.seen, non_peaks);
    }

    #[rstest]
    fn test_incompatible_models_list_every_field() {
        let model_a = Tagger::new(1.0);
        let mut model_b = Tagger::new(2.0);
        model_b.output.window_stride = 4;
        model_b.output.edge_crop = 3;
        model_b.seq_length = 4;

        let result = check_compatible(&ModelSpec::of(&model_a), &ModelSpec::of(&model_b));
        let Err(PredictError::IncompatibleModels(mismatches)) = result else {
            panic!("expected incompatible models");
        };

        let fields: Vec<&str> = mismatches.iter().map(|m| m.field).collect();
        assert_eq!(fields, vec!["window_stride", "edge_crop", "seq_length"]);
    }

    #[rstest]
    fn test_incompatible_models_refuse_to_run() {
        let assignment = RoutingAssignment::from_scores(&[0.9, 0.1], 0.5).unwrap();
        let mut model_a = Tagger::new(1.0);
        let mut model_b = Tagger::new(2.0);
        model_b.output.edge_crop = 1;

        let mut called = false;
        let result = predict_routed(&mut model_a, &mut model_b, &assignment, marker, |_, _| {
            called = true;
            Ok(())
        });

        assert!(matches!(result, Err(PredictError::IncompatibleModels(_))));
        assert!(!called);
        assert!(model_a.seen.is_empty());
    }

    #[rstest]
    fn test_sink_error_aborts() {
        let assignment = RoutingAssignment::from_scores(&[0.9, 0.1, 0.9], 0.5).unwrap();
        let mut model_a = Tagger::new(1.0);
        let mut model_b = Tagger::new(2.0);

        let result = predict_routed(&mut model_a, &mut model_b, &assignment, marker, |i, _| {
            match i {
                1 => Err(PredictError::MissingGenome),
                _ => Ok(()),
            }
        });
        assert!(matches!(result, Err(PredictError::MissingGenome)));
    }
}
