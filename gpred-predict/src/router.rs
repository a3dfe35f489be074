use std::collections::HashMap;

use gpred_core::models::RegionSet;
use gpred_io::PredictionTable;

use crate::errors::{PredictError, Result};

/// Which model a sequence is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Score at or above the threshold; predicted by model A.
    Peak,
    /// Score below the threshold; predicted by model B.
    NonPeak,
}

///
/// Assignment of every sequence to exactly one model, with the ordered
/// index lists each model consumes.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingAssignment {
    routes: Vec<Route>,
    peaks: Vec<usize>,
    non_peaks: Vec<usize>,
}

impl RoutingAssignment {
    ///
    /// Route each sequence by its score. NaN scores count as 0.
    ///
    pub fn from_scores(scores: &[f32], threshold: f32) -> Result<Self> {
        let mut routes = Vec::with_capacity(scores.len());
        let mut peaks = Vec::new();
        let mut non_peaks = Vec::new();

        for (i, score) in scores.iter().enumerate() {
            let score = if score.is_nan() { 0.0 } else { *score };
            if score >= threshold {
                routes.push(Route::Peak);
                peaks.push(i);
            } else {
                routes.push(Route::NonPeak);
                non_peaks.push(i);
            }
        }

        let assignment = RoutingAssignment {
            routes,
            peaks,
            non_peaks,
        };
        assignment.check_partition()?;

        Ok(assignment)
    }

    fn check_partition(&self) -> Result<()> {
        if self.peaks.len() + self.non_peaks.len() != self.routes.len() {
            return Err(PredictError::RoutingNotPartition {
                total: self.routes.len(),
                peaks: self.peaks.len(),
                non_peaks: self.non_peaks.len(),
            });
        }
        Ok(())
    }

    pub fn route(&self, index: usize) -> Route {
        self.routes[index]
    }

    /// Indices routed to model A, ascending.
    pub fn peaks(&self) -> &[usize] {
        &self.peaks
    }

    /// Indices routed to model B, ascending.
    pub fn non_peaks(&self) -> &[usize] {
        &self.non_peaks
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

///
/// Align binary classifier scores to BED intervals by exact
/// `(chrom, start, end)` match.
///
/// Every interval must match exactly one score row; the scores are returned
/// in BED order. Score rows that match no interval are ignored.
///
pub fn join_scores(regions: &RegionSet, table: &PredictionTable) -> Result<Vec<f32>> {
    let scores = table.scores()?;

    let mut by_key: HashMap<(String, i64, i64), Vec<usize>> = HashMap::new();
    for row in 0..table.len() {
        by_key.entry(table.span(row).key()).or_default().push(row);
    }

    let mut joined = Vec::with_capacity(regions.len());
    let mut missing = 0;
    let mut duplicated = 0;
    let mut example: Option<String> = None;

    for region in regions {
        match by_key.get(&region.key()).map(|rows| rows.as_slice()) {
            Some([row]) => joined.push(scores[*row]),
            Some(_) => {
                duplicated += 1;
                example.get_or_insert_with(|| region.to_string());
            }
            None => {
                missing += 1;
                example.get_or_insert_with(|| region.to_string());
            }
        }
    }

    if missing > 0 || duplicated > 0 {
        return Err(PredictError::RoutingRowMismatch {
            bed_rows: regions.len(),
            missing,
            duplicated,
            example: example.unwrap_or_default(),
        });
    }

    log::info!(
        "Matched {} binary predictions to {} intervals",
        table.len(),
        joined.len()
    );

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    use gpred_core::models::{GenomicSpan, Region};
    use gpred_io::{PREDICTIONS_FILE_NAME, PredictionShape, PredictionWriter};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn regions(coords: &[(u32, u32)]) -> RegionSet {
        RegionSet::from(
            coords
                .iter()
                .map(|(start, end)| Region {
                    chr: "chr1".to_string(),
                    start: *start,
                    end: *end,
                    rest: None,
                })
                .collect::<Vec<_>>(),
        )
    }

    fn score_table(rows: &[(i64, i64, f32)]) -> PredictionTable {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join(PREDICTIONS_FILE_NAME);
        let shape = PredictionShape {
            site_bins: 1,
            depth: 1,
            summed: false,
        };

        let mut writer = PredictionWriter::create(&path, shape).unwrap();
        for (i, (start, end, score)) in rows.iter().enumerate() {
            writer
                .write_row(i, &GenomicSpan::new("chr1", *start, *end), &[*score])
                .unwrap();
        }
        writer.finish().unwrap();

        PredictionTable::from_path(&path).unwrap()
    }

    #[rstest]
    #[case(&[0.9, 0.1, 0.5, 0.2], 0.5, vec![0, 2], vec![1, 3])]
    #[case(&[0.9, 0.7], 0.5, vec![0, 1], vec![])]
    #[case(&[0.1, 0.2, 0.3], 0.5, vec![], vec![0, 1, 2])]
    #[case(&[f32::NAN, 0.0], 0.0, vec![0, 1], vec![])]
    #[case(&[], 0.5, vec![], vec![])]
    fn test_partition(
        #[case] scores: &[f32],
        #[case] threshold: f32,
        #[case] peaks: Vec<usize>,
        #[case] non_peaks: Vec<usize>,
    ) {
        let assignment = RoutingAssignment::from_scores(scores, threshold).unwrap();

        assert_eq!(assignment.peaks(), peaks.as_slice());
        assert_eq!(assignment.non_peaks(), non_peaks.as_slice());
        assert_eq!(
            assignment.peaks().len() + assignment.non_peaks().len(),
            scores.len()
        );
        for i in assignment.peaks() {
            assert_eq!(assignment.route(*i), Route::Peak);
            assert!(!assignment.non_peaks().contains(i));
        }
    }

    #[rstest]
    fn test_join_follows_bed_order() {
        let bed = regions(&[(300, 400), (100, 200), (500, 600)]);
        let table = score_table(&[(100, 200, 0.25), (500, 600, 0.75), (300, 400, 0.5), (900, 950, 1.0)]);

        let scores = join_scores(&bed, &table).unwrap();
        assert_eq!(scores, vec![0.5, 0.25, 0.75]);
    }

    #[rstest]
    fn test_join_missing_interval() {
        let bed = regions(&[(100, 200), (300, 400)]);
        let table = score_table(&[(100, 200, 0.25), (300, 401, 0.5)]);

        let result = join_scores(&bed, &table);
        assert!(matches!(
            result,
            Err(PredictError::RoutingRowMismatch {
                bed_rows: 2,
                missing: 1,
                duplicated: 0,
                ..
            })
        ));
    }

    #[rstest]
    fn test_join_duplicate_scores() {
        // one interval lost and another doubled keeps the row count equal
        let bed = regions(&[(100, 200), (300, 400)]);
        let table = score_table(&[(100, 200, 0.25), (100, 200, 0.5)]);

        let result = join_scores(&bed, &table);
        assert!(matches!(
            result,
            Err(PredictError::RoutingRowMismatch {
                missing: 1,
                duplicated: 1,
                ..
            })
        ));
    }
}
