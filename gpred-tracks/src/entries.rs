use gpred_core::models::GenomicSpan;

use crate::errors::{Result, TrackError};

/// One fixed-width bin of a track. Coordinates are not clipped to the
/// chromosome, so `start` can be negative near the chromosome start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackEntry {
    pub start: i64,
    pub end: i64,
    pub value: f32,
}

///
/// Lay a 1-D signal out over a span.
///
/// `crop` bases are removed from each side of the span and the remainder is
/// split into `signal.len()` contiguous bins of equal width. The remainder
/// must divide evenly, otherwise the bins would drift against the genome.
///
/// # Arguments
/// - signal: one value per output bin
/// - span: genomic span the model input covered
/// - crop: bases trimmed from each side of the span
///
pub fn track_entries(signal: &[f32], span: &GenomicSpan, crop: i64) -> Result<Vec<TrackEntry>> {
    let cropped = span.width() - 2 * crop;
    if cropped <= 0 || signal.is_empty() {
        return Err(TrackError::CroppedAway {
            span: span.to_string(),
            crop,
        });
    }

    let bins = signal.len() as i64;
    if cropped % bins != 0 {
        return Err(TrackError::UnevenBins {
            span: span.to_string(),
            crop,
            cropped,
            bins: signal.len(),
        });
    }
    let bin_width = cropped / bins;

    let mut start = span.start + crop;
    let entries = signal
        .iter()
        .map(|value| {
            let entry = TrackEntry {
                start,
                end: start + bin_width,
                value: *value,
            };
            start = entry.end;
            entry
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_entries_are_contiguous_fixed_width() {
        let span = GenomicSpan::new("chr1", 5_000, 6_000);
        let signal: Vec<f32> = (0..50).map(|i| i as f32).collect();

        let entries = track_entries(&signal, &span, 100).unwrap();

        assert_eq!(entries.len(), 50);
        assert_eq!(entries[0].start, 5_100);
        assert_eq!(entries[49].end, 5_900);
        for pair in entries.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.end - entry.start, 16);
            assert_eq!(entry.value, i as f32);
        }
    }

    #[rstest]
    #[case(1000, 0, 3)]
    #[case(1000, 100, 7)]
    fn test_uneven_bins_fail(#[case] width: i64, #[case] crop: i64, #[case] bins: usize) {
        let span = GenomicSpan::new("chr1", 0, width);
        let result = track_entries(&vec![0.0; bins], &span, crop);
        assert!(matches!(result, Err(TrackError::UnevenBins { .. })));
    }

    #[rstest]
    fn test_crop_larger_than_span() {
        let span = GenomicSpan::new("chr1", 0, 100);
        let result = track_entries(&[1.0], &span, 50);
        assert!(matches!(result, Err(TrackError::CroppedAway { .. })));
    }

    #[rstest]
    fn test_negative_start_is_kept() {
        let span = GenomicSpan::new("chr1", -40, 60);
        let entries = track_entries(&[1.0, 2.0], &span, 0).unwrap();
        assert_eq!(entries[0].start, -40);
        assert_eq!(entries[1].start, 10);
    }
}
