//! One-hot encoding of DNA and the input transforms used for ensembling.
use ndarray::{Array2, ArrayView2, Axis, s};

/// Value written to every channel of positions vacated by a shift.
pub const SHIFT_PAD: f32 = 0.25;

///
/// Encode a sequence as a `length x 4` matrix with channels A, C, G, T.
///
/// Lower case is accepted; `N` and any other symbol become all-zero rows.
///
pub fn one_hot(seq: &[u8]) -> Array2<f32> {
    let mut encoded = Array2::<f32>::zeros((seq.len(), 4));
    for (i, base) in seq.iter().enumerate() {
        let channel = match base.to_ascii_uppercase() {
            b'A' => 0,
            b'C' => 1,
            b'G' => 2,
            b'T' => 3,
            _ => continue,
        };
        encoded[[i, channel]] = 1.0;
    }
    encoded
}

///
/// Reverse complement of a one-hot sequence. With ACGT channel order the
/// complement is the reversed channel axis.
///
pub fn reverse_complement(seq: ArrayView2<f32>) -> Array2<f32> {
    seq.slice(s![..;-1, ..;-1]).to_owned()
}

///
/// Shift a one-hot sequence by `shift` positions, filling the vacated
/// positions with [`SHIFT_PAD`]. Positive shifts move the sequence right.
///
pub fn shift(seq: ArrayView2<f32>, shift: i64) -> Array2<f32> {
    let length = seq.len_of(Axis(0));
    let mut shifted = Array2::<f32>::from_elem(seq.raw_dim(), SHIFT_PAD);

    let offset = shift.unsigned_abs() as usize;
    if offset >= length {
        return shifted;
    }

    if shift >= 0 {
        shifted
            .slice_mut(s![offset.., ..])
            .assign(&seq.slice(s![..length - offset, ..]));
    } else {
        shifted
            .slice_mut(s![..length - offset, ..])
            .assign(&seq.slice(s![offset.., ..]));
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_one_hot() {
        let encoded = one_hot(b"ACgtN");
        assert_eq!(
            encoded,
            array![
                [1.0_f32, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0, 0.0],
            ]
        );
    }

    #[rstest]
    fn test_reverse_complement() {
        let rc = reverse_complement(one_hot(b"AACG").view());
        assert_eq!(rc, one_hot(b"CGTT"));
    }

    #[rstest]
    fn test_shift_right() {
        let shifted = shift(one_hot(b"ACGT").view(), 1);
        assert_eq!(shifted.row(0).to_vec(), vec![SHIFT_PAD; 4]);
        assert_eq!(shifted.slice(s![1.., ..]), one_hot(b"ACG"));
    }

    #[rstest]
    fn test_shift_left() {
        let shifted = shift(one_hot(b"ACGT").view(), -2);
        assert_eq!(shifted.slice(s![..2, ..]), one_hot(b"GT"));
        assert_eq!(shifted.row(3).to_vec(), vec![SHIFT_PAD; 4]);
    }

    #[rstest]
    fn test_zero_shift_is_identity() {
        let seq = one_hot(b"ACGTTGCA");
        assert_eq!(shift(seq.view(), 0), seq);
    }

    #[rstest]
    fn test_shift_past_end() {
        let shifted = shift(one_hot(b"ACG").view(), 5);
        assert!(shifted.iter().all(|v| *v == SHIFT_PAD));
    }
}
