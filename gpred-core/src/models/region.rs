use std::fmt::{self, Display};

///
/// Region struct, representation of one interval in a BED file
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,

    pub rest: Option<String>,
}

impl Region {
    ///
    /// Get length of the region
    ///
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    ///
    /// Get file string of Region
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}{}",
            self.chr,
            self.start,
            self.end,
            self.rest
                .as_deref()
                .map_or(String::new(), |s| format!("\t{}", s)),
        )
    }

    /// The fourth BED column, if present.
    pub fn name(&self) -> Option<&str> {
        self.rest
            .as_deref()
            .and_then(|rest| rest.split('\t').next())
            .filter(|name| !name.is_empty())
    }

    /// Midpoint of the region, rounded down: `(start + end) / 2`.
    pub fn mid_point(&self) -> u32 {
        self.start + self.width() / 2
    }

    /// Span of `length` bases centered on the midpoint of this region.
    ///
    /// The left half gets `length / 2` bases, so for odd lengths the extra
    /// base lands on the right. The result can start below zero when the
    /// region sits close to the chromosome start.
    pub fn centered(&self, length: u64) -> GenomicSpan {
        let start = self.mid_point() as i64 - (length / 2) as i64;
        GenomicSpan {
            chr: self.chr.clone(),
            start,
            end: start + length as i64,
        }
    }

    /// Coordinate key used to join tables on exact `(chrom, start, end)`.
    pub fn key(&self) -> (String, i64, i64) {
        (self.chr.clone(), self.start as i64, self.end as i64)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// A half-open span `[start, end)` on a chromosome whose bounds are not
/// clipped to the chromosome, so `start` may be negative.
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct GenomicSpan {
    pub chr: String,
    pub start: i64,
    pub end: i64,
}

impl GenomicSpan {
    pub fn new(chr: impl Into<String>, start: i64, end: i64) -> Self {
        GenomicSpan {
            chr: chr.into(),
            start,
            end,
        }
    }

    pub fn width(&self) -> i64 {
        self.end - self.start
    }

    pub fn key(&self) -> (String, i64, i64) {
        (self.chr.clone(), self.start, self.end)
    }
}

impl Display for GenomicSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn region(start: u32, end: u32) -> Region {
        Region {
            chr: "chr1".to_string(),
            start,
            end,
            rest: Some("peak_1\t0.5".to_string()),
        }
    }

    #[rstest]
    fn test_name_is_first_extra_column() {
        assert_eq!(region(0, 10).name(), Some("peak_1"));

        let unnamed = Region {
            rest: None,
            ..region(0, 10)
        };
        assert_eq!(unnamed.name(), None);
    }

    #[rstest]
    #[case(1000, 2000, 100, 1450, 1550)]
    #[case(1000, 2001, 100, 1450, 1550)]
    #[case(1000, 2000, 101, 1450, 1551)]
    #[case(10, 20, 100, -35, 65)]
    fn test_centered(
        #[case] start: u32,
        #[case] end: u32,
        #[case] length: u64,
        #[case] expected_start: i64,
        #[case] expected_end: i64,
    ) {
        let span = region(start, end).centered(length);
        assert_eq!(span, GenomicSpan::new("chr1", expected_start, expected_end));
        assert_eq!(span.width(), length as i64);
    }

    #[rstest]
    fn test_display() {
        assert_eq!(region(5, 9).to_string(), "chr1\t5\t9\tpeak_1\t0.5");
        assert_eq!(GenomicSpan::new("chrX", -3, 7).to_string(), "chrX:-3-7");
    }
}
