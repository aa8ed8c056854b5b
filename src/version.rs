// SPDX-License-Identifier: MPL-2.0

//! Version algebra: parsing and comparing dotted numeric/alphanumeric
//! version strings.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while parsing a [`Version`] from its dotted string form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    /// The version string was empty.
    #[error("version string is empty")]
    Empty,
    /// A `.`-separated segment was itself empty (e.g. `"1..2"`).
    #[error("empty segment in version '{full}'")]
    EmptySegment {
        /// The full version string that failed to parse.
        full: String,
    },
    /// A segment looked numeric but overflowed the supported integer width.
    #[error("segment '{segment}' in version '{full}' is too large")]
    SegmentOverflow {
        /// The offending segment.
        segment: String,
        /// The full version string that failed to parse.
        full: String,
    },
}

/// One dot-separated component of a [`Version`].
///
/// A segment compares numerically when it parses as an unsigned integer,
/// lexically otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Num(u64),
    Alpha(String),
}

impl Segment {
    fn cmp_seg(&self, other: &Segment) -> Ordering {
        match (self, other) {
            (Segment::Num(a), Segment::Num(b)) => a.cmp(b),
            (Segment::Num(a), Segment::Alpha(b)) => a.to_string().as_str().cmp(b.as_str()),
            (Segment::Alpha(a), Segment::Num(b)) => a.as_str().cmp(b.to_string().as_str()),
            (Segment::Alpha(a), Segment::Alpha(b)) => a.cmp(b),
        }
    }
}

/// A totally-ordered version value parsed from a dotted numeric/alphanumeric
/// string.
///
/// Segments separated by `.` compare numerically when both sides parse as
/// non-negative integers, lexically otherwise. A version with fewer segments
/// compares as if padded on the right with the lowest possible segment, so
/// `"1"` < `"1.1"` and `"1.0"` == `"1"`.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<Segment>,
}

impl Version {
    /// The original string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }
        let mut segments = Vec::new();
        for part in s.split('.') {
            if part.is_empty() {
                return Err(VersionParseError::EmptySegment { full: s.to_string() });
            }
            if part.bytes().all(|b| b.is_ascii_digit()) {
                let n = part.parse::<u64>().map_err(|_| VersionParseError::SegmentOverflow {
                    segment: part.to_string(),
                    full: s.to_string(),
                })?;
                segments.push(Segment::Num(n));
            } else {
                segments.push(Segment::Alpha(part.to_string()));
            }
        }
        Ok(Version {
            raw: s.to_string(),
            segments,
        })
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let lowest = Segment::Num(0);
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).unwrap_or(&lowest);
            let b = other.segments.get(i).unwrap_or(&lowest);
            match a.cmp_seg(b) {
                Ordering::Equal => continue,
                order => return order,
            }
        }
        Ordering::Equal
    }
}

// Hash is derived from the normalized segment sequence, not the raw string,
// so that `1.0` and `1` (equal per `Ord`) hash identically.
impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let trailing_zero_trimmed: Vec<&Segment> = {
            let mut end = self.segments.len();
            while end > 0 && self.segments[end - 1] == Segment::Num(0) {
                end -= 1;
            }
            self.segments[..end].iter().collect()
        };
        trailing_zero_trimmed.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numeric_versions() {
        let v: Version = "1.2.3".parse().unwrap();
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn numeric_segments_compare_numerically_not_lexically() {
        let a: Version = "1.9".parse().unwrap();
        let b: Version = "1.10".parse().unwrap();
        assert!(a < b, "1.9 should be less than 1.10 under numeric comparison");
    }

    #[test]
    fn shorter_version_pads_with_lowest_segment() {
        let a: Version = "1".parse().unwrap();
        let b: Version = "1.0".parse().unwrap();
        let c: Version = "1.1".parse().unwrap();
        assert_eq!(a, b);
        assert!(a < c);
    }

    #[test]
    fn alphanumeric_segments_compare_lexically() {
        let a: Version = "1.alpha".parse().unwrap();
        let b: Version = "1.beta".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(matches!(
            "1..2".parse::<Version>(),
            Err(VersionParseError::EmptySegment { .. })
        ));
    }

    #[test]
    fn rejects_empty_string() {
        assert!(matches!("".parse::<Version>(), Err(VersionParseError::Empty)));
    }
}
