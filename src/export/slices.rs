use serde::Serialize;
use std::fmt;

/// Historical period a recipe's book belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slice {
    /// 1740–1819
    Early,
    /// 1820–1869
    Victorian,
    /// 1870–1929
    Late,
    /// Any other year, or no year at all
    OutOfRange,
}

impl Slice {
    pub const ALL: [Slice; 4] = [Slice::Early, Slice::Victorian, Slice::Late, Slice::OutOfRange];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slice::Early => "early",
            Slice::Victorian => "victorian",
            Slice::Late => "late",
            Slice::OutOfRange => "out_of_range",
        }
    }

    /// Inclusive year range, `None` for [`Slice::OutOfRange`]
    pub fn years(&self) -> Option<(i32, i32)> {
        match self {
            Slice::Early => Some((1740, 1819)),
            Slice::Victorian => Some((1820, 1869)),
            Slice::Late => Some((1870, 1929)),
            Slice::OutOfRange => None,
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slice for a publication year. Never fails: missing or out-of-range
/// years map to [`Slice::OutOfRange`].
pub fn slice_for(year: Option<i32>) -> Slice {
    let Some(year) = year else {
        return Slice::OutOfRange;
    };
    Slice::ALL
        .into_iter()
        .find(|slice| {
            slice
                .years()
                .map_or(false, |(first, last)| (first..=last).contains(&year))
        })
        .unwrap_or(Slice::OutOfRange)
}
