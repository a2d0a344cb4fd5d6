//! Whole-grid numeric reductions.

use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Aggregate {
    Sum,
    Average,
    Max,
    Min,
    Count,
}

impl Aggregate {
    pub const ALL: [Aggregate; 5] = [
        Aggregate::Sum,
        Aggregate::Average,
        Aggregate::Max,
        Aggregate::Min,
        Aggregate::Count,
    ];

    /// Reduce a set of numbers.
    ///
    /// SUM, AVERAGE and COUNT of nothing are `Some(0.0)`. MAX and MIN of nothing are
    /// `None`: there is no number to report.
    pub fn compute<I>(&self, values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        match self {
            Aggregate::Sum => Some(values.iter().sum()),
            Aggregate::Average => {
                if values.is_empty() {
                    Some(0.0)
                } else {
                    Some(values.iter().sum::<f64>() / values.len() as f64)
                }
            }
            Aggregate::Max => values.iter().copied().reduce(f64::max),
            Aggregate::Min => values.iter().copied().reduce(f64::min),
            Aggregate::Count => Some(values.len() as f64),
        }
    }
}

impl FromStr for Aggregate {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUM" => Ok(Aggregate::Sum),
            "AVERAGE" | "AVG" => Ok(Aggregate::Average),
            "MAX" => Ok(Aggregate::Max),
            "MIN" => Ok(Aggregate::Min),
            "COUNT" => Ok(Aggregate::Count),
            _ => Err(GridError::UnknownAggregate(s.to_string())),
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregate::Sum => "SUM",
            Aggregate::Average => "AVERAGE",
            Aggregate::Max => "MAX",
            Aggregate::Min => "MIN",
            Aggregate::Count => "COUNT",
        };
        f.write_str(name)
    }
}
