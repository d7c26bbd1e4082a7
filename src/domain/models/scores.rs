use serde::{Deserialize, Serialize};
use std::fmt;

/// Submission consistency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsistencyRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ConsistencyRating {
    /// Bucket a submission rate expressed in percent.
    pub fn from_rate(rate: f64) -> Self {
        if rate > 80.0 {
            Self::Excellent
        } else if rate > 60.0 {
            Self::Good
        } else if rate > 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for ConsistencyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyScore {
    /// Percent of expected standups submitted, in `[0, 100]`
    pub rate: f64,
    pub rating: ConsistencyRating,
}

/// Productivity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductivityRating {
    High,
    Medium,
    Low,
    #[serde(rename = "No data")]
    NoData,
}

impl fmt::Display for ProductivityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::NoData => "No data",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductivityScore {
    /// Raw weighted score; `None` when there were no standups
    pub score: Option<f64>,
    pub rating: ProductivityRating,
}
