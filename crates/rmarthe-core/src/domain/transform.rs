//! Value transformations applied to parameters and observations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("Unknown transformation '{0}' (expected one of: none, log10, ln, sqrt, pow10, exp, square)")]
    Unknown(String),
}

/// A scalar transformation and its inverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    #[default]
    None,
    Log10,
    Ln,
    Sqrt,
    Pow10,
    Exp,
    Square,
}

impl Transform {
    const ALL: [Self; 7] = [
        Self::None,
        Self::Log10,
        Self::Ln,
        Self::Sqrt,
        Self::Pow10,
        Self::Exp,
        Self::Square,
    ];

    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::None => value,
            Self::Log10 => value.log10(),
            Self::Ln => value.ln(),
            Self::Sqrt => value.sqrt(),
            Self::Pow10 => 10f64.powf(value),
            Self::Exp => value.exp(),
            Self::Square => value * value,
        }
    }

    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Log10 => Self::Pow10,
            Self::Ln => Self::Exp,
            Self::Sqrt => Self::Square,
            Self::Pow10 => Self::Log10,
            Self::Exp => Self::Ln,
            Self::Square => Self::Sqrt,
        }
    }

    /// Apply the inverse transformation.
    pub fn back(self, value: f64) -> f64 {
        self.inverse().apply(value)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Log10 => "log10",
            Self::Ln => "ln",
            Self::Sqrt => "sqrt",
            Self::Pow10 => "pow10",
            Self::Exp => "exp",
            Self::Square => "square",
        }
    }

    /// Validate a transformation name.
    pub fn check_trans(name: &str) -> Result<Self, TransformError> {
        name.parse()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transform {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = match key.as_str() {
            "" | "identity" => "none",
            "log" => "ln",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| TransformError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(Transform::check_trans("log10"), Ok(Transform::Log10));
        assert_eq!(Transform::check_trans(" LN "), Ok(Transform::Ln));
        assert_eq!(Transform::check_trans(""), Ok(Transform::None));
        assert_eq!(
            Transform::check_trans("cube"),
            Err(TransformError::Unknown("cube".to_string()))
        );
    }

    #[test]
    fn test_inverse_pairs() {
        for t in Transform::ALL {
            assert_eq!(t.inverse().inverse(), t);
            let v = 2.5;
            assert!((t.back(t.apply(v)) - v).abs() < 1e-9, "{t} failed");
        }
    }

    #[test]
    fn test_log10_values() {
        assert!((Transform::Log10.apply(1e-4) + 4.0).abs() < 1e-12);
        assert!((Transform::Log10.back(-3.0) - 1e-3).abs() < 1e-15);
    }
}
