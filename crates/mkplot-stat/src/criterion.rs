//! Predicates over record fields
//!
//! Used to report instances satisfying a condition (`rtime>=100`) and to
//! invalidate solved results carrying, or lacking, a correctness flag
//! (`wrong`, `no-verified`).

use std::{fmt, str::FromStr};

use crate::record::Record;

/// Comparison operator of a [`Criterion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    LessEqual,
    Equal,
    Greater,
    GreaterEqual,
}

impl Comparison {
    // Longer operators first so that `<=` is not read as `<`.
    const SYMBOLS: [(&'static str, Comparison); 5] = [
        ("<=", Comparison::LessEqual),
        (">=", Comparison::GreaterEqual),
        ("<", Comparison::Less),
        (">", Comparison::Greater),
        ("=", Comparison::Equal),
    ];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Equal => "=",
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
        }
    }

    #[expect(clippy::float_cmp)]
    #[must_use]
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Less => lhs < rhs,
            Comparison::LessEqual => lhs <= rhs,
            Comparison::Equal => lhs == rhs,
            Comparison::Greater => lhs > rhs,
            Comparison::GreaterEqual => lhs >= rhs,
        }
    }
}

/// `key <op> value` condition on a numeric record field.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub key: String,
    pub comparison: Comparison,
    pub value: f64,
}

impl Criterion {
    /// Evaluates the criterion on a record.
    ///
    /// Records without a numeric `key` never match.
    #[must_use]
    pub fn matches(&self, record: &Record) -> Option<f64> {
        let value = record.number(&self.key)?;
        self.comparison.holds(value, self.value).then_some(value)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key, self.comparison.symbol(), self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseCriterionError {
    #[display("criterion '{text}' has no comparison operator (<, <=, =, >, >=)")]
    MissingOperator { text: String },
    #[display("criterion '{text}' has an empty key")]
    EmptyKey { text: String },
    #[display("criterion '{text}' does not compare against a number")]
    InvalidValue { text: String },
}

impl FromStr for Criterion {
    type Err = ParseCriterionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pos, symbol, comparison) = s
            .find(['<', '>', '='])
            .and_then(|pos| {
                Comparison::SYMBOLS
                    .iter()
                    .find(|(symbol, _)| s[pos..].starts_with(symbol))
                    .map(|(symbol, comparison)| (pos, *symbol, *comparison))
            })
            .ok_or_else(|| ParseCriterionError::MissingOperator { text: s.to_owned() })?;

        let key = s[..pos].trim();
        if key.is_empty() {
            return Err(ParseCriterionError::EmptyKey { text: s.to_owned() });
        }
        let value = s[pos + symbol.len()..]
            .trim()
            .parse()
            .map_err(|_| ParseCriterionError::InvalidValue { text: s.to_owned() })?;

        Ok(Self {
            key: key.to_owned(),
            comparison,
            value,
        })
    }
}

/// Marks solved results as failed when a flag is present (`key`) or absent
/// (`no-key`) in the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSign {
    pub key: String,
    pub negated: bool,
}

impl FailureSign {
    const NEGATION_PREFIX: &'static str = "no-";

    #[must_use]
    pub fn holds(&self, record: &Record) -> bool {
        record.contains_key(&self.key) != self.negated
    }
}

impl FromStr for FailureSign {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.strip_prefix(Self::NEGATION_PREFIX) {
            Some(key) => Self {
                key: key.to_owned(),
                negated: true,
            },
            None => Self {
                key: s.to_owned(),
                negated: false,
            },
        })
    }
}

impl fmt::Display for FailureSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str(Self::NEGATION_PREFIX)?;
        }
        f.write_str(&self.key)
    }
}
