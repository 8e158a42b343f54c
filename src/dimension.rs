//! The axes of a sweep. Each is either fixed to one value or ranges
//! over an ordered, non-empty list of values.

use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use itertools::Itertools;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DimensionError {
    #[error("a range must contain at least one value")]
    Empty,
    #[error("the step of a range must be greater than zero")]
    ZeroStep,
    #[error("stepped ranges (`FROM..=TO:STEP`) are only supported for numbers")]
    NotSteppable,
    #[error("invalid value {value:?}: {msg}")]
    Value { value: String, msg: String },
}

/// A type whose values can make up a `Dimension`.
pub trait DimensionScalar: Clone + Debug + Display + FromStr + PartialEq {
    /// The values `from`, `from + step`, ... up to and including `to`.
    fn steps(_from: Self, _to: Self, _step: Option<Self>) -> Result<Vec<Self>, DimensionError> {
        Err(DimensionError::NotSteppable)
    }
}

impl DimensionScalar for u64 {
    fn steps(from: Self, to: Self, step: Option<Self>) -> Result<Vec<Self>, DimensionError> {
        let step = step.unwrap_or(1);
        if step == 0 {
            return Err(DimensionError::ZeroStep);
        }
        let step = usize::try_from(step).unwrap_or(usize::MAX);
        Ok((from..=to).step_by(step).collect())
    }
}

impl DimensionScalar for crate::serde::git_branch_name::GitBranchName {}
impl DimensionScalar for crate::serde::task::Task {}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "DimensionSpec<T>", into = "DimensionSpec<T>")]
#[serde(bound(
    serialize = "T: DimensionScalar + serde::Serialize",
    deserialize = "T: DimensionScalar + serde::Deserialize<'de>"
))]
pub enum Dimension<T> {
    Fixed(T),
    /// Never empty; a single value behaves like `Fixed`.
    Range(Vec<T>),
}

impl<T: DimensionScalar> Dimension<T> {
    pub fn range(values: Vec<T>) -> Result<Self, DimensionError> {
        if values.is_empty() {
            Err(DimensionError::Empty)
        } else {
            Ok(Dimension::Range(values))
        }
    }

    pub fn steps(from: T, to: T, step: Option<T>) -> Result<Self, DimensionError> {
        Self::range(T::steps(from, to, step)?)
    }

    pub fn values(&self) -> &[T] {
        match self {
            Dimension::Fixed(v) => std::slice::from_ref(v),
            Dimension::Range(vs) => vs,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    /// Whether the dimension contributes a column to the rows.
    pub fn varies(&self) -> bool {
        self.len() > 1
    }
}

impl<T> From<T> for Dimension<T> {
    fn from(value: T) -> Self {
        Dimension::Fixed(value)
    }
}

impl<T: DimensionScalar> Display for Dimension<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.values().iter().join(","))
    }
}

fn parse_scalar<T: DimensionScalar>(s: &str) -> Result<T, DimensionError>
where
    T::Err: Display,
{
    let s = s.trim();
    T::from_str(s).map_err(|e| DimensionError::Value {
        value: s.into(),
        msg: e.to_string(),
    })
}

/// `VALUE`, `VALUE,VALUE,...`, or (numbers only) `FROM..=TO` and
/// `FROM..=TO:STEP`, both ends inclusive.
impl<T: DimensionScalar> FromStr for Dimension<T>
where
    T::Err: Display,
{
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((from, rest)) = s.split_once("..=") {
            let (to, step) = match rest.split_once(':') {
                Some((to, step)) => (to, Some(parse_scalar(step)?)),
                None => (rest, None),
            };
            Self::steps(parse_scalar(from)?, parse_scalar(to)?, step)
        } else if s.contains(',') {
            Self::range(s.split(',').map(parse_scalar).collect::<Result<_, _>>()?)
        } else {
            Ok(Dimension::Fixed(parse_scalar(s)?))
        }
    }
}

/// How dimensions are written in config files.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
#[serde(bound(
    serialize = "T: serde::Serialize",
    deserialize = "T: serde::Deserialize<'de>"
))]
pub enum DimensionSpec<T> {
    One(T),
    Many(Vec<T>),
    Steps {
        from: T,
        to: T,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<T>,
    },
}

impl<T: DimensionScalar> TryFrom<DimensionSpec<T>> for Dimension<T> {
    type Error = DimensionError;

    fn try_from(spec: DimensionSpec<T>) -> Result<Self, Self::Error> {
        match spec {
            DimensionSpec::One(v) => Ok(Dimension::Fixed(v)),
            DimensionSpec::Many(vs) => Dimension::range(vs),
            DimensionSpec::Steps { from, to, step } => Dimension::steps(from, to, step),
        }
    }
}

impl<T> From<Dimension<T>> for DimensionSpec<T> {
    fn from(dimension: Dimension<T>) -> Self {
        match dimension {
            Dimension::Fixed(v) => DimensionSpec::One(v),
            Dimension::Range(vs) => DimensionSpec::Many(vs),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::serde::{git_branch_name::GitBranchName, task::Task};

    use super::*;

    #[test]
    fn t_values_and_varies() -> Result<()> {
        let d = Dimension::Fixed(2500u64);
        assert_eq!(d.values(), &[2500]);
        assert!(!d.varies());

        let d = Dimension::range(vec![7u64])?;
        assert!(!d.varies());

        let d = Dimension::range(vec![1u64, 2])?;
        assert!(d.varies());
        assert_eq!(d.len(), 2);

        assert_eq!(
            Dimension::<u64>::range(vec![]).err(),
            Some(DimensionError::Empty)
        );
        Ok(())
    }

    #[test]
    fn t_parse_numbers() -> Result<()> {
        assert_eq!("2500".parse::<Dimension<u64>>()?, Dimension::Fixed(2500));
        assert_eq!(
            "1, 2,3".parse::<Dimension<u64>>()?,
            Dimension::Range(vec![1, 2, 3])
        );
        let d: Dimension<u64> = "1000..=100000:1000".parse()?;
        assert_eq!(d.len(), 100);
        assert_eq!(d.values().first(), Some(&1000));
        assert_eq!(d.values().last(), Some(&100_000));
        assert_eq!(
            "1..=3".parse::<Dimension<u64>>()?,
            Dimension::Range(vec![1, 2, 3])
        );
        assert_eq!(
            "1..=10:4".parse::<Dimension<u64>>()?,
            Dimension::Range(vec![1, 5, 9])
        );
        assert_eq!(
            "1..=3:0".parse::<Dimension<u64>>().err(),
            Some(DimensionError::ZeroStep)
        );
        assert_eq!(
            "5..=3".parse::<Dimension<u64>>().err(),
            Some(DimensionError::Empty)
        );
        assert!(matches!(
            "x".parse::<Dimension<u64>>(),
            Err(DimensionError::Value { .. })
        ));
        Ok(())
    }

    #[test]
    fn t_parse_tokens() -> Result<()> {
        let d: Dimension<GitBranchName> = "course,std".parse()?;
        assert_eq!(d.to_string(), "course,std");
        assert!(d.varies());
        let d: Dimension<Task> = "r".parse()?;
        assert!(!d.varies());
        assert_eq!(
            "a..=b".parse::<Dimension<Task>>().err(),
            Some(DimensionError::NotSteppable)
        );
        Ok(())
    }

    #[test]
    fn t_serde() -> Result<()> {
        let d: Dimension<u64> = serde_json::from_str("3")?;
        assert_eq!(d, Dimension::Fixed(3));
        let d: Dimension<u64> = serde_json::from_str("[1, 2]")?;
        assert_eq!(d, Dimension::Range(vec![1, 2]));
        let d: Dimension<u64> = serde_json::from_str(r#"{"from": 2, "to": 6, "step": 2}"#)?;
        assert_eq!(d, Dimension::Range(vec![2, 4, 6]));
        let d: Dimension<u64> = serde_json::from_str(r#"{"from": 1, "to": 3}"#)?;
        assert_eq!(d, Dimension::Range(vec![1, 2, 3]));
        assert!(serde_json::from_str::<Dimension<u64>>("[]").is_err());
        assert!(serde_json::from_str::<Dimension<GitBranchName>>(r#""a/b""#).is_err());

        assert_eq!(serde_json::to_string(&Dimension::Range(vec![1u64, 2]))?, "[1,2]");
        assert_eq!(serde_json::to_string(&Dimension::Fixed(5u64))?, "5");
        Ok(())
    }
}
