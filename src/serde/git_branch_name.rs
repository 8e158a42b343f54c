use std::{fmt::Display, str::FromStr};

use serde::de::Visitor;

/// A Git branch (or other revision) name that is also usable as a file
/// name, since group keys become `<branch>.data`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct GitBranchName(String);

impl GitBranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GitBranchName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for GitBranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

const ERR_MSG: &str = "a git branch name: non-empty, without whitespace, '/' or '\\0', \
                       and not starting with '.' or '-'";

impl FromStr for GitBranchName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty()
            || s.starts_with('.')
            || s.starts_with('-')
            || s.chars().any(|c| c.is_whitespace() || c == '/' || c == '\0')
        {
            return Err(ERR_MSG);
        }
        Ok(Self(s.into()))
    }
}

impl serde::Serialize for GitBranchName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct GitBranchNameVisitor;
impl<'de> Visitor<'de> for GitBranchNameVisitor {
    type Value = GitBranchName;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str(ERR_MSG)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

impl<'de> serde::Deserialize<'de> for GitBranchName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(GitBranchNameVisitor)
    }
}

#[test]
fn t_git_branch_name() {
    assert!(GitBranchName::from_str("course").is_ok());
    assert!(GitBranchName::from_str("v1.2").is_ok());
    assert!(GitBranchName::from_str("").is_err());
    assert!(GitBranchName::from_str("..").is_err());
    assert!(GitBranchName::from_str("feature/x").is_err());
    assert!(GitBranchName::from_str("-f").is_err());
    assert!(GitBranchName::from_str("a b").is_err());
}
