use std::{fmt::Display, str::FromStr};

use kstring::KString;
use serde::de::Visitor;

/// The workload selector handed to the benchmarked program via `-a`
/// (e.g. `r` for reads).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Task(KString);

impl Task {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Task {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

const ERR_MSG: &str = "a task token: non-empty, without whitespace, ',', '/' or '\\0'";

impl FromStr for Task {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty()
            || s.chars()
                .any(|c| c.is_whitespace() || c == ',' || c == '/' || c == '\0')
        {
            return Err(ERR_MSG);
        }
        Ok(Self(KString::from_ref(s)))
    }
}

impl serde::Serialize for Task {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct TaskVisitor;
impl<'de> Visitor<'de> for TaskVisitor {
    type Value = Task;

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

impl<'de> serde::Deserialize<'de> for Task {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(TaskVisitor)
    }
}
