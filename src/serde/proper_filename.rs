use std::{fmt::Display, str::FromStr};

/// A unicode file name, not path, i.e. not contain '/', '\n', or '\0'
/// and must not be ".", "..", or "".
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct ProperFilename(String);

impl ProperFilename {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProperFilename {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for ProperFilename {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

pub const ERR_MSG: &str = "a file name (not path), must not contain '/', '\\n', '\\0', \
     and must not be \".\", \"..\", the empty string, or longer than 255 bytes";

impl FromStr for ProperFilename {
    type Err = &'static str;

    fn from_str(v: &str) -> Result<Self, Self::Err> {
        if v.is_empty()
            || v == "."
            || v == ".."
            || v.contains('/')
            || v.contains('\n')
            || v.contains('\0')
            || v.len() > 255
        {
            return Err(ERR_MSG);
        }
        Ok(ProperFilename(v.to_owned()))
    }
}

#[test]
fn t_proper_filename() {
    assert!(ProperFilename::from_str("course.data").is_ok());
    assert!(ProperFilename::from_str("..").is_err());
    assert!(ProperFilename::from_str("a/b.data").is_err());
    assert!(ProperFilename::from_str(&"x".repeat(256)).is_err());
}
