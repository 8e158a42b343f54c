//! Shell quoting, for showing command lines to the user (dry runs,
//! log messages, errors). Commands are never run through a shell.

use std::{borrow::Cow, ffi::OsStr, process::Command};

use itertools::Itertools;

const CHARS_NOT_NEEDING_QUOTING: &str = "_:.-+,/=@[]^";

/// Quote `s` for bash if it contains anything beyond a safe set of
/// characters.
pub fn bash_string_literal(s: &str) -> Cow<'_, str> {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || CHARS_NOT_NEEDING_QUOTING.contains(c))
    {
        s.into()
    } else {
        let mut ss = String::with_capacity(s.len() + 2);
        ss.push('\'');
        for c in s.chars() {
            if c == '\'' {
                ss.push_str("'\\''");
            } else {
                ss.push(c);
            }
        }
        ss.push('\'');
        ss.into()
    }
}

pub fn bash_string_from_cmd(cmd: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    cmd.into_iter()
        .map(|s| bash_string_literal(s.as_ref()).into_owned())
        .join(" ")
}

/// The program and arguments of `cmd`, lossily decoded and quoted.
pub fn cmd_as_bash_string(cmd: &Command) -> String {
    let prog = cmd.get_program().to_string_lossy();
    let args = cmd.get_args().map(|s: &OsStr| s.to_string_lossy());
    bash_string_from_cmd(std::iter::once(prog).chain(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_bash_string_literal() {
        assert_eq!(bash_string_literal("./main"), "./main");
        assert_eq!(bash_string_literal("-k"), "-k");
        assert_eq!(bash_string_literal("a b"), "'a b'");
        assert_eq!(bash_string_literal(""), "''");
        assert_eq!(bash_string_literal("it's"), "'it'\\''s'");
    }

    #[test]
    fn t_cmd_as_bash_string() {
        let mut cmd = Command::new("./main");
        cmd.args(["-k", "2500", "-a", "r w"]);
        assert_eq!(cmd_as_bash_string(&cmd), "./main -k 2500 -a 'r w'");
    }
}
