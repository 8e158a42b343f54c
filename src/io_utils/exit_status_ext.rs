use std::process::{ExitStatus, Output};

pub trait OutputExt {
    /// The exit status and the concatenation of stdout and stderr,
    /// each terminated with a newline if non-empty.
    fn status_and_outputs(&self) -> (ExitStatus, String);
}

impl OutputExt for Output {
    fn status_and_outputs(&self) -> (ExitStatus, String) {
        let mut outputs = String::new();
        for bytes in [&self.stdout, &self.stderr] {
            let s = String::from_utf8_lossy(bytes);
            if !s.is_empty() {
                outputs.push_str(&s);
                if !s.ends_with('\n') {
                    outputs.push('\n');
                }
            }
        }
        (self.status, outputs)
    }
}
