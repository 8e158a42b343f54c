//! Replace files atomically: write to a temporary sibling, then
//! rename over the target.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use nix::unistd::{getpid, gettid};
use run_git::path_util::AppendToPath;

use crate::debug;

#[derive(Debug, thiserror::Error)]
pub enum TempfileError {
    #[error("path is missing parent directory part")]
    MissingParent,
    #[error("path is missing file name part")]
    MissingFileName,
    #[error("IO error while {0} {1:?}: {2:#}")]
    IOError(&'static str, PathBuf, std::io::Error),
}

/// Append a suffix `.tmp~..-..` where the numbers are pid and tid
pub fn temp_path(target_path: impl AsRef<Path>) -> Result<PathBuf, TempfileError> {
    let target_path = target_path.as_ref();
    let dir = target_path.parent().ok_or(TempfileError::MissingParent)?;
    let file_name = target_path
        .file_name()
        .ok_or(TempfileError::MissingFileName)?;
    let file_name = format!(
        "{}.tmp~{}-{}",
        file_name.to_string_lossy(),
        getpid(),
        gettid()
    );
    Ok(dir.append(file_name))
}

/// A temporary file that is deleted on drop unless `finish` renamed
/// it to its target.
#[derive(Debug)]
pub struct Tempfile {
    target_path: PathBuf,
    temp_path: PathBuf,
    file: File,
}

impl Tempfile {
    pub fn create(target_path: impl AsRef<Path>) -> Result<Self, TempfileError> {
        let target_path = target_path.as_ref().to_owned();
        let temp_path = temp_path(&target_path)?;
        let file = File::create(&temp_path)
            .map_err(|e| TempfileError::IOError("creating", temp_path.clone(), e))?;
        Ok(Self {
            target_path,
            temp_path,
            file,
        })
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), TempfileError> {
        self.file
            .write_all(bytes)
            .map_err(|e| TempfileError::IOError("writing", self.temp_path.clone(), e))
    }

    /// Flush and rename to the target path, replacing it if present.
    pub fn finish(mut self) -> Result<(), TempfileError> {
        self.file
            .sync_all()
            .map_err(|e| TempfileError::IOError("syncing", self.temp_path.clone(), e))?;
        std::fs::rename(&self.temp_path, &self.target_path)
            .map_err(|e| TempfileError::IOError("renaming", self.temp_path.clone(), e))?;
        // Nothing left to delete.
        self.temp_path = PathBuf::new();
        Ok(())
    }
}

impl Drop for Tempfile {
    fn drop(&mut self) {
        if self.temp_path.as_os_str().is_empty() {
            return;
        }
        match std::fs::remove_file(&self.temp_path) {
            Ok(()) => debug!("deleted temporary file {:?}", self.temp_path),
            Err(e) => debug!("error deleting temporary file {:?}: {e:#}", self.temp_path),
        }
    }
}

/// Replace `target_path` with `contents`.
pub fn write_file_atomically(
    target_path: impl AsRef<Path>,
    contents: &[u8],
) -> Result<(), TempfileError> {
    let mut tmp = Tempfile::create(target_path)?;
    tmp.write_all(contents)?;
    tmp.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_temp_path() -> Result<(), TempfileError> {
        let p = temp_path("out/course.data")?;
        let s = p.to_string_lossy();
        assert!(s.starts_with("out/course.data.tmp~"), "{s}");
        assert!(matches!(
            temp_path("/"),
            Err(TempfileError::MissingParent)
        ));
        Ok(())
    }
}
