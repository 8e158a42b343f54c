//! Splitting rows into per-key data files for plotting: the first
//! column selects the file, the next two columns form an `x\ty` line.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Result, anyhow};
use run_git::path_util::AppendToPath;

use crate::{
    ctx, info,
    io_utils::tempfile_utils::write_file_atomically,
    row::{Cell, DimensionValue, Row},
    serde::proper_filename::ProperFilename,
};

pub const DATA_FILE_EXTENSION: &str = "data";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GroupError {
    #[error("row {row_index} has {cells} cells, grouping needs at least 3 (key, x, y)")]
    ShapeMismatch { row_index: usize, cells: usize },
    #[error("row {row_index} starts with a measurement ({value}), not a dimension value")]
    KeyIsMeasurement { row_index: usize, value: f64 },
}

/// Groups in order of first appearance, pairs in row order.
#[derive(Debug, Default, PartialEq)]
pub struct Groups {
    groups: Vec<(DimensionValue, Vec<(Cell, Cell)>)>,
    index: BTreeMap<DimensionValue, usize>,
}

impl Groups {
    pub fn push(&mut self, key: DimensionValue, pair: (Cell, Cell)) {
        let i = match self.index.get(&key) {
            Some(i) => *i,
            None => {
                let i = self.groups.len();
                self.groups.push((key.clone(), Vec::new()));
                self.index.insert(key, i);
                i
            }
        };
        self.groups[i].1.push(pair);
    }

    pub fn get(&self, key: &DimensionValue) -> Option<&[(Cell, Cell)]> {
        self.index
            .get(key)
            .map(|i| self.groups[*i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DimensionValue, &[(Cell, Cell)])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn group_rows(rows: &[Row]) -> Result<Groups, GroupError> {
    let mut groups = Groups::default();
    for (row_index, row) in rows.iter().enumerate() {
        let mut cells = row.cells().into_iter();
        let (Some(key), Some(x), Some(y)) = (cells.next(), cells.next(), cells.next()) else {
            return Err(GroupError::ShapeMismatch {
                row_index,
                cells: row.cells().len(),
            });
        };
        let key = match key {
            Cell::Dimension(key) => key,
            Cell::Measurement(value) => {
                return Err(GroupError::KeyIsMeasurement { row_index, value });
            }
        };
        groups.push(key, (x, y));
    }
    Ok(groups)
}

/// The contents of a data file: one `x\ty` line per pair.
pub fn data_file_contents(pairs: &[(Cell, Cell)]) -> String {
    let mut s = String::new();
    for (x, y) in pairs {
        s.push_str(&format!("{x}\t{y}\n"));
    }
    s
}

/// Replace `<key>.data` in `output_dir` for every group. Returns the
/// paths written, in group order.
pub fn write_groups(groups: &Groups, output_dir: &Path) -> Result<Vec<PathBuf>> {
    groups
        .iter()
        .map(|(key, pairs)| {
            let file_name = ProperFilename::from_str(&format!("{key}.{DATA_FILE_EXTENSION}"))
                .map_err(|e| anyhow!("group key {key:?} does not make {e}"))?;
            let path = output_dir.append(file_name.as_str());
            write_file_atomically(&path, data_file_contents(pairs).as_bytes())
                .map_err(ctx!("writing data file {path:?}"))?;
            info!("wrote {} lines to {path:?}", pairs.len());
            Ok(path)
        })
        .collect()
}
