pub mod fields;
pub mod markup;
pub mod project;
pub mod table;

use rayon::prelude::*;
use tracing::debug;

use crate::model::{Project, RawRow, SourceKind};

/// Rows → Projects, preserving sheet order. Untitled rows are dropped; ids
/// stay tied to the row position, so gaps are possible.
pub fn build_projects(rows: &[RawRow], kind: SourceKind) -> Vec<Project> {
    build_at(rows.par_iter().enumerate(), rows.len(), kind)
}

/// Same as [`build_projects`] for rows that already carry their sheet
/// position, as the JSON table does after skipping untitled rows.
pub fn build_positioned(rows: &[(usize, RawRow)], kind: SourceKind) -> Vec<Project> {
    build_at(rows.par_iter().map(|(i, row)| (*i, row)), rows.len(), kind)
}

fn build_at<'a>(
    rows: impl ParallelIterator<Item = (usize, &'a RawRow)>,
    total: usize,
    kind: SourceKind,
) -> Vec<Project> {
    let projects: Vec<Project> = rows
        .filter_map(|(i, row)| project::build(row, i, kind))
        .collect();

    let dropped = total - projects.len();
    if dropped > 0 {
        debug!(dropped, source = kind.as_str(), "Dropped rows without a title");
    }
    projects
}
