use crate::align::Alignment;
use crate::model::{Cell, Row};

/// Projects one source row into reference column order.
///
/// Returns `None` when every cell of the row is blank. Rows shorter than the
/// source header are padded with empty cells; the source identifier is
/// appended as the final cell.
pub fn project(
    row: &[Cell],
    alignment: &Alignment,
    reference: &[String],
    source: &str,
) -> Option<Row> {
    if row.iter().all(Cell::is_blank) {
        return None;
    }

    let mut projected = Vec::with_capacity(reference.len() + 1);
    for token in reference {
        let cell = alignment
            .source_index(token)
            .and_then(|index| row.get(index))
            .cloned()
            .unwrap_or_default();
        projected.push(cell);
    }
    projected.push(Cell::Text(source.to_string()));
    Some(projected)
}

/// Rows of one file after projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    pub rows: Vec<Row>,
    pub skipped: usize,
}

/// Applies [`project`] to every data row of a single file.
#[derive(Debug, Clone, Copy)]
pub struct RowReconciler<'a> {
    alignment: &'a Alignment,
    reference: &'a [String],
    source: &'a str,
}

impl<'a> RowReconciler<'a> {
    pub fn new(alignment: &'a Alignment, reference: &'a [String], source: &'a str) -> Self {
        Self {
            alignment,
            reference,
            source,
        }
    }

    pub fn reconcile<'r, I>(&self, rows: I) -> Reconciled
    where
        I: IntoIterator<Item = &'r Row>,
    {
        let mut reconciled = Reconciled::default();
        for row in rows {
            match project(row, self.alignment, self.reference, self.source) {
                Some(projected) => reconciled.rows.push(projected),
                None => reconciled.skipped += 1,
            }
        }
        reconciled
    }
}
