//! Header text canonicalisation.
//!
//! [`normalize`] turns a header label into the token used for every
//! cross-file comparison, and [`NormalizedHeader`] applies it to a whole
//! header row while keeping the original labels for display.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::Cell;

const BOM: char = '\u{feff}';
/// UTF-8 BOM bytes decoded as Latin-1.
const MOJIBAKE_BOM: &str = "\u{ef}\u{bb}\u{bf}";

/// Canonicalises a header label into a comparison token.
///
/// The result is accent-, case- and whitespace-insensitive and restricted to
/// printable ASCII plus Latin letters. The function is total and idempotent.
pub fn normalize(raw: &str) -> String {
    let stripped = strip_bom(raw);

    let mut filtered = String::with_capacity(stripped.len());
    for ch in stripped.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_whitespace() {
            filtered.push(' ');
        } else if is_allowed(ch) {
            filtered.push(ch);
        }
    }

    filtered
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalizes the display text of a cell.
pub fn normalize_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        other => normalize(&other.display()),
    }
}

fn strip_bom(raw: &str) -> &str {
    let mut rest = raw.trim_start();
    loop {
        if let Some(tail) = rest.strip_prefix(BOM) {
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(MOJIBAKE_BOM) {
            rest = tail;
        } else {
            return rest;
        }
    }
}

fn is_allowed(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\u{c0}'..='\u{17f}') && ch != '\u{d7}' && ch != '\u{f7}'
}

/// Token used for a header cell that has no usable text.
pub fn synthetic_token(index: usize) -> String {
    format!("col_{}", index + 1)
}

/// A header row in comparable form.
///
/// Holds one token per retained column, never empty, alongside the label the
/// column carried in the source. Trailing columns without a label are
/// dropped before synthetic `col_N` tokens fill the remaining gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedHeader {
    tokens: Vec<String>,
    labels: Vec<String>,
}

impl NormalizedHeader {
    /// Builds the header from a candidate row.
    pub fn from_row(row: &[Cell]) -> Self {
        let normalized: Vec<String> = row.iter().map(normalize_cell).collect();
        let width = normalized
            .iter()
            .rposition(|token| !token.is_empty())
            .map_or(0, |last| last + 1);

        let mut tokens = Vec::with_capacity(width);
        let mut labels = Vec::with_capacity(width);
        for (index, token) in normalized.into_iter().take(width).enumerate() {
            if token.is_empty() {
                let synthetic = synthetic_token(index);
                labels.push(synthetic.clone());
                tokens.push(synthetic);
            } else {
                let label = strip_bom(&row[index].display()).trim().to_string();
                labels.push(label);
                tokens.push(token);
            }
        }

        Self { tokens, labels }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token_set(&self) -> HashSet<&str> {
        self.tokens.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_case_and_spacing_are_ignored() {
        let expected = normalize("numero");
        assert_eq!(normalize("Número"), expected);
        assert_eq!(normalize("NUMERO "), expected);
        assert_eq!(normalize("  Fecha   de\tAlta "), "fecha de alta");
        assert_eq!(normalize("Año"), "ano");
    }

    #[test]
    fn leading_bom_artifacts_are_stripped() {
        assert_eq!(normalize("\u{feff}ID"), "id");
        assert_eq!(normalize("\u{ef}\u{bb}\u{bf}Nombre"), "nombre");
    }

    #[test]
    fn control_characters_are_removed() {
        assert_eq!(normalize("na\u{0}me"), "name");
        assert_eq!(normalize("a \u{1} b"), "a b");
        assert_eq!(normalize("total €"), "total");
    }

    #[test]
    fn empty_input_yields_empty_token() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize_cell(&Cell::Empty), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "Número",
            "  Fecha   de\tAlta ",
            "\u{feff}ID",
            "a \u{1} b",
            "Straße ÆØ Łódź",
            "İstanbul",
            "col_3",
            "ﬁle\u{a0}name",
            "\u{ef}\u{bb}\u{bf}",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn numeric_headers_render_as_integers() {
        assert_eq!(normalize_cell(&Cell::from(2024_i64)), "2024");
    }

    #[test]
    fn header_gaps_get_synthetic_tokens() {
        let row = vec![
            Cell::from("ID"),
            Cell::Empty,
            Cell::from("  Nombre "),
            Cell::from("   "),
            Cell::Empty,
        ];
        let header = NormalizedHeader::from_row(&row);
        assert_eq!(header.tokens(), ["id", "col_2", "nombre"]);
        assert_eq!(header.labels(), ["ID", "col_2", "Nombre"]);
        assert!(header.tokens().iter().all(|token| !token.is_empty()));
    }

    #[test]
    fn labels_drop_leading_bom() {
        let row = vec![Cell::from("\u{feff}ID"), Cell::from(" \u{ef}\u{bb}\u{bf}Name ")];
        let header = NormalizedHeader::from_row(&row);
        assert_eq!(header.labels(), ["ID", "Name"]);
        assert_eq!(header.tokens(), ["id", "name"]);
    }

    #[test]
    fn blank_row_yields_empty_header() {
        let header = NormalizedHeader::from_row(&[Cell::Empty, Cell::from(" ")]);
        assert!(header.is_empty());
    }
}
