// src/process/slice.rs

use tracing::warn;

use crate::schema::ContractSchema;

pub const ITEM_SEP: char = ';';
pub const CELL_CENTER: &str = "<td class=\"text-center\">";
pub const CELL_RIGHT: &str = "<td class=\"text-right\">";
pub const CELL_END: &str = "</td>";

/// Pieces after the last real column left over from the script embedding.
pub const TRAILING_ARTIFACTS: usize = 5;

/// Split one row fragment into exactly `schema.len()` raw values, in schema order.
///
/// Missing or unreadable cells come back as `None`; a short row is padded
/// with `None`, surplus pieces are ignored.
pub fn slice_fields(fragment: &str, schema: &ContractSchema) -> Vec<Option<String>> {
    let pieces: Vec<&str> = fragment.split(ITEM_SEP).collect();
    let kept = pieces.len().saturating_sub(TRAILING_ARTIFACTS);
    let expected = schema.len();

    if kept > expected {
        warn!(
            contract = %schema.contract,
            kept,
            expected,
            "row has more cells than the schema; ignoring the surplus"
        );
    }

    let mut values: Vec<Option<String>> = pieces[..kept]
        .iter()
        .take(expected)
        .map(|piece| cell_value(piece))
        .collect();
    values.resize(expected, None);
    values
}

/// Text of a single cell with all whitespace removed.
pub fn cell_value(piece: &str) -> Option<String> {
    let start = [CELL_CENTER, CELL_RIGHT]
        .iter()
        .find_map(|marker| piece.find(marker).map(|i| i + marker.len()))?;
    let len = piece[start..].find(CELL_END)?;

    let value: String = piece[start..start + len]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::scan::ROW_START;
    use crate::schema::{lookup, supported_contracts};

    const TRAILER: &str = "'</tr>';&nbsp;&nbsp;&nbsp;\n";

    fn fragment(n_cells: usize) -> String {
        let mut pieces = vec![format!("{ROW_START}CODE{CELL_END}")];
        pieces.extend((1..n_cells).map(|i| format!("{CELL_RIGHT} {i} {CELL_END}")));
        format!("{};{TRAILER}", pieces.join(";"))
    }

    #[test]
    fn test_schema_length_matches_retained_pieces() {
        for (code, family) in supported_contracts() {
            let schema = lookup(code).unwrap();
            let n = family.fields().len();
            let frag = fragment(n);
            assert_eq!(frag.split(ITEM_SEP).count(), n + TRAILING_ARTIFACTS);

            let values = slice_fields(&frag, &schema);
            assert_eq!(values.len(), n, "{code}");
            assert!(values.iter().all(Option::is_some), "{code}");
            assert_eq!(values[0].as_deref(), Some("CODE"));
            assert_eq!(values[n - 1], Some((n - 1).to_string()));
        }
    }

    #[test]
    fn test_cell_markers() {
        assert_eq!(
            cell_value("<td class=\"text-center\">DI1 F19</td>").as_deref(),
            Some("DI1F19")
        );
        assert_eq!(
            cell_value("'<td class=\"text-right\">\t1,234.5 </td>'").as_deref(),
            Some("1,234.5")
        );
        assert_eq!(cell_value("<td class=\"text-right\">  </td>"), None);
        assert_eq!(cell_value("<td>5</td>"), None);
        assert_eq!(cell_value("<td class=\"text-right\">5"), None);
        assert_eq!(cell_value(""), None);
    }

    #[test]
    fn test_short_row_is_padded() {
        let schema = lookup("FRC").unwrap();
        let values = slice_fields(&fragment(3), &schema);
        assert_eq!(values.len(), 14);
        assert_eq!(values[2].as_deref(), Some("2"));
        assert!(values[3..].iter().all(Option::is_none));
    }

    #[test]
    fn test_long_row_is_truncated() {
        let schema = lookup("FRC").unwrap();
        let values = slice_fields(&fragment(20), &schema);
        assert_eq!(values.len(), 14);
        assert_eq!(values[13].as_deref(), Some("13"));
    }

    #[test]
    fn test_fragment_of_only_artifacts() {
        let schema = lookup("DOL").unwrap();
        let values = slice_fields("a;b;c", &schema);
        assert_eq!(values.len(), 16);
        assert!(values.iter().all(Option::is_none));
    }
}
