// src/process/scan.rs

/// Opens every bulletin row: a closed row followed by a centre-aligned cell.
pub const ROW_START: &str = "</tr><td class=\"text-center\">";

/// Script statement that appends the next chunk of the bulletin table.
/// The first one after a row-start closes that row.
pub const ROW_END: &str = "MercFut3 = MercFut3 + ";

/// Lazy iterator over the row fragments of one page body.
///
/// Each fragment runs from a row-start marker up to the next end marker,
/// or up to the next row-start if that comes first. A row-start with no
/// end marker anywhere after it ends the scan.
pub struct Fragments<'a> {
    text: &'a str,
    pos: usize,
}

/// Scan `text` from the beginning.
pub fn fragments(text: &str) -> Fragments<'_> {
    Fragments { text, pos: 0 }
}

impl<'a> Iterator for Fragments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.text.get(self.pos..)?;

        // 1) next row-start
        let Some(offset) = rest.find(ROW_START) else {
            self.pos = self.text.len();
            return None;
        };
        let start = self.pos + offset;
        let body = start + ROW_START.len();

        // 2) first end marker after it
        let Some(end_offset) = self.text[body..].find(ROW_END) else {
            self.pos = self.text.len();
            return None;
        };
        let end_marker = body + end_offset;

        // never swallow a following row
        let end = self.text[body..end_marker]
            .find(ROW_START)
            .map_or(end_marker, |i| body + i);

        self.pos = end;
        Some(&self.text[start..end])
    }
}
