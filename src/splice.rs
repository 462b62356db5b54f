//! Span-splicing text editor with source map output.
//!
//! Edits are collected as `(start, end, replacement)` byte spans against the original
//! text and applied in one pass, so spans always refer to original offsets.

use oxc_sourcemap::{SourceMap, SourceMapBuilder};

#[derive(Debug, Clone)]
struct Edit {
    start: u32,
    end: u32,
    content: String,
}

pub struct SpliceEditor<'s> {
    source: &'s str,
    edits: Vec<Edit>,
    appended: String,
}

impl<'s> SpliceEditor<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            edits: Vec::new(),
            appended: String::new(),
        }
    }

    /// Replaces the original bytes `start..end`. Returns `false` (and records nothing)
    /// when the span is out of bounds, not on a char boundary, or overlaps an earlier
    /// edit.
    pub fn overwrite(&mut self, start: u32, end: u32, content: impl Into<String>) -> bool {
        let (s, e) = (start as usize, end as usize);
        if s > e
            || e > self.source.len()
            || !self.source.is_char_boundary(s)
            || !self.source.is_char_boundary(e)
        {
            return false;
        }
        if self
            .edits
            .iter()
            .any(|edit| start < edit.end && edit.start < end)
        {
            return false;
        }
        self.edits.push(Edit {
            start,
            end,
            content: content.into(),
        });
        true
    }

    pub fn append(&mut self, content: &str) {
        self.appended.push_str(content);
    }

    pub fn has_changes(&self) -> bool {
        !self.edits.is_empty() || !self.appended.is_empty()
    }

    fn sorted_edits(&self) -> Vec<&Edit> {
        let mut edits: Vec<&Edit> = self.edits.iter().collect();
        edits.sort_by_key(|edit| edit.start);
        edits
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len() + self.appended.len());
        let mut cursor = 0usize;
        for edit in self.sorted_edits() {
            out.push_str(&self.source[cursor..edit.start as usize]);
            out.push_str(&edit.content);
            cursor = edit.end as usize;
        }
        out.push_str(&self.source[cursor..]);
        out.push_str(&self.appended);
        out
    }

    /// Builds a v3 source map from rendered output back to the original, embedding the
    /// original text. With `hires` every unchanged character gets its own mapping;
    /// otherwise only the start of each unchanged line segment is mapped.
    pub fn generate_map(&self, source_name: &str, hires: bool) -> SourceMap {
        let mut builder = SourceMapBuilder::default();
        let source_id = builder.add_source_and_content(source_name, self.source);

        let mut generated = Position::default();
        let mut original = Position::default();
        let mut cursor = 0usize;

        for edit in self.sorted_edits() {
            let (start, end) = (edit.start as usize, edit.end as usize);
            map_unchanged(
                &mut builder,
                &self.source[cursor..start],
                &mut generated,
                &mut original,
                source_id,
                hires,
            );

            let replaced = &self.source[start..end];
            let name_id = if replaced.is_empty() {
                None
            } else {
                Some(builder.add_name(replaced))
            };
            builder.add_token(
                generated.line,
                generated.column,
                original.line,
                original.column,
                Some(source_id),
                name_id,
            );
            generated.advance(&edit.content);
            original.advance(replaced);
            cursor = end;
        }

        map_unchanged(
            &mut builder,
            &self.source[cursor..],
            &mut generated,
            &mut original,
            source_id,
            hires,
        );

        builder.into_sourcemap()
    }
}

/// Line/column in UTF-16 code units, as source maps count them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: u32,
    column: u32,
}

impl Position {
    fn advance_char(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += ch.len_utf16() as u32;
        }
    }

    fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            self.advance_char(ch);
        }
    }
}

fn map_unchanged(
    builder: &mut SourceMapBuilder,
    text: &str,
    generated: &mut Position,
    original: &mut Position,
    source_id: u32,
    hires: bool,
) {
    let mut line_start = true;
    for ch in text.chars() {
        if ch != '\n' && (hires || line_start) {
            builder.add_token(
                generated.line,
                generated.column,
                original.line,
                original.column,
                Some(source_id),
                None,
            );
        }
        line_start = ch == '\n';
        generated.advance_char(ch);
        original.advance_char(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_and_append() {
        let source = "const a = <Foo/>;";
        let mut editor = SpliceEditor::new(source);
        assert!(editor.overwrite(11, 14, "PREPPY_JSX_ID_1"));
        editor.append(";done();");
        assert_eq!(editor.render(), "const a = <PREPPY_JSX_ID_1/>;;done();");
    }

    #[test]
    fn test_edits_apply_in_source_order() {
        let source = "<A></A>";
        let mut editor = SpliceEditor::new(source);
        assert!(editor.overwrite(5, 6, "Y"));
        assert!(editor.overwrite(1, 2, "X"));
        assert_eq!(editor.render(), "<X></Y>");
    }

    #[test]
    fn test_rejects_overlapping_and_out_of_range() {
        let mut editor = SpliceEditor::new("abcdef");
        assert!(editor.overwrite(1, 4, "x"));
        assert!(!editor.overwrite(3, 5, "y"));
        assert!(!editor.overwrite(4, 10, "z"));
        assert_eq!(editor.render(), "axef");
    }

    #[test]
    fn test_untouched_editor_renders_source() {
        let editor = SpliceEditor::new("let x = 1;");
        assert!(!editor.has_changes());
        assert_eq!(editor.render(), "let x = 1;");
    }

    #[test]
    fn test_generate_map_embeds_content() {
        let source = "const a = <Foo/>;\nconst b = 2;";
        let mut editor = SpliceEditor::new(source);
        editor.overwrite(11, 14, "PREPPY_JSX_ID_1");
        let map = editor.generate_map("unit.jsx", true);
        let json: serde_json::Value = serde_json::from_str(&map.to_json_string()).unwrap();
        assert_eq!(json["sources"][0], "unit.jsx");
        assert_eq!(json["sourcesContent"][0], source);
        assert_eq!(json["names"][0], "Foo");
        let mappings = json["mappings"].as_str().unwrap();
        assert!(mappings.contains(';'), "second line should be mapped");
    }
}
