//! Comment blocks that point from generated statements back at the template.
//!
//! Each compiled fragment is preceded by a block naming the fragment kind and
//! its `line:column` range, followed by the template line with the fragment
//! underlined. Generated scripts are compared byte for byte, so the layout
//! here is fixed:
//!
//! ```text
//!
//! # reference 1:8-1:12
//! ##################################################################################
//! # Hello @name@!
//! #        ^~~^
//! ##################################################################################
//! ```

use crate::cursor::Cursor;
use std::fmt::Write;

/// Width of the `#` separator lines.
pub const SEPARATOR_WIDTH: usize = 82;

/// Render the annotation block for the template range `[begin, end)`.
pub fn annotation(label: &str, begin: Cursor<'_>, end: Cursor<'_>) -> String {
    let separator = "#".repeat(SEPARATOR_WIDTH);
    let begin_line = begin.view_line();
    let indent = " ".repeat(begin.column() as usize);

    let mut block = String::new();
    let _ = write!(
        block,
        "\n# {label} {}-{}\n{separator}\n# {begin_line}\n",
        begin.line_column(),
        end.line_column(),
    );

    if begin.line() == end.line() {
        let width = end.column().saturating_sub(begin.column()) as usize;
        block.push_str("# ");
        block.push_str(&indent);
        if width >= 2 {
            block.push('^');
            block.push_str(&"~".repeat(width - 2));
        }
        let _ = writeln!(block, "^\n{separator}");
        return block;
    }

    let rest_of_line = begin_line.len().saturating_sub(begin.column() as usize);
    let _ = writeln!(
        block,
        "# {indent}^{}\n#{}v\n# {}\n{separator}",
        "~".repeat(rest_of_line),
        "~".repeat(end.column() as usize),
        end.view_line(),
    );
    block
}
