/// Widest a column may grow before cells are truncated.
const MAX_COLUMN_WIDTH: usize = 40;

/// Box-drawn table sized to its content.
pub struct TableFormatter {
    headers: Vec<String>,
    widths: Vec<usize>,
}

impl TableFormatter {
    pub fn new(headers: &[&str], rows: &[Vec<String>]) -> Self {
        let widths = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(header.chars().count())
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect();

        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            widths,
        }
    }

    pub fn print_table(&self, rows: &[Vec<String>]) {
        for line in self.render(rows) {
            println!("{}", line);
        }
    }

    fn render(&self, rows: &[Vec<String>]) -> Vec<String> {
        let mut lines = Vec::with_capacity(rows.len() + 4);
        lines.push(self.border('┌', '┬', '┐'));
        lines.push(self.row(&self.headers));
        lines.push(self.border('├', '┼', '┤'));
        for row in rows {
            lines.push(self.row(row));
        }
        lines.push(self.border('└', '┴', '┘'));
        lines
    }

    fn row(&self, cells: &[String]) -> String {
        let rendered: Vec<String> = self
            .widths
            .iter()
            .enumerate()
            .map(|(i, width)| truncate(cells.get(i).map(String::as_str).unwrap_or(""), *width))
            .collect();
        format!("│ {} │", rendered.join(" │ "))
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// such as Turkish model names and emoji.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
