/// Column alignment inside a `Table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Plain-text table for terminal output.
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers and alignments
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Table {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            aligns: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
            col_widths: columns.iter().map(|(h, _)| h.chars().count()).collect(),
        }
    }

    /// Add a row to the table. Cells past the header count are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, col) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(col.chars().count());
            }
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut output = self.render_row(&self.headers);
        output.push('\n');
        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }
        output
    }

    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = self
            .col_widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let col = row.get(i).map(String::as_str).unwrap_or("");
                match self.aligns[i] {
                    Align::Left => format!("{:<width$}", col, width = width),
                    Align::Right => format!("{:>width$}", col, width = width),
                }
            })
            .collect();
        cells.join("  ").trim_end().to_string()
    }
}
