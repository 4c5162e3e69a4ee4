use std::{borrow::Cow, fmt::Write};

const COLUMN_GAP: &str = "  ";

#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn row(mut self, row: Seq) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Seq>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Renders header, separator and rows with every column padded to its
    /// widest cell. Trailing spaces are trimmed from each line.
    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| text_width(h)).collect();
        for row in &self.rows {
            for (width, cell) in col_widths.iter_mut().zip(row.as_ref()) {
                *width = (*width).max(text_width(cell));
            }
        }

        let mut out = String::with_capacity(256);
        self.write_line(&mut out, self.headers, &col_widths);
        let separator: Vec<Cow<'_, str>> = col_widths
            .iter()
            .map(|width| Cow::Owned("-".repeat(*width)))
            .collect();
        self.write_line(&mut out, &separator, &col_widths);
        for row in &self.rows {
            self.write_line(&mut out, row.as_ref(), &col_widths);
        }

        out
    }

    fn write_line(&self, out: &mut String, cells: &[Cow<'_, str>], col_widths: &[usize]) {
        let mut line = String::new();
        for (i, width) in col_widths.iter().enumerate() {
            if i > 0 {
                line.push_str(COLUMN_GAP);
            }
            let cell = cells.get(i).map_or("", |cell| &**cell);
            let padding = width.saturating_sub(text_width(cell));
            match self.alignments.get(i).copied().unwrap_or_default() {
                Alignment::Left => {
                    let _ = write!(line, "{cell}{}", " ".repeat(padding));
                }
                Alignment::Right => {
                    let _ = write!(line, "{}{cell}", " ".repeat(padding));
                }
            }
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}
