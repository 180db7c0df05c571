use serde::Serialize;
use std::fmt;

/// Pretty JSON on stdout, for `--json`.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned plain-text table with a dashed rule under the header.
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(col))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(self.headers[col].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_line(f, &widths, self.headers.iter().copied())?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &widths, rule.iter().map(String::as_str))?;
        for row in &self.rows {
            write_line(f, &widths, row.iter().map(String::as_str))?;
        }
        Ok(())
    }
}

fn write_line<'a>(
    f: &mut fmt::Formatter<'_>,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    let padded: Vec<String> = cells
        .zip(widths.iter().copied())
        .map(|(c, w)| format!("{c:w$}"))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let mut table = Table::new(&["DAY", "DATE"]);
        table.row(vec!["last submission".to_string(), "2025-03-05".to_string()]);
        table.row(vec!["send".to_string(), "2025-03-01".to_string()]);
        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "DAY              DATE");
        assert_eq!(lines[1], "---------------  ----------");
        assert_eq!(lines[3], "send             2025-03-01");
    }
}
