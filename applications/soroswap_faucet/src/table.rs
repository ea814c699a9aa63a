// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    fmt::{self, Display},
    io,
};

#[macro_export]
macro_rules! table_row {
    ($($s:expr),* $(,)?) => {
        vec![$($s.to_string()),*]
    };
}

/// Plain-text table with left-aligned columns.
#[derive(Debug, Default)]
pub struct Table<'t> {
    titles: Option<Vec<&'t str>>,
    rows: Vec<Vec<String>>,
}

impl<'t> Table<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_titles(&mut self, titles: Vec<&'t str>) {
        self.titles = Some(titles);
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn print_stdout(&self) -> io::Result<()> {
        use io::Write;
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", self)?;
        stdout.flush()
    }

    fn column_widths(&self) -> Vec<usize> {
        let num_columns = self
            .rows
            .iter()
            .map(|r| r.len())
            .chain(self.titles.as_ref().map(|t| t.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0; num_columns];
        if let Some(titles) = &self.titles {
            for (w, title) in widths.iter_mut().zip(titles) {
                *w = (*w).max(title.chars().count());
            }
        }
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }
        widths
    }

    fn write_row<S: AsRef<str>>(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[S]) -> fmt::Result {
        let line = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(|c| c.as_ref()).unwrap_or("");
                let padding = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(padding))
            })
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(f, "{}", line.trim_end())
    }
}

impl Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();
        if let Some(titles) = &self.titles {
            Self::write_row(f, &widths, titles)?;
            let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-");
            writeln!(f, "{}", rule)?;
        }
        for row in &self.rows {
            Self::write_row(f, &widths, row)?;
        }
        Ok(())
    }
}
