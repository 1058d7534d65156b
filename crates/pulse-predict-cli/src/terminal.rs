//! Plain-text rendering of render instructions.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use pulse_predict_core::{Block, Render};

const BAR_WIDTH: usize = 20;

/// Print a render to stdout. A download block is saved to `output` when
/// one is given.
pub fn print_render(render: &Render, output: Option<&Path>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_render(&mut out, render, output)
}

pub fn write_render<W: Write>(out: &mut W, render: &Render, output: Option<&Path>) -> Result<()> {
    for block in &render.blocks {
        match block {
            Block::Error { message } => writeln!(out, "[error] {}", message)?,
            Block::Warning { message } => writeln!(out, "[warning] {}", message)?,
            Block::Success { message } => writeln!(out, "[ok] {}", message)?,
            Block::Info { message } => writeln!(out, "[info] {}", message)?,
            Block::Table { columns, rows } => write_table(out, columns, rows)?,
            Block::Download {
                file_name, data, ..
            } => match output {
                Some(path) => {
                    std::fs::write(path, data)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Saved results to {}", path.display())?;
                }
                None => writeln!(
                    out,
                    "Results ready as {} (pass --output to save)",
                    file_name
                )?,
            },
            Block::Expander {
                title,
                heading,
                items,
                callout,
            } => {
                writeln!(out, "> {}", title)?;
                writeln!(out, "  {}", heading)?;
                for item in items {
                    writeln!(out, "  - {}", item)?;
                }
                if let Some(callout) = callout {
                    writeln!(out, "  ! {}", callout)?;
                }
            }
            Block::Progress { value } => writeln!(out, "{}", progress_bar(*value))?,
            Block::Caption { text } => writeln!(out, "  {}", text)?,
            Block::Metric { label, value } => writeln!(out, "{}: {}", label, value)?,
        }
    }
    Ok(())
}

fn progress_bar(value: u8) -> String {
    let filled = (value.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        value
    )
}

fn write_table<W: Write>(out: &mut W, columns: &[String], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(columns))?;
    for row in rows {
        writeln!(out, "{}", line(row.as_slice()))?;
    }
    Ok(())
}
