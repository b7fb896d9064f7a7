//! Plain-text reports written to stdout
//!
//! The line-by-line format is meant for other programs: each report is a
//! single line of tab-terminated `count fraction line` groups. The summary is
//! what a person sees when logtop exits.

use std::io::{self, Write};

use logtop_types::{RankedLine, TopSnapshot};

/// One machine-friendly line: `"<count> <fraction> <line>\t"` per row, then `\n`
pub fn format_line_by_line(rows: &[RankedLine]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{} {:.6} {}\t",
            row.count,
            row.fraction(),
            row.display()
        ));
    }
    out.push('\n');
    out
}

/// Window statistics followed by one aligned row per ranked line
pub fn format_summary(snapshot: &TopSnapshot) -> String {
    let mut out = format!(
        "{} lines in window (capacity {}), {} distinct, {} read\n",
        snapshot.window_len, snapshot.capacity, snapshot.distinct, snapshot.total_fed
    );

    let rank_width = snapshot
        .rows
        .last()
        .map(|row| row.rank.to_string().len())
        .unwrap_or(1);
    let count_width = snapshot
        .rows
        .iter()
        .map(|row| row.count.to_string().len())
        .max()
        .unwrap_or(1);

    for row in &snapshot.rows {
        out.push_str(&format!(
            "{:>rank_width$} {:>count_width$} {:>5.1}% {}\n",
            row.rank,
            row.count,
            row.frequency,
            row.display(),
        ));
    }
    out
}

pub fn write_line_by_line<W: Write>(out: &mut W, rows: &[RankedLine]) -> io::Result<()> {
    out.write_all(format_line_by_line(rows).as_bytes())?;
    out.flush()
}

pub fn write_summary<W: Write>(out: &mut W, snapshot: &TopSnapshot) -> io::Result<()> {
    out.write_all(format_summary(snapshot).as_bytes())?;
    out.flush()
}
