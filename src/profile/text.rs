//! Line-oriented profile form
//!
//! One block of four `Key: value` lines per file, blank line between
//! blocks. Record contents go in brackets, comma separated. The form
//! carries exactly what the JSON form carries and parses back to the
//! same entries.
//!
//! ```text
//! Name: 6F3B
//! Type: linear
//! FCI: 620482024221
//! Data: [0102, ffff]
//! ```

use std::fmt::Write as _;

use super::{EntryData, FileEntry, ProfileError};

pub fn render(entries: &[FileEntry]) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // writeln! into a String cannot fail
        let _ = writeln!(out, "Name: {}", entry.name);
        let _ = writeln!(out, "Type: {}", entry.structure);
        let _ = writeln!(out, "FCI: {}", entry.fci);
        match &entry.data {
            EntryData::Transparent(hex) => {
                let _ = writeln!(out, "Data: {hex}");
            }
            EntryData::Records(records) => {
                let _ = writeln!(out, "Data: [{}]", records.join(", "));
            }
        }
    }
    out
}

pub fn parse(input: &str) -> Result<Vec<FileEntry>, ProfileError> {
    let mut entries = Vec::new();
    let mut lines = input
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    while let Some((n, line)) = lines.next() {
        let name = expect_key(n, line, "Name")?;
        let (n2, line) = next_line(&mut lines, n)?;
        let structure = expect_key(n2, line, "Type")?;
        let (n3, line) = next_line(&mut lines, n2)?;
        let fci = expect_key(n3, line, "FCI")?;
        let (n4, line) = next_line(&mut lines, n3)?;
        let data = parse_data(n4, expect_key(n4, line, "Data")?)?;

        entries.push(FileEntry {
            name,
            structure,
            fci,
            data,
        });
    }

    Ok(entries)
}

fn next_line<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    previous: usize,
) -> Result<(usize, &'a str), ProfileError> {
    lines.next().ok_or(ProfileError::Text {
        line: previous + 2,
        message: "truncated file block".into(),
    })
}

fn expect_key(n: usize, line: &str, key: &str) -> Result<String, ProfileError> {
    let line = line.trim();
    match line.split_once(':') {
        Some((k, value)) if k == key => Ok(value.trim().to_string()),
        _ => Err(ProfileError::Text {
            line: n + 1,
            message: format!("expected {key:?} line, got {line:?}"),
        }),
    }
}

fn parse_data(n: usize, value: String) -> Result<EntryData, ProfileError> {
    if let Some(inner) = value.strip_prefix('[') {
        let inner = inner.strip_suffix(']').ok_or(ProfileError::Text {
            line: n + 1,
            message: "unterminated record list".into(),
        })?;
        let records = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(|r| r.trim().to_string()).collect()
        };
        Ok(EntryData::Records(records))
    } else {
        Ok(EntryData::Transparent(value))
    }
}
