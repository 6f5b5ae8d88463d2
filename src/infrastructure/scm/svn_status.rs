//! Parsing of `svn status` output
//!
//! Each entry line carries seven one-character flag columns, a space and the
//! path. The first column is the item state, the second the property state and
//! the seventh marks tree conflicts.

use super::scm_interface::{ChangeKind, SandboxStatus, StatusEntry};

const FLAG_COLUMNS: usize = 7;
const EXTERNAL_HEADER: &str = "Performing status on external item";

/// Parse the lines printed by `svn status`
pub fn parse_status<I, S>(lines: I) -> SandboxStatus
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SandboxStatus::new(
        lines
            .into_iter()
            .filter_map(|line| parse_status_line(line.as_ref()))
            .collect(),
    )
}

/// Parse one status line, `None` for headers, detail lines and blanks
pub fn parse_status_line(line: &str) -> Option<StatusEntry> {
    if line.trim().is_empty() || line.starts_with(EXTERNAL_HEADER) || line.starts_with("---") {
        return None;
    }

    // Tree conflict details are indented and introduced by '>'
    if line.trim_start().starts_with('>') {
        return None;
    }

    if line.len() <= FLAG_COLUMNS + 1
        || !line.is_char_boundary(FLAG_COLUMNS)
        || !line.is_char_boundary(FLAG_COLUMNS + 1)
    {
        return None;
    }

    let (flags, rest) = line.split_at(FLAG_COLUMNS);
    if !rest.starts_with(' ') {
        return None;
    }

    let path = rest[1..].trim_end();
    if path.is_empty() {
        return None;
    }

    let mut columns = flags.chars();
    let item = columns.next()?;
    let properties = columns.next()?;
    let tree_conflict = flags.chars().nth(FLAG_COLUMNS - 1)?;

    let kind = match item {
        'A' => ChangeKind::Added,
        'C' => ChangeKind::Conflicted,
        'D' => ChangeKind::Deleted,
        'M' => ChangeKind::Modified,
        'R' => ChangeKind::Replaced,
        '!' => ChangeKind::Missing,
        '~' => ChangeKind::Obstructed,
        '?' => ChangeKind::Unversioned,
        'I' => ChangeKind::Ignored,
        'X' => ChangeKind::External,
        ' ' => match (properties, tree_conflict) {
            ('M', _) => ChangeKind::PropertyModified,
            ('C', _) | (_, 'C') => ChangeKind::Conflicted,
            _ => return None,
        },
        _ => return None,
    };

    Some(StatusEntry::new(kind, path))
}
