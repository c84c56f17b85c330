/*!
format.rs

Human-output helpers for the `tools` and `run` subcommands.

  - StyleOptions::detect()  NO_COLOR / NO_EMOJI / COLUMNS / tty aware
  - color(role, text, &style)
  - emoji(tag, &style)
  - box_header(title, subtitle, &style)
  - table(headers, rows, &style)
  - truncate_ellipsis(s, max_chars)

JSON output paths must not use these (keeps machine output clean).
*/

use std::borrow::Cow;
use std::io::IsTerminal;

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub use_emoji: bool,
    pub term_width: usize,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let term_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);
        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
            use_emoji: std::env::var_os("NO_EMOJI").is_none(),
            term_width,
        }
    }

    /// No color, no emoji, fixed width.
    #[cfg(test)]
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            use_emoji: false,
            term_width: 100,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Primary,
    Secondary,
    Accent,
    Success,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Primary => "38;5;45",
        Role::Secondary => "38;5;250",
        Role::Accent => "38;5;213",
        Role::Success => "38;5;82",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

pub fn emoji(tag: &str, style: &StyleOptions) -> &'static str {
    if !style.use_emoji {
        return "";
    }
    match tag {
        "success" => "✔",
        "error" => "✖",
        "info" => "ℹ",
        "tool" => "🛠",
        _ => "",
    }
}

/// Single-line title (plus optional subtitle) inside a light box.
/// Content wider than the terminal is truncated, not wrapped.
pub fn box_header(
    title: impl AsRef<str>,
    subtitle: Option<impl AsRef<str>>,
    style: &StyleOptions,
) -> String {
    let inner_max = style.term_width.saturating_sub(4).max(16);
    let plain = match &subtitle {
        Some(sub) => format!("{}  {}", title.as_ref(), sub.as_ref()),
        None => title.as_ref().to_string(),
    };
    let plain = truncate_ellipsis(&plain, inner_max);
    let width = plain.chars().count();

    // Color after truncation so escape codes never get cut.
    let title_len = title.as_ref().chars().count().min(width);
    let (head, tail): (String, String) = {
        let mut chars = plain.chars();
        let head = chars.by_ref().take(title_len).collect();
        (head, chars.collect())
    };
    let body = format!(
        "{}{}",
        color(Role::Primary, head, style),
        color(Role::Secondary, tail, style)
    );

    let bar = "─".repeat(width + 2);
    format!("┌{bar}┐\n│ {body} │\n└{bar}┘")
}

/// Left-aligned columns separated by two spaces, with a dashed header rule.
/// The last column absorbs truncation when the table is wider than the terminal.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let fixed: usize = widths[..cols - 1].iter().sum::<usize>() + (cols - 1) * 2;
    if fixed + widths[cols - 1] > style.term_width {
        widths[cols - 1] = style.term_width.saturating_sub(fixed).max(8);
    }

    let render = |cells: &[String]| -> String {
        let mut line = String::new();
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let cell = truncate_ellipsis(cell, *width);
            line.push_str(&pad(&cell, *width, i + 1 == cols));
        }
        line
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = vec![color(Role::Accent, render(&header_cells), style)];
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push(color(Role::Dim, rule.join("  "), style));
    for row in rows {
        out.push(render(row));
    }
    out.join("\n")
}

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_chars {
        return Cow::Borrowed(s);
    }
    if max_chars == 0 {
        return Cow::Owned(String::new());
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    Cow::Owned(out)
}

fn pad(s: &str, width: usize, last: bool) -> String {
    let len = s.chars().count();
    if last || len >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_box_header() {
        let b = box_header("Build succeeded", Some("exit 0"), &StyleOptions::plain());
        let lines: Vec<&str> = b.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "│ Build succeeded  exit 0 │");
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }

    #[test]
    fn table_aligns_columns() {
        let t = table(
            &["NAME", "DESCRIPTION"],
            &[
                vec!["fpc_compile".into(), "Compile".into()],
                vec!["x".into(), "y".into()],
            ],
            &StyleOptions::plain(),
        );
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines[0], "NAME         DESCRIPTION");
        assert_eq!(lines[1], "-----------  -----------");
        assert_eq!(lines[3], "x            y");
    }

    #[test]
    fn truncate() {
        assert_eq!(truncate_ellipsis("abcdef", 4), "abc…");
        assert_eq!(truncate_ellipsis("abc", 4), "abc");
    }
}
