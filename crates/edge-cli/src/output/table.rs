#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN: usize = 5;
const SEPARATOR: &str = "  ";

/// Render an aligned plain-text table.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let divider = "-".repeat(header_line.trim_end().chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line.trim_end().to_string());
    lines.push(divider);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = row.get(index).map_or("-", String::as_str);
                let text = pad(&truncate(cell, *width), *width);
                if options.color {
                    colorize(cell, text)
                } else {
                    text
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// Narrow the widest columns one character at a time until the table fits.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].len().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            break;
        };
        widths[index] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{value}{}", " ".repeat(width.saturating_sub(len)))
}

fn colorize(cell: &str, text: String) -> String {
    let code = match cell.to_ascii_lowercase().as_str() {
        "true" | "authenticated" | "granted" => "32",
        "loading" | "uninitialized" => "33",
        "false" | "unauthenticated" | "denied" => "31",
        _ => return text,
    };
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn columns_align_across_rows() {
        let rows = vec![
            vec!["market_edge".to_string(), "false".to_string()],
            vec!["value_edge".to_string(), "true".to_string()],
        ];
        let out = render(&["application", "has_access"], &rows, PLAIN);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "application  has_access");
        assert_eq!(lines[1], "-".repeat(lines[0].len()));
        assert_eq!(lines[2], "market_edge  false");
        assert_eq!(lines[3], "value_edge   true");
    }

    #[test]
    fn narrow_terminal_truncates_widest_column() {
        let rows = vec![vec![
            "a-very-long-route-name-for-testing".to_string(),
            "x".to_string(),
        ]];
        let options = TableOptions {
            max_width: Some(20),
            color: false,
        };
        let out = render(&["route", "id"], &rows, options);
        let row = out.lines().nth(2).expect("row line");

        assert!(row.contains('…'));
        assert!(row.chars().count() <= 20);
    }

    #[test]
    fn color_wraps_known_states() {
        let rows = vec![vec!["authenticated".to_string()]];
        let options = TableOptions {
            max_width: None,
            color: true,
        };
        let out = render(&["phase"], &rows, options);
        assert!(out.contains("\u{1b}[32m"));
    }
}
