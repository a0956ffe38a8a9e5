/// Currency markers stripped before parsing.
const CURRENCY_MARKERS: [&str; 3] = ["€", "EUR", "euro"];

/// Outcome of reading a price cell.
///
/// `Empty` and `Unparsed` both render as an empty string; they stay separate
/// so callers can tell a missing value from one that could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    Empty,
    Unparsed(String),
    Value(f64),
}

impl Price {
    /// Canonical text: two fractional digits, or empty.
    pub fn to_text(&self) -> String {
        match self {
            Self::Value(v) => format!("{v:.2}"),
            Self::Empty | Self::Unparsed(_) => String::new(),
        }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, Self::Unparsed(_))
    }
}

/// Parse a localized price string.
///
/// When both `,` and `.` occur, `.` is a thousands separator and `,` the
/// decimal mark. A lone `,` is the decimal mark. A lone `.` is kept.
pub fn parse_price(raw: Option<&str>) -> Price {
    let Some(raw) = raw else {
        return Price::Empty;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Price::Empty;
    }

    let mut text = trimmed.to_string();
    for marker in CURRENCY_MARKERS {
        text = text.replace(marker, "");
    }
    text.retain(|c| !c.is_whitespace());
    if text.is_empty() {
        return Price::Empty;
    }

    let has_comma = text.contains(',');
    let has_dot = text.contains('.');
    if has_comma && has_dot {
        text = text.replace('.', "").replace(',', ".");
    } else if has_comma {
        text = text.replace(',', ".");
    }

    if text.contains('_') {
        match strip_digit_separators(&text) {
            Some(stripped) => text = stripped,
            None => return Price::Unparsed(trimmed.to_string()),
        }
    }

    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Price::Value(v),
        _ => Price::Unparsed(trimmed.to_string()),
    }
}

/// Drop `_` digit-group separators (`1_000`). Each `_` must sit between two
/// ASCII digits; anything else is not a number.
fn strip_digit_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'_' {
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            if !(before.is_some_and(|c| c.is_ascii_digit()) && after.is_some_and(|c| c.is_ascii_digit())) {
                return None;
            }
        }
    }
    Some(text.replace('_', ""))
}

/// Normalize a price cell to `"1234.50"` form; empty on absence or failure.
pub fn normalize_price(raw: Option<&str>) -> String {
    parse_price(raw).to_text()
}
