//! Format patterns
//!
//! Patterns use SimpleDateFormat-style letters. A run of the same letter is
//! one field and the run length is its width:
//!
//! - `y`: year (`yy` two digits, otherwise zero padded to the width)
//! - `M`: month (`M`/`MM` numeric, `MMM` short name, `MMMM` full name)
//! - `d`: day of month
//! - `D`: day of year
//! - `E`: weekday (`E`-`EEE` short name, `EEEE` full name)
//! - `H`: hour 0-23
//! - `h`: hour 1-12
//! - `a`: AM/PM marker
//! - `m`: minute
//! - `s`: second
//! - `S`: millisecond
//! - `Z`: offset as `+HHMM`
//!
//! Text inside single quotes is literal and `''` is a quote. Any other
//! non-letter character is literal.

use crate::civil::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tempora_core::calendar;
use tempora_core::{validate, Error, Field, RangeError, Result, UtcOffset};

/// The pattern used when none is given
pub const DEFAULT_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// Two-digit years below this pivot are read as 20xx, others as 19xx
const TWO_DIGIT_YEAR_PIVOT: i64 = 70;

/// Longest digit run accepted for one numeric field
const MAX_FIELD_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Letter {
    Year,
    Month,
    Day,
    DayOfYear,
    Weekday,
    Hour24,
    Hour12,
    AmPm,
    Minute,
    Second,
    Millisecond,
    Offset,
}

impl Letter {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'y' => Letter::Year,
            'M' => Letter::Month,
            'd' => Letter::Day,
            'D' => Letter::DayOfYear,
            'E' => Letter::Weekday,
            'H' => Letter::Hour24,
            'h' => Letter::Hour12,
            'a' => Letter::AmPm,
            'm' => Letter::Minute,
            's' => Letter::Second,
            'S' => Letter::Millisecond,
            'Z' => Letter::Offset,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Field { letter: Letter, width: usize },
    Literal(String),
}

impl Item {
    fn is_numeric(&self) -> bool {
        match self {
            Item::Field { letter, width } => match letter {
                Letter::Month => *width <= 2,
                Letter::Weekday | Letter::AmPm | Letter::Offset => false,
                _ => true,
            },
            Item::Literal(_) => false,
        }
    }
}

/// A compiled format pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    source: String,
    items: Vec<Item>,
}

impl Pattern {
    /// Compile a pattern, rejecting unknown letters and unterminated quotes
    pub fn new(source: &str) -> Result<Self> {
        let items = compile(source).map_err(|e| {
            tracing::debug!(pattern = source, error = %e, "rejected format pattern");
            e
        })?;
        Ok(Self { source: source.to_string(), items })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render fields observed in `offset`
    pub fn format(&self, dt: &DateTime, offset: UtcOffset) -> String {
        let mut out = String::with_capacity(self.source.len() + 8);
        for item in &self.items {
            match item {
                Item::Literal(text) => out.push_str(text),
                Item::Field { letter, width } => format_field(&mut out, *letter, *width, dt, offset),
            }
        }
        out
    }

    /// Read the fields described by this pattern out of `input`
    pub(crate) fn parse(&self, input: &str) -> Result<Parsed> {
        let mut parser = Parser { input, pos: 0, parsed: RawFields::default() };
        for (i, item) in self.items.iter().enumerate() {
            let abutting = self.items.get(i + 1).is_some_and(Item::is_numeric);
            parser.item(item, abutting)?;
        }
        if parser.pos != input.len() {
            return Err(Error::parse(input, parser.pos, "unexpected trailing input"));
        }
        parser.parsed.resolve()
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self {
            source: DEFAULT_PATTERN.to_string(),
            items: vec![
                Item::Field { letter: Letter::Year, width: 4 },
                Item::Literal("-".to_string()),
                Item::Field { letter: Letter::Month, width: 2 },
                Item::Literal("-".to_string()),
                Item::Field { letter: Letter::Day, width: 2 },
                Item::Literal(" ".to_string()),
                Item::Field { letter: Letter::Hour24, width: 2 },
                Item::Literal(":".to_string()),
                Item::Field { letter: Letter::Minute, width: 2 },
                Item::Literal(":".to_string()),
                Item::Field { letter: Letter::Second, width: 2 },
            ],
        }
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Pattern {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> String {
        pattern.source
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Compilation
// ============================================================================

fn compile(source: &str) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut literal = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                literal.push('\'');
                continue;
            }
            let mut closed = false;
            while let Some(q) = chars.next() {
                if q == '\'' {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        literal.push('\'');
                        continue;
                    }
                    closed = true;
                    break;
                }
                literal.push(q);
            }
            if !closed {
                return Err(Error::pattern(source, "unterminated quote"));
            }
        } else if c.is_ascii_alphabetic() {
            let letter = Letter::from_char(c)
                .ok_or_else(|| Error::pattern(source, format!("unknown pattern letter '{}'", c)))?;
            let mut width = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                width += 1;
            }
            if !literal.is_empty() {
                items.push(Item::Literal(std::mem::take(&mut literal)));
            }
            items.push(Item::Field { letter, width });
        } else {
            literal.push(c);
        }
    }

    if !literal.is_empty() {
        items.push(Item::Literal(literal));
    }
    Ok(items)
}

// ============================================================================
// Formatting
// ============================================================================

fn pad(out: &mut String, value: i64, width: usize) {
    if value < 0 {
        out.push('-');
        out.push_str(&format!("{:0width$}", value.unsigned_abs(), width = width));
    } else {
        out.push_str(&format!("{:0width$}", value, width = width));
    }
}

fn format_field(out: &mut String, letter: Letter, width: usize, dt: &DateTime, offset: UtcOffset) {
    match letter {
        Letter::Year if width == 2 => pad(out, (dt.year as i64).rem_euclid(100), 2),
        Letter::Year => pad(out, dt.year as i64, width),
        Letter::Month => {
            let name = MONTH_NAMES[(dt.month as usize + 11) % 12];
            match width {
                1 | 2 => pad(out, dt.month as i64, width),
                3 => out.push_str(&name[..3]),
                _ => out.push_str(name),
            }
        }
        Letter::Day => pad(out, dt.day as i64, width),
        Letter::DayOfYear => pad(out, dt.day_of_year() as i64, width),
        Letter::Weekday => {
            let name = WEEKDAY_NAMES[(dt.weekday() as usize + 6) % 7];
            if width >= 4 {
                out.push_str(name);
            } else {
                out.push_str(&name[..3]);
            }
        }
        Letter::Hour24 => pad(out, dt.hour as i64, width),
        Letter::Hour12 => {
            let hour = match dt.hour % 12 {
                0 => 12,
                h => h,
            };
            pad(out, hour as i64, width)
        }
        Letter::AmPm => out.push_str(if dt.hour < 12 { "AM" } else { "PM" }),
        Letter::Minute => pad(out, dt.minute as i64, width),
        Letter::Second => pad(out, dt.second as i64, width),
        Letter::Millisecond => pad(out, dt.millisecond as i64, width),
        Letter::Offset => out.push_str(&offset.to_compact()),
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Fields read from text, ready for validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Parsed {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub millisecond: i32,
    pub offset: Option<UtcOffset>,
}

#[derive(Debug, Default)]
struct RawFields {
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    day_of_year: Option<i64>,
    hour24: Option<i64>,
    hour12: Option<i64>,
    pm: Option<bool>,
    minute: Option<i64>,
    second: Option<i64>,
    millisecond: Option<i64>,
    offset: Option<UtcOffset>,
}

fn narrow(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

impl RawFields {
    fn resolve(self) -> Result<Parsed> {
        let year = self.year.unwrap_or(1970);
        let year = i32::try_from(year)
            .map_err(|_| RangeError::new(Field::Year, year, i32::MIN as i64, i32::MAX as i64))?;

        let (month, day) = match (self.month, self.day, self.day_of_year) {
            (None, None, Some(doy)) => {
                let max = validate::days_in_year(year) as i64;
                if !(1..=max).contains(&doy) {
                    return Err(RangeError::new(Field::Date, doy, 1, max).into());
                }
                let days = calendar::days_from_civil(year as i64, 1, 1) + doy - 1;
                let (_, month, day) = calendar::civil_from_days(days);
                (month as i64, day as i64)
            }
            (month, day, _) => (month.unwrap_or(1), day.unwrap_or(1)),
        };

        let hour = match (self.hour24, self.hour12) {
            (Some(hour), _) => hour,
            (None, Some(hour)) => {
                if !(1..=12).contains(&hour) {
                    return Err(RangeError::new(Field::Hour, hour, 1, 12).into());
                }
                hour % 12 + if self.pm.unwrap_or(false) { 12 } else { 0 }
            }
            (None, None) => 0,
        };

        Ok(Parsed {
            year,
            month: narrow(month),
            day: narrow(day),
            hour: narrow(hour),
            minute: narrow(self.minute.unwrap_or(0)),
            second: narrow(self.second.unwrap_or(0)),
            millisecond: narrow(self.millisecond.unwrap_or(0)),
            offset: self.offset,
        })
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    parsed: RawFields,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        let err = Error::parse(self.input, self.pos, reason);
        tracing::trace!(error = %err, "parse failed");
        err
    }

    fn item(&mut self, item: &Item, abutting: bool) -> Result<()> {
        match item {
            Item::Literal(text) => {
                if !self.rest().starts_with(text.as_str()) {
                    return Err(self.error(format!("expected '{}'", text)));
                }
                self.pos += text.len();
                Ok(())
            }
            Item::Field { letter, width } if item.is_numeric() => {
                let allow_sign = *letter == Letter::Year && !abutting;
                let value = self.number(*width, abutting, allow_sign)?;
                self.store(*letter, *width, value);
                Ok(())
            }
            Item::Field { letter: Letter::Month, .. } => {
                let index = self.name(&MONTH_NAMES, "month name")?;
                self.parsed.month = Some(index as i64 + 1);
                Ok(())
            }
            Item::Field { letter: Letter::Weekday, .. } => {
                self.name(&WEEKDAY_NAMES, "weekday name").map(|_| ())
            }
            Item::Field { letter: Letter::AmPm, .. } => {
                let rest = self.rest();
                let marker = rest.get(..2).map(str::to_ascii_uppercase);
                match marker.as_deref() {
                    Some("AM") => self.parsed.pm = Some(false),
                    Some("PM") => self.parsed.pm = Some(true),
                    _ => return Err(self.error("expected AM or PM")),
                }
                self.pos += 2;
                Ok(())
            }
            Item::Field { .. } => self.offset(),
        }
    }

    /// Read a digit run: exactly `width` digits when the next field abuts
    /// this one, otherwise as many as are present
    fn number(&mut self, width: usize, abutting: bool, allow_sign: bool) -> Result<i64> {
        let rest = self.rest();
        let negative = allow_sign && rest.starts_with('-');
        let digits_start = if negative { 1 } else { 0 };
        let available = rest[digits_start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();

        let (min, max) = if abutting { (width, width) } else { (1, MAX_FIELD_DIGITS) };
        if available < min {
            return Err(self.error(format!("expected {} digit(s)", min)));
        }
        if available > max && !abutting {
            return Err(self.error(format!("more than {} digits", max)));
        }

        let len = available.min(max);
        let text = &rest[digits_start..digits_start + len];
        let value: i64 = text.parse().map_err(|_| self.error("invalid number"))?;
        self.pos += digits_start + len;
        Ok(if negative { -value } else { value })
    }

    fn store(&mut self, letter: Letter, width: usize, value: i64) {
        let fields = &mut self.parsed;
        match letter {
            Letter::Year if width == 2 && (0..100).contains(&value) => {
                fields.year = Some(if value < TWO_DIGIT_YEAR_PIVOT { 2000 + value } else { 1900 + value });
            }
            Letter::Year => fields.year = Some(value),
            Letter::Month => fields.month = Some(value),
            Letter::Day => fields.day = Some(value),
            Letter::DayOfYear => fields.day_of_year = Some(value),
            Letter::Hour24 => fields.hour24 = Some(value),
            Letter::Hour12 => fields.hour12 = Some(value),
            Letter::Minute => fields.minute = Some(value),
            Letter::Second => fields.second = Some(value),
            Letter::Millisecond => fields.millisecond = Some(value),
            Letter::Weekday | Letter::AmPm | Letter::Offset => {}
        }
    }

    /// Match a full or three-letter English name, case-insensitively
    fn name(&mut self, names: &[&str], what: &str) -> Result<usize> {
        let rest = self.rest();
        for (index, name) in names.iter().enumerate() {
            for candidate in [*name, &name[..3]] {
                let matched = rest
                    .get(..candidate.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(candidate));
                if matched {
                    self.pos += candidate.len();
                    return Ok(index);
                }
            }
        }
        Err(self.error(format!("expected {}", what)))
    }

    fn offset(&mut self) -> Result<()> {
        let rest = self.rest();
        if rest.starts_with('Z') || rest.starts_with('z') {
            self.parsed.offset = Some(UtcOffset::UTC);
            self.pos += 1;
            return Ok(());
        }
        if !(rest.starts_with('+') || rest.starts_with('-')) {
            return Err(self.error("expected offset"));
        }
        let len = 1 + rest[1..]
            .bytes()
            .take_while(|b| b.is_ascii_digit() || *b == b':')
            .take(8)
            .count();
        let offset: UtcOffset = rest[..len]
            .parse()
            .map_err(|e: Error| self.error(e.to_string()))?;
        self.parsed.offset = Some(offset);
        self.pos += len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DateTime {
        DateTime::new(2025, 6, 5, 14, 3, 9, 7).unwrap()
    }

    #[test]
    fn test_default_matches_compiled() {
        assert_eq!(Pattern::default(), Pattern::new(DEFAULT_PATTERN).unwrap());
    }

    #[test]
    fn test_format_default() {
        let p = Pattern::default();
        assert_eq!(p.format(&sample(), UtcOffset::UTC), "2025-06-05 14:03:09");
    }

    #[test]
    fn test_format_tokens() {
        let dt = sample();
        let utc = UtcOffset::UTC;
        let fmt = |s: &str| Pattern::new(s).unwrap().format(&dt, utc);
        assert_eq!(fmt("yy/M/d"), "25/6/5");
        assert_eq!(fmt("yyyy-MM-dd HH:mm:ss.SSS"), "2025-06-05 14:03:09.007");
        assert_eq!(fmt("MMM MMMM"), "Jun June");
        assert_eq!(fmt("EEE EEEE"), "Thu Thursday");
        assert_eq!(fmt("hh:mm a"), "02:03 PM");
        assert_eq!(fmt("DDD"), "156");
        assert_eq!(fmt("'at' HH'h' ''Z''"), "at 14h '+0000'");
    }

    #[test]
    fn test_format_offset_and_midnight() {
        let dt = DateTime::new(2025, 1, 1, 0, 0, 0, 0).unwrap();
        let offset = UtcOffset::hours(-5).unwrap();
        assert_eq!(Pattern::new("h a Z").unwrap().format(&dt, offset), "12 AM -0500");
    }

    #[test]
    fn test_format_negative_year() {
        let dt = DateTime::new(-44, 3, 15, 0, 0, 0, 0).unwrap();
        assert_eq!(Pattern::new("yyyy-MM-dd").unwrap().format(&dt, UtcOffset::UTC), "-0044-03-15");
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(Pattern::new("yyyy-QQ"), Err(Error::Pattern { .. })));
        assert!(matches!(Pattern::new("'open"), Err(Error::Pattern { .. })));
        assert!(Pattern::new("").is_ok());
    }

    #[test]
    fn test_parse_default() {
        let parsed = Pattern::default().parse("2025-06-05 14:03:09").unwrap();
        assert_eq!((parsed.year, parsed.month, parsed.day), (2025, 6, 5));
        assert_eq!((parsed.hour, parsed.minute, parsed.second), (14, 3, 9));
        assert_eq!(parsed.offset, None);
    }

    #[test]
    fn test_parse_abutting_fields() {
        let parsed = Pattern::new("yyyyMMddHHmmss").unwrap().parse("20240229235958").unwrap();
        assert_eq!((parsed.year, parsed.month, parsed.day), (2024, 2, 29));
        assert_eq!((parsed.hour, parsed.minute, parsed.second), (23, 59, 58));
    }

    #[test]
    fn test_parse_loose_widths() {
        let parsed = Pattern::new("d/M/yyyy").unwrap().parse("5/6/2025").unwrap();
        assert_eq!((parsed.year, parsed.month, parsed.day), (2025, 6, 5));
    }

    #[test]
    fn test_parse_names_and_markers() {
        let p = Pattern::new("EEE, dd MMM yy hh:mm a Z").unwrap();
        let parsed = p.parse("thu, 05 jun 25 02:03 pm +05:30").unwrap();
        assert_eq!((parsed.year, parsed.month, parsed.day, parsed.hour), (2025, 6, 5, 14));
        assert_eq!(parsed.offset, Some(UtcOffset::from_seconds(19_800).unwrap()));

        let parsed = Pattern::new("MMMM d, yy").unwrap().parse("December 1, 99").unwrap();
        assert_eq!((parsed.year, parsed.month, parsed.day), (1999, 12, 1));
    }

    #[test]
    fn test_parse_day_of_year() {
        let parsed = Pattern::new("yyyy-DDD").unwrap().parse("2024-060").unwrap();
        assert_eq!((parsed.month, parsed.day), (2, 29));
        assert!(Pattern::new("yyyy-DDD").unwrap().parse("2023-366").is_err());
    }

    #[test]
    fn test_parse_errors() {
        let p = Pattern::default();
        match p.parse("2025/06/05 14:03:09") {
            Err(Error::Parse { position, .. }) => assert_eq!(position, 4),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(p.parse("2025-06-05 14:03:09 extra"), Err(Error::Parse { .. })));
        assert!(matches!(p.parse("2025-06-05"), Err(Error::Parse { .. })));
        assert!(Pattern::new("hh a").unwrap().parse("13 AM").is_err());
        assert!(Pattern::new("MMM").unwrap().parse("Foo").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let p = Pattern::new("dd.MM.yyyy").unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), r#""dd.MM.yyyy""#);
        assert!(serde_json::from_str::<Pattern>(r#""qq""#).is_err());
    }
}
