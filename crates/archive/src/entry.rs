//! Archive entry types.
//!
//! The wire format of an entry is part of the public HTTP contract, so field
//! names are pinned with serde attributes rather than left to follow the Rust
//! names.

use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Calendar dates are always `YYYY-MM-DD` (ISO 8601 calendar date).
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Rejects anything that isn't a real date in exactly that shape, including
/// out-of-range components (`2024-13-40`), missing zero-padding and trailing
/// characters.
///
/// ```
/// use apod_archive::parse_date;
/// assert!(parse_date("2024-09-18").is_some());
/// assert!(parse_date("2024-13-40").is_none());
/// assert!(parse_date("2024-9-18").is_none());
/// ```
pub fn parse_date(input: impl AsRef<str>) -> Option<Date> {
    Date::parse(input.as_ref(), DATE_FORMAT).ok()
}

/// Serde adapter for [`Date`] using [`DATE_FORMAT`].
pub mod iso_date {
    use super::DATE_FORMAT;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = date.format(DATE_FORMAT).map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw, DATE_FORMAT).map_err(D::Error::custom)
    }
}

/// One archived picture: the metadata row plus where its image lives on disk.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Assigned by the store on insert. Never changes.
    pub id: i64,
    pub title: String,
    pub explanation: String,
    /// The natural key; unique across the archive.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// May be empty (public domain images carry no copyright).
    pub copyright: String,
    #[serde(rename = "localImagePath")]
    pub local_image_path: String,
}

/// An entry that has not been committed yet, so has no `id`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub explanation: String,
    pub date: Date,
    pub copyright: String,
    pub local_image_path: String,
}
impl NewEntry {
    /// Attach the store-assigned identifier.
    pub fn with_id(self, id: i64) -> ArchiveEntry {
        ArchiveEntry {
            id,
            title: self.title,
            explanation: self.explanation,
            date: self.date,
            copyright: self.copyright,
            local_image_path: self.local_image_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    #[rstest]
    #[case("2024-09-18", Some(date!(2024 - 09 - 18)))]
    #[case("2000-02-29", Some(date!(2000 - 02 - 29)))]
    #[case("2023-02-29", None)]
    #[case("2024-13-40", None)]
    #[case("2024-9-18", None)]
    #[case("2024-09-18T00:00:00Z", None)]
    #[case("18-09-2024", None)]
    #[case("invalid-date", None)]
    #[case("", None)]
    fn test_parse_date(#[case] input: &str, #[case] expected: Option<Date>) {
        assert_eq!(parse_date(input), expected);
    }

    #[test]
    fn test_entry_wire_format() {
        let entry = ArchiveEntry {
            id: 7,
            title: "Andromeda".to_string(),
            explanation: "A galaxy.".to_string(),
            date: date!(2024 - 09 - 18),
            copyright: String::new(),
            local_image_path: "storage/apod/2024-09-18.jpg".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Andromeda",
                "explanation": "A galaxy.",
                "date": "2024-09-18",
                "copyright": "",
                "localImagePath": "storage/apod/2024-09-18.jpg",
            })
        );
        let back: ArchiveEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
