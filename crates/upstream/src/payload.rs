use apod_archive::NewEntry;
use apod_archive::entry::iso_date;
use serde::{Deserialize, Deserializer};
use time::Date;

/// One day's picture as published by the feed, before anything is archived.
///
/// Fields the archive doesn't keep (`media_type`, `hdurl`, `service_version`,
/// ...) are ignored.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct Payload {
    pub title: String,
    pub explanation: String,
    #[serde(deserialize_with = "iso_date::deserialize")]
    pub date: Date,
    /// Public domain pictures come without one.
    #[serde(default, deserialize_with = "empty_if_null")]
    pub copyright: String,
    /// The image to download.
    pub url: String,
}

impl Payload {
    /// The entry to commit once the image has been stored at `local_image_path`.
    pub fn into_entry(self, local_image_path: impl Into<String>) -> NewEntry {
        NewEntry {
            title: self.title,
            explanation: self.explanation,
            date: self.date,
            copyright: self.copyright,
            local_image_path: local_image_path.into(),
        }
    }
}

fn empty_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let json = r#"{
            "copyright": "Jane Doe",
            "date": "2024-09-18",
            "explanation": "A partial lunar eclipse.",
            "hdurl": "https://apod.nasa.gov/apod/image/2409/eclipse_hd.jpg",
            "media_type": "image",
            "service_version": "v1",
            "title": "Eclipse",
            "url": "https://apod.nasa.gov/apod/image/2409/eclipse.jpg"
        }"#;
        let payload: Payload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.date, date!(2024 - 09 - 18));
        assert_eq!(payload.copyright, "Jane Doe");
        assert_eq!(payload.url, "https://apod.nasa.gov/apod/image/2409/eclipse.jpg");
    }

    #[rstest]
    #[case(r#"{"date":"2024-09-18","explanation":"e","title":"t","url":"u"}"#)]
    #[case(r#"{"copyright":null,"date":"2024-09-18","explanation":"e","title":"t","url":"u"}"#)]
    fn test_missing_copyright_is_empty(#[case] json: &str) {
        let payload: Payload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.copyright, "");
    }

    #[rstest]
    #[case::no_title(r#"{"date":"2024-09-18","explanation":"e","url":"u"}"#)]
    #[case::no_url(r#"{"date":"2024-09-18","explanation":"e","title":"t"}"#)]
    #[case::no_date(r#"{"explanation":"e","title":"t","url":"u"}"#)]
    #[case::bad_date(r#"{"date":"18/09/2024","explanation":"e","title":"t","url":"u"}"#)]
    #[case::not_an_object(r#"[]"#)]
    fn test_decode_failures(#[case] json: &str) {
        assert!(serde_json::from_str::<Payload>(json).is_err());
    }

    #[test]
    fn test_into_entry() {
        let payload = Payload {
            title: "Eclipse".to_string(),
            explanation: "A partial lunar eclipse.".to_string(),
            date: date!(2024 - 09 - 18),
            copyright: String::new(),
            url: "https://apod.nasa.gov/apod/image/2409/eclipse.jpg".to_string(),
        };
        let entry = payload.into_entry("./storage/apod/2024-09-18.jpg");
        assert_eq!(entry.date, date!(2024 - 09 - 18));
        assert_eq!(entry.local_image_path, "./storage/apod/2024-09-18.jpg");
    }
}
