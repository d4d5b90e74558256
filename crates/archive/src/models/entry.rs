use crate::entry::ArchiveEntry;
use time::Date;

/// Column-for-column mirror of the `apod_images` table.
#[derive(sqlx::FromRow)]
pub(crate) struct EntryRow {
    id: i64,
    title: String,
    explanation: String,
    date: Date,
    copyright: String,
    local_storage_path: String,
}
impl From<EntryRow> for ArchiveEntry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            explanation: row.explanation,
            date: row.date,
            copyright: row.copyright,
            local_image_path: row.local_storage_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_row_to_model() {
        let row = EntryRow {
            id: 42,
            title: "The Horsehead Nebula".to_string(),
            explanation: "x".repeat(8192),
            date: date!(2024 - 09 - 18),
            copyright: "Jane Doe".to_string(),
            local_storage_path: "storage/apod/2024-09-18.jpg".to_string(),
        };
        let entry = ArchiveEntry::from(row);
        assert_eq!(entry.id, 42);
        assert_eq!(entry.explanation.len(), 8192);
        assert_eq!(entry.local_image_path, "storage/apod/2024-09-18.jpg");
    }
}
