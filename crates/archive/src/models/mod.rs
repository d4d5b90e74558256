mod entry;

pub(crate) use self::entry::EntryRow;
