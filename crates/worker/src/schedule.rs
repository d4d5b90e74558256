use chrono::{DateTime, Days, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone};

/// The next moment strictly after `now` whose wall-clock time in `now`'s
/// zone is `at`.
///
/// Landing exactly on `at` counts as already past, so a worker that wakes
/// precisely on time schedules tomorrow rather than firing twice. Days are
/// calendar days in the zone, so across a daylight-saving change the next
/// run is 23 or 25 hours away.
pub fn next_run<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let zone = now.timezone();
    let today = now.date_naive();
    let candidate = resolve(&zone, today.and_time(at));
    if candidate > *now {
        return candidate;
    }
    resolve(&zone, (today + Days::new(1)).and_time(at))
}

/// Pin a wall-clock time to an instant in `zone`.
///
/// A time repeated by a backward change resolves to its first occurrence.
/// A time skipped by a forward change is read with the offset in force
/// before the change, which lands the same distance past it.
fn resolve<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => at,
        LocalResult::None => {
            let before = zone.offset_from_utc_datetime(&(local - Days::new(1))).fix();
            zone.from_utc_datetime(&(local - before))
        },
    }
}
