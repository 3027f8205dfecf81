//! Human-readable timestamps for list views

use chrono::{DateTime, Utc};

/// Short relative time for feed posts and messages
///
/// "Just now", "5m ago", "3h ago", "2d ago", then the plain date once a
/// week has passed. Timestamps in the future read as "Just now".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();

    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{}d ago", days);
    }

    short_date(then)
}

/// Day-granularity label for job postings
pub fn posted_date(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now - then).num_days() {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        _ => short_date(then),
    }
}

/// `M/D/YYYY`
pub fn short_date(ts: DateTime<Utc>) -> String {
    ts.format("%-m/%-d/%Y").to_string()
}
