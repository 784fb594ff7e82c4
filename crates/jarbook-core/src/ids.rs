//! Record id generation
//!
//! Ids are the creation time in milliseconds since the Unix epoch, rendered as
//! decimal text. Two records created in the same millisecond would collide, so
//! the new id is bumped past the largest numeric id already in use.

use chrono::Utc;

/// Generate an id that is unique among `existing`
pub fn timestamp_id<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let now = Utc::now().timestamp_millis();
    let newest = existing
        .into_iter()
        .filter_map(|id| id.parse::<i64>().ok())
        .max();

    let id = match newest {
        Some(newest) if newest >= now => newest.saturating_add(1),
        _ => now,
    };
    id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_numeric_and_unique() {
        let mut ids: Vec<String> = Vec::new();
        for _ in 0..50 {
            let id = timestamp_id(ids.iter().map(String::as_str));
            assert!(id.parse::<i64>().is_ok());
            assert!(!ids.contains(&id));
            ids.push(id);
        }
    }

    #[test]
    fn test_future_ids_are_bumped() {
        let far_future = "99999999999999";
        let id = timestamp_id([far_future, "custom-id"]);
        assert_eq!(id, "100000000000000");
    }
}
