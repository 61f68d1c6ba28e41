/// Minutes credited per playtime tick. The tick interval is ten minutes, so
/// each sighting of an online player counts as ten minutes of play.
pub const PLAYTIME_INCREMENT_MINUTES: i64 = 10;

/// Playtime after one more sighting, starting a fresh counter when `current`
/// is `None`.
pub fn next_playtime(current: Option<i64>) -> i64 {
    current.unwrap_or(0) + PLAYTIME_INCREMENT_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_starts_at_increment() {
        assert_eq!(next_playtime(None), 10);
    }

    #[test]
    fn later_sightings_add_increment() {
        assert_eq!(next_playtime(Some(30)), 40);
    }
}
