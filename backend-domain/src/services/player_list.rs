use crate::entities::PlayerCounts;

const COUNTS_PREFIX: &str = "There are ";
const COUNTS_MIDDLE: &str = " of a max of ";
const COUNTS_SUFFIX: &str = " players online";

/// Extracts player names from a `list` reply such as
/// `There are 2 of a max of 20 players online: alice, bob`.
///
/// Names follow the first colon and are separated by commas or newlines.
/// A reply without that section yields an empty list.
pub fn parse_player_list(response: &str) -> Vec<String> {
    let Some((_, after_colon)) = response.split_once(':') else {
        return Vec::new();
    };
    after_colon
        .split(|c: char| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Reads the `There are %d of a max of %d players online` header.
///
/// The whole header must match: a reply with different trailing words yields
/// `None`, even though both numbers were already read.
pub fn parse_player_counts(response: &str) -> Option<PlayerCounts> {
    let rest = response.trim_start().strip_prefix(COUNTS_PREFIX)?;
    let (online, rest) = take_number(rest)?;
    let rest = rest.strip_prefix(COUNTS_MIDDLE)?;
    let (max, rest) = take_number(rest)?;
    if !rest.starts_with(COUNTS_SUFFIX) {
        return None;
    }
    Some(PlayerCounts { online, max })
}

fn take_number(input: &str) -> Option<(u32, &str)> {
    let end = input
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    let value = input[..end].parse().ok()?;
    Some((value, &input[end..]))
}
