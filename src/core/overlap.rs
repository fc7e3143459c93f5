/// Bucket keywords recognized in ticket sizes and funding asks.
///
/// Order matters for reporting only; the first shared keyword is the one named
/// in the alignment point.
pub const TICKET_BUCKETS: [&str; 8] = [
    "pre-seed", "seed", "angel", "early", "series a", "series b", "series c", "growth",
];

/// Case-insensitive substring containment in either direction.
///
/// Blank values never match: an empty string is a substring of everything.
#[inline]
pub fn contains_either_way(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// First pair `(left, right)` that overlaps under [`contains_either_way`]
pub fn first_overlap<'a, L, R>(left: L, right: R) -> Option<(&'a str, &'a str)>
where
    L: IntoIterator<Item = &'a str>,
    R: IntoIterator<Item = &'a str> + Clone,
{
    left.into_iter().find_map(|l| {
        right
            .clone()
            .into_iter()
            .find(|r| contains_either_way(l, r))
            .map(|r| (l, r))
    })
}

/// First ticket bucket keyword mentioned by both strings
pub fn shared_ticket_bucket(ticket_size: &str, funding_ask: &str) -> Option<&'static str> {
    let ticket = ticket_size.to_lowercase();
    let ask = funding_ask.to_lowercase();
    TICKET_BUCKETS
        .iter()
        .copied()
        .find(|bucket| ticket.contains(bucket) && ask.contains(bucket))
}

/// Leading integer of a free-text deal count ("12", "12+", "5-10 deals")
pub fn parse_deal_count(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[inline]
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
