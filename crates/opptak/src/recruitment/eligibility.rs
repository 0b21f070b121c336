use std::collections::HashSet;

use super::domain::{committee_key, Period};

/// Committees of `period` the user belongs to.
///
/// Matching ignores case and surrounding whitespace. The result keeps the
/// period's spelling and order (required before optional) without
/// duplicates; an empty result just means the user has no role here.
pub fn eligible_committees<'a, I>(user_committees: I, period: &Period) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let memberships: HashSet<String> = user_committees
        .into_iter()
        .map(committee_key)
        .collect();
    let mut emitted = HashSet::new();

    period
        .all_committees()
        .filter(|committee| {
            let key = committee_key(committee);
            memberships.contains(&key) && emitted.insert(key)
        })
        .map(str::to_string)
        .collect()
}
