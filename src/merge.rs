use crate::types::Section;

/// Fold one incoming page of sections into the accumulated feed.
///
/// The first page seeds the feed verbatim. After that, accumulated sections
/// keep their positions: a section whose `order` matches an incoming one gets
/// the incoming items appended (duplicates and all), an unmatched section
/// passes through untouched. Incoming sections with no accumulated
/// counterpart are dropped. When several incoming sections share an `order`,
/// the first match wins; the rest are unspecified.
///
/// Pure: no shared state, deterministic in its two inputs.
pub fn merge_sections(accumulated: &[Section], incoming: &[Section]) -> Vec<Section> {
    if accumulated.is_empty() {
        return incoming.to_vec();
    }

    accumulated
        .iter()
        .map(|existing| {
            let matched = incoming.iter().find(|fresh| fresh.order == existing.order);
            match matched {
                Some(fresh) => {
                    let mut section = existing.clone();
                    section.items.extend(fresh.items.iter().cloned());
                    section
                }
                None => existing.clone(),
            }
        })
        .collect()
}
