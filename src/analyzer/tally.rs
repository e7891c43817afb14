use std::collections::HashMap;

/// Count occurrences and rank them by descending count
/// Ties keep the order in which each key was first seen (stable sort)
pub fn rank_by_frequency<I>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let (mut ranked, _) = items.into_iter().fold(
        (Vec::<(String, usize)>::new(), HashMap::<String, usize>::new()),
        |(mut ranked, mut slots), item| {
            match slots.get(&item) {
                Some(&slot) => ranked[slot].1 += 1,
                None => {
                    slots.insert(item.clone(), ranked.len());
                    ranked.push((item, 1));
                }
            }
            (ranked, slots)
        },
    );

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
