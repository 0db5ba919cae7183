use rand::Rng;

/// Items assigned to one bucket key, kept in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket<T> {
    pub key: String,
    pub items: Vec<T>,
}

/// One empty bucket per distinct key in first-seen order, plus the bucket
/// index each position of `keys` maps to. A key listed twice owns two slots.
fn empty_buckets<T>(keys: &[String]) -> (Vec<Bucket<T>>, Vec<usize>) {
    let mut buckets: Vec<Bucket<T>> = Vec::new();
    let slots = keys
        .iter()
        .map(|key| match buckets.iter().position(|b| &b.key == key) {
            Some(index) => index,
            None => {
                buckets.push(Bucket {
                    key: key.clone(),
                    items: Vec::new(),
                });
                buckets.len() - 1
            }
        })
        .collect();
    (buckets, slots)
}

/// Item `i` goes to `keys[i % keys.len()]`. With no keys nothing is returned,
/// so callers must guard against an empty key list.
pub fn round_robin<T>(items: Vec<T>, keys: &[String]) -> Vec<Bucket<T>> {
    if keys.is_empty() {
        return Vec::new();
    }
    let (mut buckets, slots) = empty_buckets(keys);
    for (index, item) in items.into_iter().enumerate() {
        buckets[slots[index % slots.len()]].items.push(item);
    }
    buckets
}

/// Each item independently lands on a uniformly random position of `keys`.
pub fn random<T, R: Rng + ?Sized>(items: Vec<T>, keys: &[String], rng: &mut R) -> Vec<Bucket<T>> {
    if keys.is_empty() {
        return Vec::new();
    }
    let (mut buckets, slots) = empty_buckets(keys);
    for item in items {
        let slot = rng.random_range(0..slots.len());
        buckets[slots[slot]].items.push(item);
    }
    buckets
}
