//! Key-value slice sorting.

/// Sorts a slice of key-value pairs in-place by key using insertion sort.
/// Stable, so pairs with equal keys keep their relative order.
pub fn kv_slice(kv: &mut [(String, String)]) {
    for i in 1..kv.len() {
        let mut j = i;
        while j > 0 && kv[j].0.as_bytes() < kv[j - 1].0.as_bytes() {
            kv.swap(j, j - 1);
            j -= 1;
        }
    }
}
