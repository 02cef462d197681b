//! Attribute-combination expansion.
//!
//! A variable product with attributes `Color = [red, blue]` and
//! `Size = [s, m, l]` gets one variation per combination, six in total.

/// Every combination of one value per key.
///
/// Keys with no values are skipped. With no keys left the result is empty
/// (there is no "empty combination"). Combinations come out in odometer
/// order: the first key changes slowest and the last key fastest.
///
/// ```
/// use smoothgen_generator::cartesian_product;
///
/// let combos = cartesian_product(&[
///     ("color", vec!["red", "blue"]),
///     ("size", vec!["s", "m"]),
/// ]);
/// assert_eq!(combos, vec![
///     vec![("color", "red"), ("size", "s")],
///     vec![("color", "red"), ("size", "m")],
///     vec![("color", "blue"), ("size", "s")],
///     vec![("color", "blue"), ("size", "m")],
/// ]);
/// ```
#[must_use]
pub fn cartesian_product<K: Clone, V: Clone>(input: &[(K, Vec<V>)]) -> Vec<Vec<(K, V)>> {
    let mut axes = input.iter().filter(|(_, values)| !values.is_empty()).peekable();
    if axes.peek().is_none() {
        return Vec::new();
    }

    let mut combinations: Vec<Vec<(K, V)>> = vec![Vec::new()];
    for (key, values) in axes {
        combinations = combinations
            .into_iter()
            .flat_map(|prefix| {
                values.iter().map(move |value| {
                    let mut combination = prefix.clone();
                    combination.push((key.clone(), value.clone()));
                    combination
                })
            })
            .collect();
    }

    combinations
}
