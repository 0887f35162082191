// src/extractors/headers.rs
use std::collections::{HashMap, HashSet};

/// Ensures headers are unique by appending an occurrence counter to repeats.
///
/// The first occurrence is kept as-is, the second becomes `"name (2)"`, the
/// third `"name (3)"` and so on. A counter that would reproduce a name already
/// in the output is bumped until the name is free.
pub fn make_headers_unique(headers: &[String]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());

    headers
        .iter()
        .map(|col| {
            let count = seen.entry(col.as_str()).or_insert(0);
            *count += 1;

            let name = if *count == 1 && !taken.contains(col) {
                col.clone()
            } else {
                let mut n = (*count).max(2);
                loop {
                    let candidate = format!("{} ({})", col, n);
                    if !taken.contains(&candidate) {
                        *count = n;
                        break candidate;
                    }
                    n += 1;
                }
            };

            taken.insert(name.clone());
            name
        })
        .collect()
}

/// `"Column 1"` .. `"Column n"`
pub fn placeholder_headers(n: usize) -> Vec<String> {
    (1..=n).map(|j| format!("Column {}", j)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn repeats_get_occurrence_counter() {
        let headers = strings(&["A", "A", "B", "A"]);
        assert_eq!(
            make_headers_unique(&headers),
            strings(&["A", "A (2)", "B", "A (3)"])
        );
    }

    #[test]
    fn unique_headers_pass_through() {
        let headers = strings(&["Year", "Team", "Wins"]);
        assert_eq!(make_headers_unique(&headers), headers);
        assert!(make_headers_unique(&[]).is_empty());
    }

    #[test]
    fn empty_names_are_counted_too() {
        let headers = strings(&["", ""]);
        assert_eq!(make_headers_unique(&headers), strings(&["", " (2)"]));
    }

    #[test]
    fn generated_names_never_collide_with_literal_ones() {
        let headers = strings(&["A", "A", "A (2)"]);
        assert_eq!(
            make_headers_unique(&headers),
            strings(&["A", "A (2)", "A (2) (2)"])
        );

        let headers = strings(&["A (2)", "A", "A", "A"]);
        assert_eq!(
            make_headers_unique(&headers),
            strings(&["A (2)", "A", "A (3)", "A (4)"])
        );
    }

    #[test]
    fn output_is_always_duplicate_free() {
        let headers = strings(&["x", "x (2)", "x", "x (3)", "x", "x (2)"]);
        let unique = make_headers_unique(&headers);
        let distinct: HashSet<&String> = unique.iter().collect();
        assert_eq!(unique.len(), headers.len());
        assert_eq!(distinct.len(), unique.len());
    }

    #[test]
    fn placeholders_are_one_based() {
        assert_eq!(
            placeholder_headers(3),
            strings(&["Column 1", "Column 2", "Column 3"])
        );
        assert!(placeholder_headers(0).is_empty());
    }
}
