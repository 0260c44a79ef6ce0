//! Duplicate-key handling for keyed reference data.
//!
//! A repeated key whose definition is identical to the first one is
//! collapsed with a warning. A repeated key with a different definition is
//! a load error: neither definition is preferred over the other.

use metabolyx_common::{MetabolyxError, Result};
use std::collections::HashMap;

/// Remove exact repeats, keeping first-declaration order.
/// Fails on the first key declared twice with differing content.
pub fn collapse_duplicates<T, F>(items: Vec<T>, kind: &'static str, key: F) -> Result<Vec<T>>
where
    T: PartialEq,
    F: Fn(&T) -> &str,
{
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for item in items {
        let id = key(&item).to_string();
        match seen.get(&id) {
            Some(&idx) if kept[idx] == item => {
                tracing::warn!("Ignoring repeated identical {kind} definition '{id}'");
            }
            Some(_) => {
                return Err(MetabolyxError::DuplicateEntry { kind, id });
            }
            None => {
                seen.insert(id, kept.len());
                kept.push(item);
            }
        }
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Entry {
        id: &'static str,
        value: u32,
    }

    fn key(e: &Entry) -> &str {
        e.id
    }

    #[test]
    fn test_identical_repeat_collapsed_in_first_position() {
        let items = vec![
            Entry { id: "a", value: 1 },
            Entry { id: "b", value: 2 },
            Entry { id: "a", value: 1 },
        ];
        let kept = collapse_duplicates(items, "entry", key).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id, "a");
        assert_eq!(kept[1].id, "b");
    }

    #[test]
    fn test_conflicting_repeat_rejected() {
        let items = vec![Entry { id: "a", value: 1 }, Entry { id: "a", value: 9 }];
        let err = collapse_duplicates(items, "entry", key).unwrap_err();
        match err {
            MetabolyxError::DuplicateEntry { kind, id } => {
                assert_eq!(kind, "entry");
                assert_eq!(id, "a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
