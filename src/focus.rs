//! Keyboard focus traversal across the roster.
//!
//! Pure functions over the item slice: no state beyond what items expose.
//! Removed items are skipped, and at most one item is tabbable at any stable
//! point in time.

use crate::item::Item;

/// Directional and edge navigation commands emitted by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Prev,
    First,
    Last,
}

/// Move focus one step from `current` in `direction` (+1 or -1), skipping
/// removed items. Returns the new focus index, or `None` when the scan runs
/// off the roster bound, in which case focus stays where it is.
pub fn step(items: &mut [Item], current: usize, direction: isize) -> Option<usize> {
    if current >= items.len() {
        return None;
    }

    let mut fails = 0isize;
    let target = loop {
        fails += 1;
        let candidate = current as isize + direction * fails;
        if candidate < 0 || candidate as usize >= items.len() {
            return None;
        }
        let candidate = candidate as usize;
        if !items[candidate].is_removed() {
            break candidate;
        }
    };

    items[current].make_untabbable();
    items[target].make_tabbable();
    Some(target)
}

/// Move focus to the first or last non-removed item.
///
/// The roster is scanned from the chosen end; the first live item found gets
/// focus, and the previously focused item is made untabbable when the scan
/// passes it, so two tabbable items never persist.
pub fn edge(items: &mut [Item], current: usize, from_end: bool) -> Option<usize> {
    let mut focus_set = None;
    for i in 0..items.len() {
        let j = if from_end { items.len() - (i + 1) } else { i };
        if focus_set.is_none() && !items[j].is_removed() {
            items[j].make_tabbable();
            focus_set = Some(j);
        } else if j == current {
            items[j].make_untabbable();
        }
    }
    focus_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemId, Payload};

    fn roster(removed: &[usize]) -> Vec<Item> {
        (0..4)
            .map(|i| {
                let partner = if i % 2 == 0 { i + 1 } else { i - 1 };
                let mut item = Item::new(
                    ItemId(i),
                    ItemId(partner),
                    Payload::Text(format!("face {i}")),
                    None,
                    None,
                );
                if removed.contains(&i) {
                    item.remove();
                }
                item
            })
            .collect()
    }

    #[test]
    fn step_skips_removed_items() {
        // A(removed) B C(removed) D, focus on B.
        let mut items = roster(&[0, 2]);
        items[1].make_tabbable();

        let target = step(&mut items, 1, 1);
        assert_eq!(target, Some(3));
        assert!(!items[1].is_tabbable());
        assert!(items[3].is_tabbable());
    }

    #[test]
    fn step_off_the_end_is_a_noop() {
        let mut items = roster(&[0, 2]);
        items[3].make_tabbable();

        assert_eq!(step(&mut items, 3, 1), None);
        assert!(items[3].is_tabbable());
    }

    #[test]
    fn step_backwards_skips_removed() {
        let mut items = roster(&[2]);
        items[3].make_tabbable();

        assert_eq!(step(&mut items, 3, -1), Some(1));
        assert!(items[1].is_tabbable());
    }

    #[test]
    fn edge_focuses_first_live_item_and_clears_previous() {
        let mut items = roster(&[0]);
        items[3].make_tabbable();

        let target = edge(&mut items, 3, false);
        assert_eq!(target, Some(1));
        assert!(items[1].is_tabbable());
        assert!(!items[3].is_tabbable());
    }

    #[test]
    fn edge_from_end_lands_on_last_live_item() {
        let mut items = roster(&[3]);
        items[0].make_tabbable();

        let target = edge(&mut items, 0, true);
        assert_eq!(target, Some(2));
        assert!(items[2].is_tabbable());
        assert!(!items[0].is_tabbable());
    }

    #[test]
    fn at_most_one_tabbable_after_navigation() {
        let mut items = roster(&[]);
        items[0].make_tabbable();
        step(&mut items, 0, 1);
        edge(&mut items, 1, true);

        let tabbable = items.iter().filter(|item| item.is_tabbable()).count();
        assert_eq!(tabbable, 1);
    }
}
