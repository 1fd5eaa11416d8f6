//! Page-index window for the pager widget.

/// Page numbers shown around the current page.
pub const PAGE_RANGE_DISPLAYED: u32 = 3;
/// Page numbers always shown at each end.
pub const MARGIN_PAGES_DISPLAYED: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerItem {
    Previous { enabled: bool },
    Page { number: u32, current: bool },
    Break,
    Next { enabled: bool },
}

/// Layout the pager for `current` of `total` pages.
///
/// Returns nothing for zero or one page. `current` is clamped into range.
pub fn pager_items(current: u32, total: u32) -> Vec<PagerItem> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    let mut items = vec![PagerItem::Previous {
        enabled: current > 1,
    }];

    let mut last_shown = 0;
    for number in 1..=total {
        if is_visible(number, current, total) {
            if number > last_shown + 1 {
                items.push(PagerItem::Break);
            }
            items.push(PagerItem::Page {
                number,
                current: number == current,
            });
            last_shown = number;
        }
    }

    items.push(PagerItem::Next {
        enabled: current < total,
    });
    items
}

fn is_visible(number: u32, current: u32, total: u32) -> bool {
    if total <= PAGE_RANGE_DISPLAYED + 2 * MARGIN_PAGES_DISPLAYED {
        return true;
    }
    if number <= MARGIN_PAGES_DISPLAYED || number > total - MARGIN_PAGES_DISPLAYED {
        return true;
    }

    let (start, end) = window(current, total);
    (start..=end).contains(&number)
}

fn window(current: u32, total: u32) -> (u32, u32) {
    let half = PAGE_RANGE_DISPLAYED / 2;
    let end = (current.saturating_sub(half).max(1) + PAGE_RANGE_DISPLAYED - 1).min(total);
    let start = end.saturating_sub(PAGE_RANGE_DISPLAYED - 1).max(1);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn numbers(items: &[PagerItem]) -> Vec<Option<u32>> {
        items
            .iter()
            .filter_map(|item| match item {
                PagerItem::Page { number, .. } => Some(Some(*number)),
                PagerItem::Break => Some(None),
                _ => None,
            })
            .collect()
    }

    #[rstest]
    #[case(1, 0)]
    #[case(1, 1)]
    fn test_hidden_for_single_page(#[case] current: u32, #[case] total: u32) {
        assert!(pager_items(current, total).is_empty());
    }

    #[test]
    fn test_three_pages_all_visible() {
        let items = pager_items(1, 3);
        assert_eq!(numbers(&items), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(items.first(), Some(&PagerItem::Previous { enabled: false }));
        assert_eq!(items.last(), Some(&PagerItem::Next { enabled: true }));
        assert!(items.contains(&PagerItem::Page { number: 1, current: true }));
    }

    #[rstest]
    #[case(1, vec![Some(1), Some(2), Some(3), None, Some(20)])]
    #[case(10, vec![Some(1), None, Some(9), Some(10), Some(11), None, Some(20)])]
    #[case(20, vec![Some(1), None, Some(18), Some(19), Some(20)])]
    #[case(3, vec![Some(1), Some(2), Some(3), Some(4), None, Some(20)])]
    fn test_window_with_breaks(#[case] current: u32, #[case] expected: Vec<Option<u32>>) {
        assert_eq!(numbers(&pager_items(current, 20)), expected);
    }

    #[test]
    fn test_out_of_range_current_is_clamped() {
        let items = pager_items(99, 3);
        assert_eq!(items.last(), Some(&PagerItem::Next { enabled: false }));
        assert!(items.contains(&PagerItem::Page { number: 3, current: true }));
    }
}
