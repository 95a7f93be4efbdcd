//! Proximity windows.
//!
//! Both algorithms take one span list per sequence member, each sorted by
//! start position, and return the minimal windows that cover one span of
//! every list with a width (distance between the first and last covered
//! position) of at most `slop`. Each list is walked once.

use std::collections::VecDeque;

use crate::search::span::Span;

/// Windows for a sequence, in either order discipline.
pub fn windows(lists: &[Vec<Span>], slop: usize, ordered: bool) -> Vec<Span> {
    if ordered {
        ordered_windows(lists, slop)
    } else {
        unordered_windows(lists, slop)
    }
}

fn push(windows: &mut Vec<Span>, window: Span) {
    match windows.last_mut() {
        Some(last) if last.start == window.start => {}
        Some(last) if last.end == window.end => *last = window,
        _ => windows.push(window),
    }
}

/// Windows whose spans follow list order, each starting after the previous
/// one ends.
///
/// For every span of the first list the walk picks, in each following list,
/// the earliest span that starts after the chain so far. The cursors only
/// move forward, so the cost is linear in the total number of spans.
///
/// ```
/// use cylleneus::search::span::Span;
/// use cylleneus::search::window::ordered_windows;
///
/// let at = |positions: &[usize]| positions.iter().map(|&p| Span::new(p, p + 1)).collect();
/// let windows = ordered_windows(&[at(&[0, 3]), at(&[1]), at(&[2, 4])], 2);
/// assert_eq!(windows, vec![Span::new(0, 3)]);
/// ```
pub fn ordered_windows(lists: &[Vec<Span>], slop: usize) -> Vec<Span> {
    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };
    let mut cursors = vec![0; rest.len()];
    let mut windows = Vec::new();

    'heads: for head in first {
        let mut window = *head;
        let mut previous_end = head.end;
        for (list, cursor) in rest.iter().zip(cursors.iter_mut()) {
            while list.get(*cursor).is_some_and(|span| span.start < previous_end) {
                *cursor += 1;
            }
            let Some(span) = list.get(*cursor) else {
                break 'heads;
            };
            window = window.union(span);
            previous_end = span.end;
        }
        if window.width() <= slop {
            push(&mut windows, window);
        }
    }
    windows
}

/// Windows covering every list in any order. Spans of different lists may
/// share positions.
///
/// A sliding minimum-cover window over the merged spans: the right edge
/// takes one span at a time and the left edge drops spans whose list stays
/// covered without them.
pub fn unordered_windows(lists: &[Vec<Span>], slop: usize) -> Vec<Span> {
    if lists.is_empty() || lists.iter().any(Vec::is_empty) {
        return Vec::new();
    }
    let mut events: Vec<(Span, usize)> = lists
        .iter()
        .enumerate()
        .flat_map(|(list, spans)| spans.iter().map(move |span| (*span, list)))
        .collect();
    events.sort_by_key(|(span, list)| (span.start, span.end, *list));

    let mut counts = vec![0usize; lists.len()];
    let mut covered = 0;
    let mut structural = 0;
    let mut left = 0;
    // Event indices in the window with decreasing end.
    let mut furthest: VecDeque<usize> = VecDeque::new();
    let mut windows = Vec::new();

    for right in 0..events.len() {
        let (span, list) = events[right];
        if counts[list] == 0 {
            covered += 1;
        }
        counts[list] += 1;
        structural += usize::from(span.structural);
        while furthest.back().is_some_and(|&i| events[i].0.end <= span.end) {
            furthest.pop_back();
        }
        furthest.push_back(right);

        if covered < lists.len() {
            continue;
        }
        while counts[events[left].1] > 1 {
            counts[events[left].1] -= 1;
            structural -= usize::from(events[left].0.structural);
            left += 1;
        }
        while furthest.front().is_some_and(|&i| i < left) {
            furthest.pop_front();
        }

        let first = events[left].0;
        let last = furthest.front().map_or(span, |&i| events[i].0);
        let window = Span {
            start: first.start,
            end: last.end,
            startchar: first.startchar,
            endchar: last.endchar,
            structural: structural > 0,
        };
        if window.width() <= slop {
            push(&mut windows, window);
        }
    }
    windows
}
