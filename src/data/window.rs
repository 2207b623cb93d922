/*!
Sliding lookback windows over a sequence
*/
use crate::*;
use std::iter::FusedIterator;

/// All `(window, next)` pairs of a sequence for a fixed lookback.
///
/// Windows slide one step at a time. The last window stops one step short of the end of the sequence, so a
/// sequence of length `n` yields `n - lookback - 1` pairs. Iterating is lazy and may be restarted any number of
/// times with [`Windows::iter`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Windows<'a, T> {
    items: &'a [T],
    lookback: usize,
}

/// Window a sequence with a given lookback, failing if the sequence is not longer than the lookback
pub fn window<T>(items: &[T], lookback: usize) -> Result<Windows<'_, T>> {
    if lookback == 0 {
        return Err(Error::ZeroLookback);
    }
    if items.len() <= lookback {
        return Err(Error::InsufficientLength {
            len: items.len(),
            lookback,
        });
    }
    Ok(Windows { items, lookback })
}

impl<'a, T> Windows<'a, T> {
    /// The lookback of these windows
    #[inline]
    pub fn lookback(&self) -> usize {
        self.lookback
    }
    /// The number of pairs these windows yield
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len() - self.lookback - 1
    }
    /// Whether these windows yield no pairs at all, which happens when the sequence is exactly one step longer than
    /// the lookback
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Iterate over the windows from the start
    #[inline]
    pub fn iter(&self) -> WindowIter<'a, T> {
        WindowIter {
            items: self.items,
            lookback: self.lookback,
            start: 0,
            end: self.len(),
        }
    }
}

impl<'a, T> IntoIterator for Windows<'a, T> {
    type Item = (&'a [T], &'a T);
    type IntoIter = WindowIter<'a, T>;
    fn into_iter(self) -> WindowIter<'a, T> {
        self.iter()
    }
}

impl<'a, 'b, T> IntoIterator for &'b Windows<'a, T> {
    type Item = (&'a [T], &'a T);
    type IntoIter = WindowIter<'a, T>;
    fn into_iter(self) -> WindowIter<'a, T> {
        self.iter()
    }
}

/// An iterator over `(window, next)` pairs
#[derive(Debug, Clone)]
pub struct WindowIter<'a, T> {
    items: &'a [T],
    lookback: usize,
    start: usize,
    end: usize,
}

impl<'a, T> Iterator for WindowIter<'a, T> {
    type Item = (&'a [T], &'a T);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }
        let i = self.start;
        self.start += 1;
        Some((&self.items[i..i + self.lookback], &self.items[i + self.lookback]))
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for WindowIter<'a, T> {}

impl<'a, T> FusedIterator for WindowIter<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_with_lookback_three() {
        let series: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let windows = window(&series, 3).unwrap();
        assert_eq!(windows.len(), 6);
        let pairs: Vec<_> = windows.iter().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], (&series[0..3], &series[3]));
        // The last target is one step before the end
        assert_eq!(pairs[5], (&series[5..8], &series[8]));
    }

    #[test]
    fn windows_restart() {
        let series = [1, 2, 3, 4, 5];
        let windows = window(&series, 2).unwrap();
        let first: Vec<_> = windows.iter().map(|(_, next)| *next).collect();
        let second: Vec<_> = (&windows).into_iter().map(|(_, next)| *next).collect();
        assert_eq!(first, vec![3, 4]);
        assert_eq!(first, second);
        let mut iter = windows.iter();
        assert_eq!(iter.len(), 2);
        iter.next();
        assert_eq!(iter.len(), 1);
    }

    #[test]
    fn short_series_fail() {
        let series = [1.0, 2.0, 3.0];
        match window(&series, 3) {
            Err(Error::InsufficientLength {
                len: 3,
                lookback: 3,
            }) => {}
            other => panic!("Expected insufficient length, got {:?}", other),
        }
        assert!(matches!(window(&series, 0), Err(Error::ZeroLookback)));
        // One step longer than the lookback: valid, but nothing to yield
        assert!(window(&series, 2).unwrap().is_empty());
    }
}
