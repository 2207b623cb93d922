/*!
Miscellaneous numeric utilities for `goldscale`
*/

use itertools::{Itertools, MinMaxResult};

/// Get the minimum and maximum of a sequence of values, or `None` if it is empty.
///
/// NaNs compare unordered, so callers are expected to have rejected them on load.
pub fn min_max<F, I>(values: I) -> Option<(F, F)>
where
    F: Copy + PartialOrd,
    I: IntoIterator<Item = F>,
{
    match values.into_iter().minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}
