use rayon::prelude::*;
use std::ops::Range;

// Below this many candidates the rayon split costs more than the search.
const PAR_THRESHOLD: usize = 1024;

/// Returns the first index of `range` with the smallest key, or `None` for an
/// empty range. Parallel and sequential searches pick the same index.
pub fn first_min_by_key<F>(range: Range<usize>, f: F) -> Option<usize>
        where F: Fn(usize) -> u32 + Sync + Send {
    if range.len() >= PAR_THRESHOLD {
        range.into_par_iter()
            .map(|i| (f(i), i))
            .min()
            .map(|m| m.1)
    } else {
        min_by_key_seq(range, f)
    }
}

fn min_by_key_seq<F>(mut range: Range<usize>, f: F) -> Option<usize>
        where F: Fn(usize) -> u32 {
    range.next().map(|mut min| {
        let mut min_val = f(min);
        for i in range {
            let val = f(i);
            if val < min_val {
                min_val = val;
                min = i;
            }
        }
        min
    })
}
