//! Error-driven refinement: repeatedly split the worst-fitting box.

use tracing::{debug, trace, warn};

use super::queue::RefineQueue;
use crate::pdmap::PdMap;
use crate::regress::{Aof, Regressor};

/// Fit every box of `map` and queue each one that can still be cut.
///
/// Returns an empty queue and leaves `map` untouched when the regressor's AOF
/// is defined over a different domain.
pub fn evaluate<A: Aof + ?Sized>(map: &mut PdMap, regressor: &mut Regressor<'_, A>) -> RefineQueue {
    let pinned_from = map.size();
    evaluate_pinned(map, regressor, pinned_from)
}

/// Like `evaluate`, but boxes from index `pinned_from` on are fit without being
/// queued, so refinement never cuts them.
pub fn evaluate_pinned<A: Aof + ?Sized>(
    map: &mut PdMap,
    regressor: &mut Regressor<'_, A>,
    pinned_from: usize,
) -> RefineQueue {
    let mut queue = RefineQueue::new();
    if !same_domain(map, regressor) {
        warn!("regressor domain differs from the map domain; nothing evaluated");
        return queue;
    }
    for ix in 0..map.size() {
        let Some(b) = map.box_at_mut(ix) else {
            continue;
        };
        let err = regressor.fit(b);
        if ix < pinned_from && !b.is_point_box() {
            queue.push(ix, err);
        }
    }
    debug!(pieces = map.size(), queued = queue.len(), "evaluated pieces");
    queue
}

/// Cut the worst box along its longest extent until `budget` cuts are made,
/// the queue runs dry, or the worst error is at most `threshold`.
///
/// The cut box keeps the lower half in place; the upper half is appended.
/// Both halves are refit and requeued unless they are point boxes. The grid
/// is rebuilt once at the end. Returns the number of cuts; an empty map or a
/// zero budget is left untouched, as is a map over a different domain than
/// the regressor's AOF.
pub fn refine<A: Aof + ?Sized>(
    map: &mut PdMap,
    queue: &mut RefineQueue,
    regressor: &mut Regressor<'_, A>,
    budget: usize,
    threshold: f64,
) -> usize {
    if map.is_empty() || budget == 0 {
        return 0;
    }
    if !same_domain(map, regressor) {
        warn!("regressor domain differs from the map domain; refinement skipped");
        return 0;
    }
    let mut cuts = 0;
    while cuts < budget {
        match queue.peek_err() {
            Some(err) if err > threshold => {}
            _ => break,
        }
        let Some((ix, err)) = queue.pop() else {
            break;
        };
        if ix >= map.size() {
            warn!(ix, size = map.size(), "skipping queue entry past the end of the map");
            continue;
        }
        let Some(b) = map.box_at_mut(ix) else {
            continue;
        };
        let k = b.longest_extent();
        let Some(mut upper) = b.cut(k) else {
            trace!(ix, "queued point box, nothing to cut");
            continue;
        };
        let err_lower = regressor.fit(b);
        let lower_done = b.is_point_box();
        let err_upper = regressor.fit(&mut upper);
        let upper_done = upper.is_point_box();
        let new_ix = map.append(upper);
        if !lower_done {
            queue.push(ix, err_lower);
        }
        if !upper_done {
            queue.push(new_ix, err_upper);
        }
        cuts += 1;
        trace!(ix, new_ix, dim = k, err, err_lower, err_upper, "cut");
    }
    map.update_grid();
    debug!(cuts, pieces = map.size(), "smart refinement done");
    cuts
}

fn same_domain<A: Aof + ?Sized>(map: &PdMap, regressor: &Regressor<'_, A>) -> bool {
    *regressor.aof().domain() == **map.domain()
}
