// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A minimal fork-join pool: run the same task on N scoped threads and
//! wait for all of them.  Threads may borrow from the caller's stack,
//! since none of them outlives the call.

use crossbeam::thread::ScopedJoinHandle;
use crate::error::RenderError;

/// Run `task` once on each of `threads` threads, passing each its
/// worker number, and block until every one has returned.  Results come
/// back in worker order.  A panic in any worker fails the whole batch.
pub fn run_workers<F, R>(threads: usize, task: F) -> Result<Vec<R>, RenderError>
where
    F: Fn(usize) -> R + Sync,
    R: Send,
{
    let task = &task;
    crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<R>> = (0..threads)
            .map(|worker| spawner.spawn(move |_| task(worker)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().map_err(|_| RenderError::WorkerPanicked))
            .collect::<Result<Vec<R>, RenderError>>()
    })
    .map_err(|_| RenderError::WorkerPanicked)
    .and_then(|joined| joined)
}
