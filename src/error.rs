// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The renderer has almost nothing that can go wrong at runtime.  All
//! of its inputs are fixed at startup, so the only failures are a bad
//! configuration, caught before any thread is spawned, and a worker
//! thread dying mid-frame, which ends the run.

/// Everything the rendering core can report back to its caller.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// A dimension, count, or the noise size was unusable.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// A render worker panicked before the frame was finished.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

impl RenderError {
    pub(crate) fn config<S: Into<String>>(reason: S) -> Self {
        RenderError::InvalidConfig(reason.into())
    }
}
