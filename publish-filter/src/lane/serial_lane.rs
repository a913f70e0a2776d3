// Copyright 2024 The Publish Filter Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use cheetah_string::CheetahString;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use crate::error::PublishFilterError;
use crate::error::PublishFilterResult;

type LaneTask = Box<dyn FnOnce() + Send + 'static>;

/// A serialized, single-worker execution context.
///
/// Tasks submitted to a lane run one at a time, in submission order, on a
/// dedicated worker task. A lane is the sole synchronization primitive for
/// the subscription-scoped work scheduled onto it: two tasks on the same lane
/// never run concurrently.
///
/// Cloning a `Lane` yields another handle to the same worker.
#[derive(Clone)]
pub struct Lane {
    inner: Arc<LaneInner>,
}

struct LaneInner {
    name: CheetahString,
    tx: Mutex<Option<UnboundedSender<LaneTask>>>,
}

impl Lane {
    /// Creates a lane and spawns its worker onto the current tokio runtime.
    ///
    /// The worker lives until the lane is closed and its queue drained. When
    /// no runtime is available the lane starts closed: every submission fails
    /// with [`PublishFilterError::LaneClosed`] instead of panicking into the
    /// caller.
    pub fn new(name: impl Into<CheetahString>) -> Self {
        let name = name.into();
        let tx = match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let (tx, mut rx) = mpsc::unbounded_channel::<LaneTask>();
                handle.spawn(async move {
                    while let Some(task) = rx.recv().await {
                        task();
                    }
                });
                Some(tx)
            }
            Err(_) => {
                error!("No tokio runtime available, lane {} starts closed", name);
                None
            }
        };
        Lane {
            inner: Arc::new(LaneInner {
                name,
                tx: Mutex::new(tx),
            }),
        }
    }

    pub fn name(&self) -> &CheetahString {
        &self.inner.name
    }

    /// Enqueues `task` behind everything already submitted.
    ///
    /// Fails with [`PublishFilterError::LaneClosed`] once the lane has been
    /// closed or its worker is gone.
    pub fn submit<F>(&self, task: F) -> PublishFilterResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let guard = self.inner.tx.lock();
        match guard.as_ref() {
            Some(tx) => tx
                .send(Box::new(task))
                .map_err(|_| PublishFilterError::lane_closed(self.inner.name.clone())),
            None => Err(PublishFilterError::lane_closed(self.inner.name.clone())),
        }
    }

    /// Stops accepting new tasks. Tasks already queued still run.
    pub fn close(&self) {
        self.inner.tx.lock().take();
    }

    /// Whether two handles refer to the same worker.
    pub fn same_lane(&self, other: &Lane) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
