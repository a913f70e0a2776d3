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

use crate::lane::serial_lane::Lane;

/// A dispatcher serializes all delivery work for one subscription.
///
/// The lane is a first-class part of the dispatcher interface: other broker
/// components schedule subscription-scoped work through [`dispatch_lane`]
/// instead of reaching into dispatcher internals, so that work never races
/// ordinary dispatch for the same subscription.
///
/// [`dispatch_lane`]: Dispatcher::dispatch_lane
pub trait Dispatcher: Send + Sync + 'static {
    /// Returns the name of the dispatcher.
    fn name(&self) -> &CheetahString;

    /// The lane this dispatcher uses to serialize delivery work.
    fn dispatch_lane(&self) -> &Lane;
}

/// Dispatcher for a subscription shared by multiple consumers.
pub struct MultiConsumerDispatcher {
    name: CheetahString,
    lane: Lane,
}

impl MultiConsumerDispatcher {
    /// Must be called from within a tokio runtime; creates the dispatch lane.
    pub fn new(subscription_name: impl Into<CheetahString>) -> Self {
        let subscription_name = subscription_name.into();
        let lane = Lane::new(format!("dispatch-multi-{subscription_name}"));
        MultiConsumerDispatcher {
            name: subscription_name,
            lane,
        }
    }
}

impl Dispatcher for MultiConsumerDispatcher {
    fn name(&self) -> &CheetahString {
        &self.name
    }

    fn dispatch_lane(&self) -> &Lane {
        &self.lane
    }
}

/// Dispatcher for a subscription with one active consumer at a time.
pub struct SingleActiveConsumerDispatcher {
    name: CheetahString,
    lane: Lane,
}

impl SingleActiveConsumerDispatcher {
    /// Must be called from within a tokio runtime; creates the dispatch lane.
    pub fn new(subscription_name: impl Into<CheetahString>) -> Self {
        let subscription_name = subscription_name.into();
        let lane = Lane::new(format!("dispatch-single-{subscription_name}"));
        SingleActiveConsumerDispatcher {
            name: subscription_name,
            lane,
        }
    }
}

impl Dispatcher for SingleActiveConsumerDispatcher {
    fn name(&self) -> &CheetahString {
        &self.name
    }

    fn dispatch_lane(&self) -> &Lane {
        &self.lane
    }
}

/// The dispatch mechanism currently attached to a subscription.
///
/// `None` until the first consumer connects after a topic load.
#[derive(Clone, Default)]
pub enum DispatchMode {
    #[default]
    None,
    MultiConsumer(Arc<MultiConsumerDispatcher>),
    SingleActive(Arc<SingleActiveConsumerDispatcher>),
}
