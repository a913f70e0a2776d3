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

use crate::broker::dispatcher::DispatchMode;
use crate::broker::dispatcher::Dispatcher;
use crate::broker::subscription::Subscription;
use crate::broker::topic::Topic;
use crate::lane::serial_lane::Lane;

/// Maps a subscription to the lane that serializes its delivery work.
pub struct LaneResolver;

impl LaneResolver {
    /// Returns the lane of the dispatcher currently attached to
    /// `subscription`, so that work scheduled on it never races ordinary
    /// dispatch for that subscription.
    ///
    /// When no dispatcher is attached (no consumer has connected since the
    /// topic was loaded), falls back to the topic's shared FIFO lane: weaker
    /// ordering than per-subscription, but still bounding concurrency on the
    /// topic.
    pub fn lane_for(subscription: &Subscription, topic: &Topic) -> Lane {
        match subscription.dispatch() {
            DispatchMode::MultiConsumer(dispatcher) => dispatcher.dispatch_lane().clone(),
            DispatchMode::SingleActive(dispatcher) => dispatcher.dispatch_lane().clone(),
            DispatchMode::None => topic.fallback_lane().clone(),
        }
    }
}
