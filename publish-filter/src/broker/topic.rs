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
use std::sync::OnceLock;

use cheetah_string::CheetahString;
use dashmap::DashMap;

use crate::broker::subscription::Subscription;
use crate::lane::serial_lane::Lane;

/// A topic and its subscriptions, as seen by the publish-filter pipeline.
pub struct Topic {
    name: CheetahString,
    subscriptions: DashMap<CheetahString, Arc<Subscription>>,
    fallback_lane: OnceLock<Lane>,
}

impl Topic {
    pub fn new(name: impl Into<CheetahString>) -> Self {
        Topic {
            name: name.into(),
            subscriptions: DashMap::new(),
            fallback_lane: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &CheetahString {
        &self.name
    }

    pub fn add_subscription(&self, subscription: Arc<Subscription>) {
        self.subscriptions
            .insert(subscription.name().clone(), subscription);
    }

    pub fn subscription(&self, name: &str) -> Option<Arc<Subscription>> {
        self.subscriptions.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Snapshot of the current subscriptions; iteration order is unspecified.
    pub fn subscriptions(&self) -> Vec<Arc<Subscription>> {
        self.subscriptions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Shared FIFO lane for subscription work on this topic when no
    /// dispatcher is attached. Created lazily; without a tokio runtime on
    /// first use the lane starts closed and scheduling on it fails open.
    pub fn fallback_lane(&self) -> &Lane {
        self.fallback_lane
            .get_or_init(|| Lane::new(format!("topic-fallback-{}", self.name)))
    }
}
