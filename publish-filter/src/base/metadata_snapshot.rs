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

use std::collections::HashMap;

use cheetah_string::CheetahString;

use crate::base::raw_message::RawMessage;

/// Immutable deep copy of a message's metadata, taken on the publish path.
///
/// The raw buffer handed to the publish callback is transient, so the
/// properties are copied out once and shared read-only from then on. One
/// snapshot serves every subscription on the topic; only the per-subscription
/// selector differs when the filter tasks run later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMetadataSnapshot {
    properties: HashMap<CheetahString, CheetahString>,
    num_messages_in_batch: Option<u32>,
}

impl MessageMetadataSnapshot {
    /// Deep-copies the metadata of `message`.
    pub fn capture(message: &RawMessage) -> Self {
        MessageMetadataSnapshot {
            properties: message.properties().clone(),
            num_messages_in_batch: message.num_messages_in_batch(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&CheetahString> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &HashMap<CheetahString, CheetahString> {
        &self.properties
    }

    pub fn num_messages_in_batch(&self) -> Option<u32> {
        self.num_messages_in_batch
    }

    /// Whether the message carries a batch; filtering bypasses such messages.
    pub fn is_batch(&self) -> bool {
        self.num_messages_in_batch.is_some()
    }
}
