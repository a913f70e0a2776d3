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
use std::sync::Arc;

use cheetah_string::CheetahString;

use crate::base::metadata_snapshot::MessageMetadataSnapshot;

/// Per-publish state spanning the publish-accept and storage-confirm callbacks.
///
/// One context exists per in-flight publish. The broker fills in the publish
/// shape (marker, chunked, number of messages) before the accept callback and
/// destroys the context when the storage callback returns. The property bag
/// lets interceptors hand state from the first callback to the second; a
/// stashed snapshot is shared read-only through its `Arc`.
#[derive(Debug, Default)]
pub struct PublishContext {
    marker_message: bool,
    chunked: bool,
    number_of_messages: u32,
    properties: HashMap<CheetahString, Arc<MessageMetadataSnapshot>>,
}

impl PublishContext {
    /// Context for an ordinary singleton publish.
    pub fn singleton() -> Self {
        PublishContext {
            number_of_messages: 1,
            ..Default::default()
        }
    }

    /// Context for a publish carrying `number_of_messages` entries.
    pub fn with_number_of_messages(number_of_messages: u32) -> Self {
        PublishContext {
            number_of_messages,
            ..Default::default()
        }
    }

    pub fn set_marker_message(&mut self, marker_message: bool) {
        self.marker_message = marker_message;
    }

    pub fn set_chunked(&mut self, chunked: bool) {
        self.chunked = chunked;
    }

    pub fn is_marker_message(&self) -> bool {
        self.marker_message
    }

    pub fn is_chunked(&self) -> bool {
        self.chunked
    }

    pub fn number_of_messages(&self) -> u32 {
        self.number_of_messages
    }

    pub fn set_property(&mut self, key: CheetahString, snapshot: Arc<MessageMetadataSnapshot>) {
        self.properties.insert(key, snapshot);
    }

    pub fn property(&self, key: &str) -> Option<&Arc<MessageMetadataSnapshot>> {
        self.properties.get(key)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::base::raw_message::RawMessage;

    #[test]
    fn test_singleton_defaults() {
        let ctx = PublishContext::singleton();
        assert!(!ctx.is_marker_message());
        assert!(!ctx.is_chunked());
        assert_eq!(ctx.number_of_messages(), 1);
        assert!(ctx.property("anything").is_none());
    }

    #[test]
    fn test_property_round_trip() {
        let message = RawMessage::new(HashMap::new(), Bytes::new());
        let snapshot = Arc::new(MessageMetadataSnapshot::capture(&message));

        let mut ctx = PublishContext::singleton();
        ctx.set_property(CheetahString::from_static_str("stash"), Arc::clone(&snapshot));

        let stashed = ctx.property("stash").unwrap();
        assert!(Arc::ptr_eq(stashed, &snapshot));
    }
}
