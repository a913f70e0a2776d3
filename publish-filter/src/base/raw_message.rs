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

use bytes::Bytes;
use cheetah_string::CheetahString;

/// Transient view of an encoded message on the publish path.
///
/// The broker only lends this out for the duration of the publish callback;
/// the underlying buffer is recycled afterwards. Anything that must outlive
/// the callback has to be deep-copied into a
/// [`MessageMetadataSnapshot`](crate::base::metadata_snapshot::MessageMetadataSnapshot).
pub struct RawMessage {
    properties: HashMap<CheetahString, CheetahString>,
    num_messages_in_batch: Option<u32>,
    payload: Bytes,
}

impl RawMessage {
    /// A singleton (non-batched) message.
    pub fn new(properties: HashMap<CheetahString, CheetahString>, payload: Bytes) -> Self {
        RawMessage {
            properties,
            num_messages_in_batch: None,
            payload,
        }
    }

    /// A message carrying a batch of `num_messages` entries.
    pub fn batch(
        properties: HashMap<CheetahString, CheetahString>,
        payload: Bytes,
        num_messages: u32,
    ) -> Self {
        RawMessage {
            properties,
            num_messages_in_batch: Some(num_messages),
            payload,
        }
    }

    pub fn properties(&self) -> &HashMap<CheetahString, CheetahString> {
        &self.properties
    }

    pub fn num_messages_in_batch(&self) -> Option<u32> {
        self.num_messages_in_batch
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_has_no_batch_marker() {
        let message = RawMessage::new(HashMap::new(), Bytes::from_static(b"payload"));
        assert!(message.num_messages_in_batch().is_none());
        assert_eq!(message.payload().as_ref(), b"payload");
    }

    #[test]
    fn test_batch_carries_count() {
        let message = RawMessage::batch(HashMap::new(), Bytes::new(), 3);
        assert_eq!(message.num_messages_in_batch(), Some(3));
    }
}
