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

use std::fmt;
use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

/// Durable storage coordinate of a stored message.
///
/// Positions order first by segment, then by entry within the segment, so the
/// derived ordering matches storage order and can back a cumulative ack
/// watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessagePosition {
    pub segment_id: u64,
    pub entry_id: u64,
}

impl MessagePosition {
    pub fn new(segment_id: u64, entry_id: u64) -> Self {
        MessagePosition { segment_id, entry_id }
    }
}

impl Display for MessagePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.segment_id, self.entry_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(MessagePosition::new(3, 14).to_string(), "3:14");
    }

    #[test]
    fn test_ordering_by_segment_then_entry() {
        assert!(MessagePosition::new(1, 100) < MessagePosition::new(2, 0));
        assert!(MessagePosition::new(2, 1) < MessagePosition::new(2, 2));
        assert_eq!(MessagePosition::new(2, 2), MessagePosition::new(2, 2));
    }
}
