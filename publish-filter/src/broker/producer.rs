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

use crate::broker::topic::Topic;

/// A connected producer, bound to the topic it publishes to.
pub struct Producer {
    name: CheetahString,
    topic: Arc<Topic>,
}

impl Producer {
    pub fn new(name: impl Into<CheetahString>, topic: Arc<Topic>) -> Self {
        Producer {
            name: name.into(),
            topic,
        }
    }

    pub fn name(&self) -> &CheetahString {
        &self.name
    }

    pub fn topic(&self) -> &Arc<Topic> {
        &self.topic
    }
}
