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
use dashmap::DashSet;
use parking_lot::Mutex;
use parking_lot::RwLock;

use crate::base::ack_type::AckType;
use crate::base::message_position::MessagePosition;
use crate::broker::dispatcher::DispatchMode;
use crate::error::PublishFilterResult;

/// Subscription property holding the selector expression, if any.
pub const SELECTOR_PROPERTY: &str = "filter.selector";

/// A durable subscription on a topic.
///
/// Carries the subscription property map (including the optional selector
/// expression), the currently attached dispatch mechanism, and the
/// acknowledgment state the standard ack path operates on. Acknowledgment is
/// idempotent: individual acks are set insertions and the cumulative
/// watermark only moves forward.
pub struct Subscription {
    topic_name: CheetahString,
    name: CheetahString,
    properties: HashMap<CheetahString, CheetahString>,
    dispatch: RwLock<DispatchMode>,
    acked_individually: DashSet<MessagePosition>,
    cumulative_watermark: Mutex<Option<MessagePosition>>,
}

impl Subscription {
    pub fn new(topic_name: impl Into<CheetahString>, name: impl Into<CheetahString>) -> Self {
        Self::with_properties(topic_name, name, HashMap::new())
    }

    pub fn with_properties(
        topic_name: impl Into<CheetahString>,
        name: impl Into<CheetahString>,
        properties: HashMap<CheetahString, CheetahString>,
    ) -> Self {
        Subscription {
            topic_name: topic_name.into(),
            name: name.into(),
            properties,
            dispatch: RwLock::new(DispatchMode::None),
            acked_individually: DashSet::new(),
            cumulative_watermark: Mutex::new(None),
        }
    }

    /// Convenience constructor for a subscription carrying a selector.
    pub fn with_selector(
        topic_name: impl Into<CheetahString>,
        name: impl Into<CheetahString>,
        selector: impl Into<CheetahString>,
    ) -> Self {
        let mut properties = HashMap::new();
        properties.insert(CheetahString::from_static_str(SELECTOR_PROPERTY), selector.into());
        Self::with_properties(topic_name, name, properties)
    }

    pub fn topic_name(&self) -> &CheetahString {
        &self.topic_name
    }

    pub fn name(&self) -> &CheetahString {
        &self.name
    }

    pub fn selector(&self) -> Option<&CheetahString> {
        self.properties.get(SELECTOR_PROPERTY)
    }

    pub fn has_selector(&self) -> bool {
        self.properties.contains_key(SELECTOR_PROPERTY)
    }

    /// The dispatch mechanism currently attached, if any.
    pub fn dispatch(&self) -> DispatchMode {
        self.dispatch.read().clone()
    }

    /// Attaches (or detaches) the dispatch mechanism. Called by the broker
    /// when consumers connect or the topic is unloaded.
    pub fn set_dispatch(&self, dispatch: DispatchMode) {
        *self.dispatch.write() = dispatch;
    }

    /// The subscription's standard acknowledgment path.
    ///
    /// `Individual` marks each given position consumed; `Cumulative` moves
    /// the watermark forward to the greatest given position. Re-acknowledging
    /// an already acknowledged position is a no-op.
    pub fn acknowledge_message(
        &self,
        positions: &[MessagePosition],
        ack_type: AckType,
    ) -> PublishFilterResult<()> {
        match ack_type {
            AckType::Individual => {
                for position in positions {
                    self.acked_individually.insert(*position);
                }
            }
            AckType::Cumulative => {
                if let Some(max) = positions.iter().max() {
                    let mut watermark = self.cumulative_watermark.lock();
                    match *watermark {
                        Some(current) if current >= *max => {}
                        _ => *watermark = Some(*max),
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether `position` has been acknowledged, individually or through the
    /// cumulative watermark.
    pub fn is_acknowledged(&self, position: &MessagePosition) -> bool {
        if self.acked_individually.contains(position) {
            return true;
        }
        matches!(*self.cumulative_watermark.lock(), Some(watermark) if *position <= watermark)
    }
}
