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

use crate::base::message_position::MessagePosition;
use crate::base::publish_context::PublishContext;
use crate::base::raw_message::RawMessage;
use crate::broker::producer::Producer;

/// The `BrokerInterceptor` trait defines the interception points the broker
/// drives around its two-phase publish lifecycle.
///
/// The broker guarantees the ordering of the callbacks: `on_message_publish`
/// runs synchronously when a message is accepted for publication, before
/// durability; `on_message_stored` runs once, only after durable storage of
/// the message succeeded, with the same [`PublishContext`]. Implementations
/// must never fail either path: errors are contained and logged inside the
/// interceptor.
pub trait BrokerInterceptor: Send + Sync + 'static {
    /// Returns the name of the interceptor.
    fn interceptor_name(&self) -> &'static str;

    /// Reads configuration and registers metrics. Called once before any
    /// other callback; must tolerate missing or invalid properties.
    fn initialize(&self, properties: &HashMap<CheetahString, CheetahString>);

    /// Called synchronously on the publish-accept path. Hot path: must be
    /// non-blocking and bounded.
    fn on_message_publish(&self, producer: &Producer, message: &RawMessage, ctx: &mut PublishContext);

    /// Called once durability of the message is confirmed, never before.
    fn on_message_stored(&self, producer: &Producer, position: MessagePosition, ctx: &PublishContext);

    /// Broker shutdown notification.
    fn close(&self);
}

/// Alias for a boxed interceptor registered with the broker.
pub type BoxedBrokerInterceptor = Box<dyn BrokerInterceptor>;
