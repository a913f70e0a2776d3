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

//! Publish-time per-subscription message filtering for a message broker.
//!
//! The pipeline hooks into the broker's two-phase publish lifecycle. On the
//! synchronous publish-accept path it captures an immutable snapshot of the
//! message metadata when at least one subscription on the topic carries a
//! selector. Once durable storage is confirmed it schedules one filter task
//! per subscription onto the lane that already serializes that subscription's
//! dispatch work; tasks whose selector rejects the message acknowledge it
//! individually so no consumer ever sees it.
//!
//! All failure modes are contained inside the pipeline: an error can make a
//! rejectable message deliverable (fail-open) but never the other way around,
//! and nothing propagates back into the broker's publish or storage path.

pub mod base;
pub mod broker;
pub mod error;
pub mod evaluator;
pub mod filter_config;
pub mod hook;
pub mod lane;
pub mod metrics;

pub use base::ack_type::AckType;
pub use base::message_position::MessagePosition;
pub use base::metadata_snapshot::MessageMetadataSnapshot;
pub use base::publish_context::PublishContext;
pub use base::raw_message::RawMessage;
pub use error::PublishFilterError;
pub use error::PublishFilterResult;
pub use evaluator::FilterContext;
pub use evaluator::FilterDecision;
pub use evaluator::FilterEvaluator;
pub use filter_config::FilterConfig;
pub use hook::broker_interceptor::BoxedBrokerInterceptor;
pub use hook::broker_interceptor::BrokerInterceptor;
pub use hook::publish_filter_interceptor::PublishFilterInterceptor;
