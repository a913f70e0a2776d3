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

use cheetah_string::CheetahString;

use crate::base::metadata_snapshot::MessageMetadataSnapshot;
use crate::broker::subscription::Subscription;
use crate::error::PublishFilterResult;

/// Outcome of evaluating a subscription's selector against one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    Reject,
}

/// Everything a selector evaluation may inspect at the pre-dispatch stage.
///
/// No consumer is attached yet (the message has not been dispatched), and the
/// stored entry payload is not available; payload-dependent filtering is out
/// of scope on this path.
pub struct FilterContext<'a> {
    subscription: &'a Subscription,
    metadata: &'a MessageMetadataSnapshot,
    consumer: Option<&'a CheetahString>,
}

impl<'a> FilterContext<'a> {
    pub fn new(subscription: &'a Subscription, metadata: &'a MessageMetadataSnapshot) -> Self {
        FilterContext {
            subscription,
            metadata,
            consumer: None,
        }
    }

    pub fn subscription(&self) -> &Subscription {
        self.subscription
    }

    pub fn metadata(&self) -> &MessageMetadataSnapshot {
        self.metadata
    }

    pub fn consumer(&self) -> Option<&CheetahString> {
        self.consumer
    }
}

/// Selector-expression evaluation, consumed as an opaque capability.
///
/// Implementations must be thread-safe; evaluation runs on lane workers, not
/// on the publish path. An `Err` from [`evaluate`] is treated as
/// [`FilterDecision::Accept`] by the pipeline (fail-open).
///
/// [`evaluate`]: FilterEvaluator::evaluate
pub trait FilterEvaluator: Send + Sync + 'static {
    fn evaluate(&self, context: &FilterContext<'_>) -> PublishFilterResult<FilterDecision>;

    /// Releases evaluator resources at broker shutdown.
    fn close(&self) {}
}

/// Evaluator that accepts every message; stands in when no selector engine
/// is wired up.
pub struct AcceptAllEvaluator;

impl FilterEvaluator for AcceptAllEvaluator {
    fn evaluate(&self, _context: &FilterContext<'_>) -> PublishFilterResult<FilterDecision> {
        Ok(FilterDecision::Accept)
    }
}
