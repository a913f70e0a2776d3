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
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use cheetah_string::CheetahString;
use tracing::debug;
use tracing::error;
use tracing::info;

use crate::base::ack_type::AckType;
use crate::base::message_position::MessagePosition;
use crate::base::metadata_snapshot::MessageMetadataSnapshot;
use crate::base::publish_context::PublishContext;
use crate::base::raw_message::RawMessage;
use crate::broker::producer::Producer;
use crate::broker::subscription::Subscription;
use crate::broker::topic::Topic;
use crate::evaluator::FilterContext;
use crate::evaluator::FilterDecision;
use crate::evaluator::FilterEvaluator;
use crate::filter_config::FilterConfig;
use crate::hook::broker_interceptor::BrokerInterceptor;
use crate::hook::rejection_committer::RejectionCommitter;
use crate::lane::lane_resolver::LaneResolver;
use crate::metrics::filter_metrics_manager::FilterMetricsManager;

/// Context key under which the metadata snapshot travels from the publish
/// callback to the storage callback.
const FILTER_METADATA_KEY: &str = "filter-msg-metadata";

/// Publish-time filtering interceptor.
///
/// On the publish-accept path it captures a metadata snapshot when at least
/// one subscription on the topic carries a selector. Once storage confirms,
/// it schedules one filter task per subscription onto the lane serializing
/// that subscription's dispatch; tasks whose selector rejects the message
/// acknowledge it individually so it is never delivered.
pub struct PublishFilterInterceptor {
    enabled: AtomicBool,
    closed: Arc<AtomicBool>,
    evaluator: Arc<dyn FilterEvaluator>,
}

impl PublishFilterInterceptor {
    pub fn new(evaluator: Arc<dyn FilterEvaluator>) -> Self {
        PublishFilterInterceptor {
            enabled: AtomicBool::new(false),
            closed: Arc::new(AtomicBool::new(false)),
            evaluator,
        }
    }

    /// Scans the topic's subscriptions; the first one carrying a selector
    /// triggers the capture. One snapshot serves every subscription, since
    /// only the per-subscription predicate differs when the tasks run.
    fn capture_metadata(topic: &Topic, message: &RawMessage, ctx: &mut PublishContext) {
        for subscription in topic.subscriptions() {
            if !subscription.has_selector() {
                continue;
            }
            let snapshot = MessageMetadataSnapshot::capture(message);
            ctx.set_property(
                CheetahString::from_static_str(FILTER_METADATA_KEY),
                Arc::new(snapshot),
            );
            return;
        }
    }
}

impl BrokerInterceptor for PublishFilterInterceptor {
    fn interceptor_name(&self) -> &'static str {
        "PublishFilterInterceptor"
    }

    fn initialize(&self, properties: &HashMap<CheetahString, CheetahString>) {
        let config = FilterConfig::from_properties(properties);
        self.enabled
            .store(config.apply_filters_on_publish, Ordering::Release);
        info!("applyFiltersOnPublish={}", config.apply_filters_on_publish);
        FilterMetricsManager::init();
    }

    fn on_message_publish(&self, producer: &Producer, message: &RawMessage, ctx: &mut PublishContext) {
        if !self.enabled.load(Ordering::Acquire) {
            return;
        }
        if ctx.is_marker_message() || ctx.is_chunked() || ctx.number_of_messages() > 1 {
            return;
        }
        let begin = Instant::now();
        Self::capture_metadata(producer.topic(), message, ctx);
        FilterMetricsManager::record_publish_scan(producer.topic().name(), begin.elapsed());
    }

    fn on_message_stored(&self, producer: &Producer, position: MessagePosition, ctx: &PublishContext) {
        if !self.enabled.load(Ordering::Acquire) {
            return;
        }
        let Some(snapshot) = ctx.property(FILTER_METADATA_KEY) else {
            // disabled at publish time, non-singleton, or no selector anywhere
            return;
        };
        if snapshot.is_batch() {
            return;
        }
        let topic = producer.topic();
        // every subscription gets a task: the snapshot is cheap to re-check
        // against each selector, not only the one that triggered capture
        for subscription in topic.subscriptions() {
            let task = FilterTask {
                closed: Arc::clone(&self.closed),
                evaluator: Arc::clone(&self.evaluator),
                topic_name: topic.name().clone(),
                subscription: Arc::clone(&subscription),
                metadata: Arc::clone(snapshot),
                position,
            };
            let lane = LaneResolver::lane_for(&subscription, topic);
            if let Err(e) = lane.submit(move || task.run()) {
                error!(
                    "Error while scheduling filter task for subscription {} (producer {}): {}",
                    subscription.name(),
                    producer.name(),
                    e
                );
            }
        }
    }

    fn close(&self) {
        info!("Broker is shutting down. Disabling the publish filter interceptor");
        self.closed.store(true, Ordering::SeqCst);
        self.evaluator.close();
    }
}

/// One unit of filter work for one (subscription, message) pair, executed on
/// the subscription's lane.
struct FilterTask {
    closed: Arc<AtomicBool>,
    evaluator: Arc<dyn FilterEvaluator>,
    topic_name: CheetahString,
    subscription: Arc<Subscription>,
    metadata: Arc<MessageMetadataSnapshot>,
    position: MessagePosition,
}

impl FilterTask {
    fn run(self) {
        if self.closed.load(Ordering::SeqCst) {
            // enqueued before broker shutdown; drop rather than touch
            // subscription state
            return;
        }
        let begin = Instant::now();
        let context = FilterContext::new(&self.subscription, &self.metadata);
        let decision = match self.evaluator.evaluate(&context) {
            Ok(decision) => decision,
            Err(e) => {
                error!(
                    "Selector evaluation failed for subscription {}, keeping message {} deliverable: {}",
                    self.subscription.name(),
                    self.position,
                    e
                );
                FilterDecision::Accept
            }
        };
        if decision == FilterDecision::Reject {
            debug!(
                "Reject message {} for subscription {}",
                self.position,
                self.subscription.name()
            );
            if let Err(e) =
                RejectionCommitter::acknowledge(&self.subscription, self.position, AckType::Individual)
            {
                error!(
                    "Acknowledgment of rejected message {} failed for subscription {}: {}",
                    self.position,
                    self.subscription.name(),
                    e
                );
            }
        }
        FilterMetricsManager::record_filter_task(
            &self.topic_name,
            self.subscription.name(),
            begin.elapsed(),
        );
    }
}
