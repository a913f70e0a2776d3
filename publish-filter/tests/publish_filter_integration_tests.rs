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

//! End-to-end tests driving the interceptor through the two-phase publish
//! lifecycle the way the embedding broker would.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use cheetah_string::CheetahString;
use publish_filter::broker::producer::Producer;
use publish_filter::broker::subscription::Subscription;
use publish_filter::broker::topic::Topic;
use publish_filter::BrokerInterceptor;
use publish_filter::FilterContext;
use publish_filter::FilterDecision;
use publish_filter::FilterEvaluator;
use publish_filter::MessagePosition;
use publish_filter::PublishContext;
use publish_filter::PublishFilterInterceptor;
use publish_filter::PublishFilterResult;
use publish_filter::RawMessage;

/// Evaluates selectors of the shape `key = 'value'` against the snapshot
/// properties. Subscriptions without a selector accept everything.
struct EqualitySelectorEvaluator;

impl FilterEvaluator for EqualitySelectorEvaluator {
    fn evaluate(&self, context: &FilterContext<'_>) -> PublishFilterResult<FilterDecision> {
        let Some(selector) = context.subscription().selector() else {
            return Ok(FilterDecision::Accept);
        };
        let (key, expected) = selector
            .as_str()
            .split_once('=')
            .expect("selector shape key = 'value'");
        let expected = expected.trim().trim_matches('\'');
        let matches = context
            .metadata()
            .property(key.trim())
            .map(|actual| actual.as_str() == expected)
            .unwrap_or(false);
        if matches {
            Ok(FilterDecision::Accept)
        } else {
            Ok(FilterDecision::Reject)
        }
    }
}

fn message_with_color(color: &'static str) -> RawMessage {
    let mut properties = HashMap::new();
    properties.insert(
        CheetahString::from_static_str("color"),
        CheetahString::from_static_str(color),
    );
    RawMessage::new(properties, Bytes::from_static(b"body"))
}

fn interceptor() -> PublishFilterInterceptor {
    let interceptor = PublishFilterInterceptor::new(Arc::new(EqualitySelectorEvaluator));
    interceptor.initialize(&HashMap::new());
    interceptor
}

async fn drain_fallback_lane(topic: &Topic) {
    let (tx, rx) = tokio::sync::oneshot::channel();
    topic
        .fallback_lane()
        .submit(move || {
            let _ = tx.send(());
        })
        .unwrap();
    rx.await.unwrap();
}

/// Scenario A: S1 has selector `color = 'red'`, S2 has none. A message with
/// `color=blue` is auto-acknowledged for S1 and left deliverable for S2.
#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_message_is_acked_before_delivery() {
    let topic = Arc::new(Topic::new("topic-t"));
    let s1 = Arc::new(Subscription::with_selector("topic-t", "s1", "color = 'red'"));
    let s2 = Arc::new(Subscription::new("topic-t", "s2"));
    topic.add_subscription(Arc::clone(&s1));
    topic.add_subscription(Arc::clone(&s2));
    let producer = Producer::new("producer-1", Arc::clone(&topic));

    let interceptor = interceptor();
    let mut ctx = PublishContext::singleton();
    interceptor.on_message_publish(&producer, &message_with_color("blue"), &mut ctx);

    let position = MessagePosition::new(1, 1);
    interceptor.on_message_stored(&producer, position, &ctx);
    drain_fallback_lane(&topic).await;

    assert!(s1.is_acknowledged(&position), "s1 must never see the message");
    assert!(!s2.is_acknowledged(&position), "s2 delivers the message normally");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_matching_message_stays_deliverable_everywhere() {
    let topic = Arc::new(Topic::new("topic-t"));
    let s1 = Arc::new(Subscription::with_selector("topic-t", "s1", "color = 'red'"));
    topic.add_subscription(Arc::clone(&s1));
    let producer = Producer::new("producer-1", Arc::clone(&topic));

    let interceptor = interceptor();
    let mut ctx = PublishContext::singleton();
    interceptor.on_message_publish(&producer, &message_with_color("red"), &mut ctx);

    let position = MessagePosition::new(1, 2);
    interceptor.on_message_stored(&producer, position, &ctx);
    drain_fallback_lane(&topic).await;

    assert!(!s1.is_acknowledged(&position));
}

/// Scenario B: a 3-message batch bypasses filtering entirely, selector or not.
#[tokio::test(flavor = "multi_thread")]
async fn test_batch_publish_bypasses_filtering() {
    let topic = Arc::new(Topic::new("topic-t"));
    let s1 = Arc::new(Subscription::with_selector("topic-t", "s1", "color = 'red'"));
    let s2 = Arc::new(Subscription::new("topic-t", "s2"));
    topic.add_subscription(Arc::clone(&s1));
    topic.add_subscription(Arc::clone(&s2));
    let producer = Producer::new("producer-1", Arc::clone(&topic));

    let interceptor = interceptor();
    let batch = RawMessage::batch(HashMap::new(), Bytes::from_static(b"3 msgs"), 3);
    let mut ctx = PublishContext::with_number_of_messages(3);
    interceptor.on_message_publish(&producer, &batch, &mut ctx);

    let position = MessagePosition::new(1, 3);
    interceptor.on_message_stored(&producer, position, &ctx);
    drain_fallback_lane(&topic).await;

    assert!(!s1.is_acknowledged(&position), "batch bypass applies despite the selector");
    assert!(!s2.is_acknowledged(&position));
}

/// A message whose own metadata marks it as a multi-message batch is skipped
/// at storage time even when the publish context reported a single message
/// and a snapshot was captured.
#[tokio::test(flavor = "multi_thread")]
async fn test_batch_marked_snapshot_bypasses_filtering_after_storage() {
    let topic = Arc::new(Topic::new("topic-t"));
    let s1 = Arc::new(Subscription::with_selector("topic-t", "s1", "color = 'red'"));
    let s2 = Arc::new(Subscription::new("topic-t", "s2"));
    topic.add_subscription(Arc::clone(&s1));
    topic.add_subscription(Arc::clone(&s2));
    let producer = Producer::new("producer-1", Arc::clone(&topic));

    let mut properties = HashMap::new();
    properties.insert(
        CheetahString::from_static_str("color"),
        CheetahString::from_static_str("blue"),
    );
    let batch = RawMessage::batch(properties, Bytes::from_static(b"3 msgs"), 3);

    let interceptor = interceptor();
    let mut ctx = PublishContext::singleton();
    interceptor.on_message_publish(&producer, &batch, &mut ctx);

    let position = MessagePosition::new(1, 8);
    interceptor.on_message_stored(&producer, position, &ctx);
    drain_fallback_lane(&topic).await;

    assert!(
        !s1.is_acknowledged(&position),
        "the batch marker in the snapshot must suppress filtering"
    );
    assert!(!s2.is_acknowledged(&position));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rescheduling_same_position_is_idempotent() {
    let topic = Arc::new(Topic::new("topic-t"));
    let s1 = Arc::new(Subscription::with_selector("topic-t", "s1", "color = 'red'"));
    topic.add_subscription(Arc::clone(&s1));
    let producer = Producer::new("producer-1", Arc::clone(&topic));

    let interceptor = interceptor();
    let mut ctx = PublishContext::singleton();
    interceptor.on_message_publish(&producer, &message_with_color("blue"), &mut ctx);

    let position = MessagePosition::new(1, 4);
    interceptor.on_message_stored(&producer, position, &ctx);
    interceptor.on_message_stored(&producer, position, &ctx);
    drain_fallback_lane(&topic).await;

    assert!(s1.is_acknowledged(&position));
}

/// Tasks enqueued before `close()` observe the gate and never acknowledge.
#[tokio::test(flavor = "multi_thread")]
async fn test_tasks_enqueued_before_shutdown_do_not_ack() {
    let topic = Arc::new(Topic::new("topic-t"));
    let s1 = Arc::new(Subscription::with_selector("topic-t", "s1", "color = 'red'"));
    topic.add_subscription(Arc::clone(&s1));
    let producer = Producer::new("producer-1", Arc::clone(&topic));

    let interceptor = interceptor();

    // hold the lane worker so the filter task stays queued across close()
    let (hold_tx, hold_rx) = std::sync::mpsc::channel::<()>();
    topic
        .fallback_lane()
        .submit(move || {
            let _ = hold_rx.recv();
        })
        .unwrap();

    let mut ctx = PublishContext::singleton();
    interceptor.on_message_publish(&producer, &message_with_color("blue"), &mut ctx);
    let position = MessagePosition::new(1, 5);
    interceptor.on_message_stored(&producer, position, &ctx);

    interceptor.close();
    hold_tx.send(()).unwrap();
    drain_fallback_lane(&topic).await;

    assert!(
        !s1.is_acknowledged(&position),
        "a task enqueued before shutdown must drop instead of acknowledging"
    );
}

/// With a dispatcher attached, the filter task runs on the dispatcher's own
/// lane rather than the topic fallback lane.
#[tokio::test(flavor = "multi_thread")]
async fn test_filter_runs_on_dispatch_lane_when_attached() {
    use publish_filter::broker::dispatcher::DispatchMode;
    use publish_filter::broker::dispatcher::Dispatcher;
    use publish_filter::broker::dispatcher::MultiConsumerDispatcher;

    let topic = Arc::new(Topic::new("topic-t"));
    let s1 = Arc::new(Subscription::with_selector("topic-t", "s1", "color = 'red'"));
    let dispatcher = Arc::new(MultiConsumerDispatcher::new("s1"));
    s1.set_dispatch(DispatchMode::MultiConsumer(Arc::clone(&dispatcher)));
    topic.add_subscription(Arc::clone(&s1));
    let producer = Producer::new("producer-1", Arc::clone(&topic));

    let interceptor = interceptor();
    let mut ctx = PublishContext::singleton();
    interceptor.on_message_publish(&producer, &message_with_color("blue"), &mut ctx);

    let position = MessagePosition::new(1, 7);
    interceptor.on_message_stored(&producer, position, &ctx);

    let (tx, rx) = tokio::sync::oneshot::channel();
    dispatcher
        .dispatch_lane()
        .submit(move || {
            let _ = tx.send(());
        })
        .unwrap();
    rx.await.unwrap();

    assert!(s1.is_acknowledged(&position));
}

/// A closed lane makes scheduling fail; the pipeline skips that subscription
/// instead of surfacing an error to the storage path.
#[tokio::test(flavor = "multi_thread")]
async fn test_closed_lane_fails_open() {
    let topic = Arc::new(Topic::new("topic-t"));
    let s1 = Arc::new(Subscription::with_selector("topic-t", "s1", "color = 'red'"));
    topic.add_subscription(Arc::clone(&s1));
    let producer = Producer::new("producer-1", Arc::clone(&topic));

    let interceptor = interceptor();
    let mut ctx = PublishContext::singleton();
    interceptor.on_message_publish(&producer, &message_with_color("blue"), &mut ctx);

    topic.fallback_lane().close();
    let position = MessagePosition::new(1, 6);
    interceptor.on_message_stored(&producer, position, &ctx);

    assert!(!s1.is_acknowledged(&position));
}
