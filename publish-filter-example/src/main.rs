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

//! Drives the publish-filter interceptor through the two-phase publish
//! lifecycle against an in-process topic, the way an embedding broker would.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use cheetah_string::CheetahString;
use publish_filter::broker::producer::Producer;
use publish_filter::broker::subscription::Subscription;
use publish_filter::broker::topic::Topic;
use publish_filter::BoxedBrokerInterceptor;
use publish_filter::BrokerInterceptor;
use publish_filter::FilterContext;
use publish_filter::FilterDecision;
use publish_filter::FilterEvaluator;
use publish_filter::MessagePosition;
use publish_filter::PublishContext;
use publish_filter::PublishFilterInterceptor;
use publish_filter::PublishFilterResult;
use publish_filter::RawMessage;
use tracing::info;

/// Minimal selector engine for the demo: understands `key = 'value'`.
struct EqualitySelectorEvaluator;

impl FilterEvaluator for EqualitySelectorEvaluator {
    fn evaluate(&self, context: &FilterContext<'_>) -> PublishFilterResult<FilterDecision> {
        let Some(selector) = context.subscription().selector() else {
            return Ok(FilterDecision::Accept);
        };
        let Some((key, expected)) = selector.as_str().split_once('=') else {
            return Ok(FilterDecision::Accept);
        };
        let expected = expected.trim().trim_matches('\'');
        let matches = context
            .metadata()
            .property(key.trim())
            .map(|actual| actual.as_str() == expected)
            .unwrap_or(false);
        Ok(if matches {
            FilterDecision::Accept
        } else {
            FilterDecision::Reject
        })
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

fn publish(
    interceptor: &dyn BrokerInterceptor,
    producer: &Producer,
    message: RawMessage,
    position: MessagePosition,
) {
    let mut ctx = PublishContext::singleton();
    interceptor.on_message_publish(producer, &message, &mut ctx);
    // ... the broker persists the message here ...
    interceptor.on_message_stored(producer, position, &ctx);
}

async fn drain(topic: &Topic) {
    let (tx, rx) = tokio::sync::oneshot::channel();
    topic
        .fallback_lane()
        .submit(move || {
            let _ = tx.send(());
        })
        .unwrap();
    rx.await.unwrap();
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let topic = Arc::new(Topic::new("orders"));
    let red_only = Arc::new(Subscription::with_selector("orders", "red-only", "color = 'red'"));
    let everything = Arc::new(Subscription::new("orders", "everything"));
    topic.add_subscription(Arc::clone(&red_only));
    topic.add_subscription(Arc::clone(&everything));

    let interceptor: BoxedBrokerInterceptor =
        Box::new(PublishFilterInterceptor::new(Arc::new(EqualitySelectorEvaluator)));
    interceptor.initialize(&HashMap::new());

    let producer = Producer::new("demo-producer", Arc::clone(&topic));

    let blue = MessagePosition::new(1, 1);
    let red = MessagePosition::new(1, 2);
    publish(interceptor.as_ref(), &producer, message_with_color("blue"), blue);
    publish(interceptor.as_ref(), &producer, message_with_color("red"), red);
    drain(&topic).await;

    for (label, position) in [("color=blue", blue), ("color=red", red)] {
        info!(
            "{}: red-only acked={} everything acked={}",
            label,
            red_only.is_acknowledged(&position),
            everything.is_acknowledged(&position)
        );
    }

    interceptor.close();
}
