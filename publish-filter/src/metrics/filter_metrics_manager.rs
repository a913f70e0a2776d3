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

use std::sync::OnceLock;
use std::time::Duration;

use cheetah_string::CheetahString;
use opentelemetry::global;
use opentelemetry::metrics::Histogram;
use opentelemetry::KeyValue;

use crate::metrics::filter_metrics_constant::FilterMetricsConstant;

static PREPROCESSING_TIME_ON_PUBLISH: OnceLock<Histogram<u64>> = OnceLock::new();
static PROCESSING_TIME_ON_PUBLISH: OnceLock<Histogram<u64>> = OnceLock::new();

/// Registers and records the pipeline's duration histograms.
///
/// Registration is idempotent: repeated `init` calls are no-ops, so the
/// interceptor can be re-initialized without error. Recording before `init`
/// is a silent no-op.
pub struct FilterMetricsManager;

impl FilterMetricsManager {
    pub fn init() {
        let meter = global::meter(FilterMetricsConstant::METER_NAME);
        PREPROCESSING_TIME_ON_PUBLISH.get_or_init(|| {
            meter
                .u64_histogram(FilterMetricsConstant::HISTOGRAM_PREPROCESSING_TIME_ON_PUBLISH)
                .with_description(
                    "Time taken to pre-process a message on the publish path before any filter runs",
                )
                .with_unit("ns")
                .build()
        });
        PROCESSING_TIME_ON_PUBLISH.get_or_init(|| {
            meter
                .u64_histogram(FilterMetricsConstant::HISTOGRAM_PROCESSING_TIME_ON_PUBLISH)
                .with_description("Time taken to apply one subscription's filter to a stored message")
                .with_unit("ns")
                .build()
        });
    }

    /// Records one publish-path subscription scan for `topic`.
    pub fn record_publish_scan(topic: &CheetahString, elapsed: Duration) {
        if let Some(histogram) = PREPROCESSING_TIME_ON_PUBLISH.get() {
            histogram.record(
                elapsed.as_nanos() as u64,
                &[KeyValue::new(FilterMetricsConstant::LABEL_TOPIC, topic.to_string())],
            );
        }
    }

    /// Records one filter task (evaluate plus any acknowledgment).
    pub fn record_filter_task(topic: &CheetahString, subscription: &CheetahString, elapsed: Duration) {
        if let Some(histogram) = PROCESSING_TIME_ON_PUBLISH.get() {
            histogram.record(
                elapsed.as_nanos() as u64,
                &[
                    KeyValue::new(FilterMetricsConstant::LABEL_TOPIC, topic.to_string()),
                    KeyValue::new(
                        FilterMetricsConstant::LABEL_SUBSCRIPTION,
                        subscription.to_string(),
                    ),
                ],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        FilterMetricsManager::init();
        FilterMetricsManager::init();

        // recording after init must not panic
        FilterMetricsManager::record_publish_scan(
            &CheetahString::from_static_str("topic-a"),
            Duration::from_nanos(42),
        );
        FilterMetricsManager::record_filter_task(
            &CheetahString::from_static_str("topic-a"),
            &CheetahString::from_static_str("sub-a"),
            Duration::from_nanos(42),
        );
    }
}
