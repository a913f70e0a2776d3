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

pub struct FilterMetricsConstant;

impl FilterMetricsConstant {
    pub const METER_NAME: &'static str = "publish_filter";

    /// Publish-path scan duration, per topic. Recorded on every eligible
    /// publish, including scans that capture nothing.
    pub const HISTOGRAM_PREPROCESSING_TIME_ON_PUBLISH: &'static str =
        "filter_preprocessing_time_on_publish";

    /// Filter-task duration (evaluate plus any acknowledgment), per topic and
    /// subscription.
    pub const HISTOGRAM_PROCESSING_TIME_ON_PUBLISH: &'static str =
        "filter_processing_time_on_publish";

    pub const LABEL_TOPIC: &'static str = "topic";
    pub const LABEL_SUBSCRIPTION: &'static str = "subscription";
}
