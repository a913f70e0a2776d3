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

/// Error types for the publish-filter pipeline.
///
/// None of these errors may escape into the broker's publish or
/// storage-completion path; every call site catches, logs and falls open.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishFilterError {
    #[error("Lane {0} is closed")]
    LaneClosed(CheetahString),

    #[error("Selector evaluation failed for subscription {0}: {1}")]
    Evaluation(CheetahString, CheetahString),

    #[error("Acknowledgment failed for subscription {0} at {1}")]
    Acknowledgment(CheetahString, CheetahString),

    #[error("Invalid value '{1}' for configuration key {0}")]
    InvalidConfigValue(CheetahString, CheetahString),
}

impl PublishFilterError {
    pub fn lane_closed(lane: impl Into<CheetahString>) -> Self {
        PublishFilterError::LaneClosed(lane.into())
    }

    pub fn evaluation(subscription: impl Into<CheetahString>, message: impl Into<CheetahString>) -> Self {
        PublishFilterError::Evaluation(subscription.into(), message.into())
    }

    pub fn acknowledgment(subscription: impl Into<CheetahString>, position: impl Into<CheetahString>) -> Self {
        PublishFilterError::Acknowledgment(subscription.into(), position.into())
    }

    pub fn invalid_config_value(key: impl Into<CheetahString>, value: impl Into<CheetahString>) -> Self {
        PublishFilterError::InvalidConfigValue(key.into(), value.into())
    }
}

pub type PublishFilterResult<T> = Result<T, PublishFilterError>;
