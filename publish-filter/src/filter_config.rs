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
use serde::Deserialize;
use tracing::warn;

use crate::error::PublishFilterError;

/// Broker property enabling filtering on the publish path.
pub const APPLY_FILTERS_ON_PUBLISH: &str = "applyFiltersOnPublish";

/// Configuration for the publish-filter pipeline.
///
/// Filtering on publish is enabled by default; a missing or invalid property
/// never fails initialization, the default is applied instead.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    pub apply_filters_on_publish: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            apply_filters_on_publish: true,
        }
    }
}

impl FilterConfig {
    /// Builds the configuration from the broker's raw property map.
    ///
    /// Invalid values are logged and replaced with the default.
    pub fn from_properties(properties: &HashMap<CheetahString, CheetahString>) -> Self {
        let default = FilterConfig::default();
        let apply_filters_on_publish =
            match properties.get(APPLY_FILTERS_ON_PUBLISH) {
                None => default.apply_filters_on_publish,
                Some(value) => match value.as_str().to_ascii_lowercase().as_str() {
                    "true" => true,
                    "false" => false,
                    _ => {
                        warn!(
                            "{}, using default {}",
                            PublishFilterError::invalid_config_value(
                                APPLY_FILTERS_ON_PUBLISH,
                                value.clone()
                            ),
                            default.apply_filters_on_publish
                        );
                        default.apply_filters_on_publish
                    }
                },
            };
        FilterConfig {
            apply_filters_on_publish,
        }
    }
}
