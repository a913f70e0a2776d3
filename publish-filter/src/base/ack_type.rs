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

/// How an acknowledgment applies to a subscription's cursor.
///
/// The publish-filter pipeline only ever issues [`AckType::Individual`];
/// cumulative acknowledgment is part of the subscription's standard ack
/// surface and moves the cursor watermark forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckType {
    Individual,
    Cumulative,
}
