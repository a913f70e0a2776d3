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

use crate::base::ack_type::AckType;
use crate::base::message_position::MessagePosition;
use crate::broker::subscription::Subscription;
use crate::error::PublishFilterError;
use crate::error::PublishFilterResult;

/// Issues the acknowledgment that permanently marks a rejected message as
/// consumed for one subscription, before any consumer sees it.
pub struct RejectionCommitter;

impl RejectionCommitter {
    /// Delegates to the subscription's standard acknowledgment path.
    ///
    /// Runs on a lane worker, not on the publish or storage caller, and must
    /// not block that worker; the underlying ack is a set insertion and is
    /// idempotent against accidental re-scheduling.
    pub fn acknowledge(
        subscription: &Subscription,
        position: MessagePosition,
        ack_type: AckType,
    ) -> PublishFilterResult<()> {
        subscription
            .acknowledge_message(&[position], ack_type)
            .map_err(|e| {
                PublishFilterError::acknowledgment(
                    subscription.name().clone(),
                    format!("{position}: {e}"),
                )
            })
    }
}
