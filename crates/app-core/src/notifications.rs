//! Notification classification
//!
//! Notifications wrap a cast (likes, recasts, replies, mentions) or a list of
//! new followers. Cast notifications go through the same strict embed
//! classification as feed batches; follow notifications are reshaped and
//! passed through without any probing.

use std::collections::BTreeSet;

use futures_util::stream::{self, StreamExt};
use networking::ContentProbe;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::casts::{Cast, CastContext, ClassifiedCast};
use crate::classifier::EmbedClassifier;
use crate::embeds::{ClassifyError, ClassifyMode};

/// Errors that can occur while classifying a notification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// The notification kind is filtered out
    #[error("Notification kind {0:?} is excluded")]
    Excluded(NotificationKind),

    /// A cast notification arrived without its cast
    #[error("Notification has no cast")]
    MissingCast,

    /// The wrapped cast failed classification
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Result type for notification operations
pub type Result<T> = std::result::Result<T, NotificationError>;

/// Notification discriminator (the `type` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Someone mentioned you
    Mention,
    /// Someone followed you
    Follows,
    /// Someone liked your cast
    Likes,
    /// Someone replied to your cast
    Reply,
    /// Someone recast your cast
    Recasts,
    /// Any type this client does not know about
    #[serde(other)]
    Unknown,
}

impl NotificationKind {
    /// Check if this kind wraps a cast
    pub fn carries_cast(&self) -> bool {
        !matches!(self, NotificationKind::Follows)
    }
}

/// A notification as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification kind
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Timestamp of the most recent event in this group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_recent_timestamp: Option<String>,
    /// The cast this notification is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<Cast>,
    /// Follow entries (only for `follows`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follows: Vec<Value>,
    /// Every other field, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notification {
    /// Create a notification of `kind` with no payload
    pub fn new(kind: NotificationKind) -> Self {
        Self {
            kind,
            most_recent_timestamp: None,
            cast: None,
            follows: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Attach the wrapped cast
    pub fn with_cast(mut self, cast: Cast) -> Self {
        self.cast = Some(cast);
        self
    }

    /// Attach follow entries
    pub fn with_follows(mut self, follows: Vec<Value>) -> Self {
        self.follows = follows;
        self
    }

    /// Set the most recent timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.most_recent_timestamp = Some(timestamp.into());
        self
    }
}

/// Notification body after classification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NotificationPayload {
    /// New followers, one user object per entry
    Follows {
        /// Follower user objects
        follows: Vec<Value>,
    },
    /// Classified cast
    Cast {
        /// The cast with its embed type
        cast: ClassifiedCast,
    },
}

/// A notification ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedNotification {
    /// Notification kind
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Timestamp of the most recent event in this group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_recent_timestamp: Option<String>,
    /// Reshaped payload
    #[serde(flatten)]
    pub payload: NotificationPayload,
    /// Passthrough fields from the source notification
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClassifiedNotification {
    /// Get the classified cast, if this is a cast notification
    pub fn cast(&self) -> Option<&ClassifiedCast> {
        match &self.payload {
            NotificationPayload::Cast { cast } => Some(cast),
            NotificationPayload::Follows { .. } => None,
        }
    }
}

/// Which notifications survive classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFilter {
    /// Kinds that are always dropped
    pub excluded_kinds: BTreeSet<NotificationKind>,
    /// Context used for casts without an embed URL
    pub cast_context: CastContext,
}

impl Default for NotificationFilter {
    /// Drops mentions, matching what the notifications page has always shown.
    fn default() -> Self {
        Self {
            excluded_kinds: BTreeSet::from([NotificationKind::Mention]),
            cast_context: CastContext::Normal,
        }
    }
}

impl NotificationFilter {
    /// A filter that keeps every kind
    pub fn allow_all() -> Self {
        Self {
            excluded_kinds: BTreeSet::new(),
            ..Default::default()
        }
    }

    /// Drop notifications of `kind`
    pub fn exclude(mut self, kind: NotificationKind) -> Self {
        self.excluded_kinds.insert(kind);
        self
    }

    /// Keep notifications of `kind`
    pub fn allow(mut self, kind: NotificationKind) -> Self {
        self.excluded_kinds.remove(&kind);
        self
    }

    /// Set the context used for text-only casts
    pub fn with_cast_context(mut self, context: CastContext) -> Self {
        self.cast_context = context;
        self
    }

    /// Check if `kind` is dropped
    pub fn excludes(&self, kind: NotificationKind) -> bool {
        self.excluded_kinds.contains(&kind)
    }
}

/// Unwrap `{ "object": "follow", "user": {...} }` entries to the user object
fn reshape_follows(follows: &[Value]) -> Vec<Value> {
    follows
        .iter()
        .map(|entry| entry.get("user").cloned().unwrap_or_else(|| entry.clone()))
        .collect()
}

impl<P: ContentProbe> EmbedClassifier<P> {
    /// Classify one notification
    pub async fn classify_notification(
        &self,
        notification: &Notification,
    ) -> Result<ClassifiedNotification> {
        let filter = &self.config().notifications;
        if filter.excludes(notification.kind) {
            return Err(NotificationError::Excluded(notification.kind));
        }

        let payload = if notification.kind.carries_cast() {
            let cast = notification
                .cast
                .as_ref()
                .ok_or(NotificationError::MissingCast)?;
            let classified = self
                .classify_cast(cast, filter.cast_context, ClassifyMode::Strict)
                .await?;
            NotificationPayload::Cast { cast: classified }
        } else {
            NotificationPayload::Follows {
                follows: reshape_follows(&notification.follows),
            }
        };

        Ok(ClassifiedNotification {
            kind: notification.kind,
            most_recent_timestamp: notification.most_recent_timestamp.clone(),
            payload,
            extra: notification.extra.clone(),
        })
    }

    /// Classify a batch of notifications, returning one outcome per input
    pub async fn classify_notification_batch_detailed(
        &self,
        notifications: &[Notification],
    ) -> Vec<Result<ClassifiedNotification>> {
        tracing::debug!(count = notifications.len(), "Classifying notification batch");

        stream::iter(notifications)
            .map(|notification| self.classify_notification(notification))
            .buffered(self.config().concurrency())
            .collect()
            .await
    }

    /// Classify a batch of notifications, dropping excluded and failed ones
    pub async fn classify_notification_batch(
        &self,
        notifications: &[Notification],
    ) -> Vec<ClassifiedNotification> {
        let outcomes = self.classify_notification_batch_detailed(notifications).await;

        outcomes
            .into_iter()
            .enumerate()
            .filter_map(|(index, outcome)| match outcome {
                Ok(classified) => Some(classified),
                Err(NotificationError::Excluded(kind)) => {
                    tracing::debug!(index, ?kind, "Skipping excluded notification");
                    None
                }
                Err(e) => {
                    tracing::warn!(index, "Dropping notification from batch: {}", e);
                    None
                }
            })
            .collect()
    }
}
