//! Core application logic for Tike
//!
//! This crate decides how casts and notifications coming from the social-graph
//! API should be rendered, by classifying their embeds into image, video,
//! audio, YouTube, frame or other.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod casts;
pub mod classifier;
pub mod config;
pub mod embeds;
pub mod notifications;

pub use casts::{Cast, CastContext, CastEmbed, ClassifiedCast};
pub use classifier::EmbedClassifier;
pub use config::ClassifierConfig;
pub use embeds::{ClassifyError, ClassifyMode, EmbedType};
pub use notifications::{
    ClassifiedNotification, Notification, NotificationError, NotificationFilter,
    NotificationKind, NotificationPayload,
};
