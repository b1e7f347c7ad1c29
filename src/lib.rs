//! Tike
//!
//! Embed classification for the Tike social client. Feed, channel and profile
//! pages hand raw casts to [`EmbedClassifier`] and render whatever comes back.
//!
//! ```no_run
//! use tike::{Cast, CastContext, ClassifierConfig, EmbedClassifier};
//!
//! async fn render_page(casts: Vec<Cast>) -> Result<(), Box<dyn std::error::Error>> {
//!     let classifier = EmbedClassifier::with_http(ClassifierConfig::default())?;
//!     for cast in classifier.classify_batch(&casts, CastContext::Normal).await {
//!         println!("{}", cast.embed_type);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use app_core::{
    casts, classifier, config, embeds, notifications, Cast, CastContext, CastEmbed,
    ClassifiedCast, ClassifiedNotification, ClassifierConfig, ClassifyError, ClassifyMode,
    EmbedClassifier, EmbedType, Notification, NotificationError, NotificationFilter,
    NotificationKind, NotificationPayload,
};
pub use networking::{
    ContentProbe, HttpClient, HttpClientConfig, ProbeError, ProbeResponse, RetryPolicy, Url,
};
