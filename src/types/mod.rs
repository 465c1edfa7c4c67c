//! Public types for the Membit API.

mod cluster;
mod insight;
mod reply;

pub use cluster::Cluster;
pub use insight::{Insight, RiskBand, RiskColor};
pub use reply::{Attachment, Embed, EmbedField, Reply};
