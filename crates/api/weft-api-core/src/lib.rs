//! weft-api-core: shared pose & scheduling contracts (core, engine-agnostic)

pub mod error;
pub mod layout;
pub mod pose;
pub mod source;

pub use error::CoreError;
pub use layout::ChannelLayout;
pub use pose::Pose;
pub use source::{PoseSource, SourceId};
