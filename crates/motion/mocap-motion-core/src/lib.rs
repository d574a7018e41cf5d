//! Mocap Motion Core
//!
//! Ingests sparse, irregularly sampled motion-capture tables, normalizes them
//! onto a zero-based time axis, and evaluates them at arbitrary query times.
//! Tables are played on bodies through bindings, bindings are grouped, and a
//! playback manager drives the active groups from one playhead.
//!
//! Rendering, UI and file transport stay with the host, which plugs in
//! through the traits in [`target`].

pub mod binding;
pub mod channel;
pub mod config;
pub mod coords;
pub mod error;
pub mod frame;
pub mod group;
pub mod ids;
pub mod interp;
pub mod log_ingest;
pub mod manager;
pub mod sampling;
pub mod serial;
pub mod store;
pub mod table;
pub mod tabular;
pub mod target;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MotionError>;

// Re-exports for hosts
pub use binding::{Binding, BodyRemap, TableMemo};
pub use channel::ChannelKey;
pub use config::{IngestConfig, TimeUnit};
pub use error::{MotionError, ReferenceKind};
pub use frame::{Axes3, Frame, Quat};
pub use group::BindingGroup;
pub use ids::{BindingId, BodyId, GroupId, TableId};
pub use manager::PlaybackManager;
pub use serial::{SerializedBinding, SerializedGroup, SerializedManager, SerializedTable};
pub use store::{TableLookup, TableStore};
pub use table::{ChannelMap, MotionTable};
pub use tabular::Cell;
pub use target::{
    BodyResolver, Collaborators, LogReporter, NullRenderer, PoseTarget, Renderer, Reporter,
};
