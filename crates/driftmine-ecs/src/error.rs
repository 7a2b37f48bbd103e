//! Error types for world wiring and snapshot transport.

use thiserror::Error;

/// Errors raised by the storage layer.
///
/// The `Unregistered*` variants indicate a wiring bug (a component or
/// singleton kind was never registered on the world) and should be treated as
/// fatal by callers. Domain-rule rejections are never reported here; systems
/// absorb those as no-ops.
#[derive(Error, Debug)]
pub enum EcsError {
    /// A component table was requested by a name that was never registered.
    #[error("component table not registered: {0}")]
    UnregisteredComponent(String),

    /// A singleton was requested by a name that was never registered.
    #[error("singleton not registered: {0}")]
    UnregisteredSingleton(String),

    /// Two component keys share a name but carry different value types.
    #[error("component table {0} is registered with a different value type")]
    ComponentTypeMismatch(&'static str),

    /// Two singleton keys share a name but carry different value types.
    #[error("singleton {0} is registered with a different value type")]
    SingletonTypeMismatch(&'static str),

    /// A snapshot was produced by an incompatible schema version.
    #[error("snapshot schema version {found} does not match expected {expected}")]
    SnapshotVersion { found: u32, expected: u32 },

    /// A value failed to convert to or from its structural snapshot form.
    #[error("snapshot codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
