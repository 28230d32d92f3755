/// Message bus port and the in-process broker.
pub mod bus;
/// Settings loaded from the environment.
pub mod config;
/// Discovery protocol: topic filters, local/remote resources, manager.
pub mod discovery;
/// Umbrella error type over the leaf errors of `discovery-error`.
pub mod error;
/// Host-side logging (console, rolling file, level filter).
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Bus API.
pub use bus::{event_handler, Broker, EventHandler, ListenerHandle, Message, MessageBus};
/// Settings.
pub use crate::config::Settings;
/// Discovery API.
pub use discovery::{
    collect_resources, LocalResource, RemoteResource, ResourceEvent, ResourceEvents,
    ResourceManager, TopicFilter,
};
/// Errors and result types.
pub use error::{
    BusError, DiscoveryError, DiscoveryResult, ErrorExt, FilterError, ResourceError, StatusCode,
};
/// Logging.
pub use logging::{init_logging, LoggingConfig, LoggingHandle};
