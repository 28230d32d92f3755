//! Протокол обнаружения ресурсов поверх шины сообщений.
//!
//! - `topic_filter`: [`TopicFilter`]: точный или regex-фильтр топиков.
//! - `protocol`: payload-ы `Discovery#Ping`/`Pong`/`Remove` и их JSON-кодек.
//! - `local`: [`LocalResource`]: издатель значения.
//! - `remote`: [`RemoteResource`]: зеркало у подписчика.
//! - `manager`: [`ResourceManager`]: подписчик, отслеживающий ресурсы по
//!   фильтру.
//! - `collect`: [`collect_resources`]: разовое обнаружение с окном ожидания.

pub mod collect;
pub mod local;
pub mod manager;
pub mod protocol;
pub mod remote;
pub mod topic_filter;

pub use collect::collect_resources;
pub use local::{LocalResource, LocalResourceBuilder};
pub use manager::{
    ResourceEvent, ResourceEvents, ResourceManager, ResourceManagerBuilder, DEFAULT_EVENT_CAPACITY,
};
pub use protocol::{EVENT_PING, EVENT_PONG, EVENT_REMOVE};
pub use remote::RemoteResource;
pub use topic_filter::{TopicFilter, WireFilter};
