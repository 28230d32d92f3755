//! Шина сообщений (message bus), поверх которой работает протокол обнаружения.
//!
//! - `port`: трейт [`MessageBus`]: граница с внешней шиной.
//! - `broker`: [`Broker`]: внутрипроцессная реализация шины.
//! - `message`: структура доставляемого события.
//! - `intern` (приватный): пул имён событий.
//!
//! Публичный API переэкспортирует:
//! - `broker::*`
//! - `message::*`
//! - `port::*`

pub mod broker;
#[cfg(test)]
pub(crate) mod failing;
mod intern;
pub mod message;
pub mod port;

pub use broker::*;
pub(crate) use intern::intern_event;
#[cfg(test)]
pub(crate) use intern::is_interned;
pub use message::*;
pub use port::*;
