pub mod bus;
pub mod filter;
pub mod resource;

// Публичный экспорт всех типов ошибок из вложенных модулей.
pub use bus::*;
pub use filter::*;
pub use resource::*;
