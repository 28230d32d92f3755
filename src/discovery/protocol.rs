//! Сообщения протокола обнаружения и их кодирование.
//!
//! Поток событий:
//! - `Discovery#Ping`: менеджер → все локальные ресурсы, `{topic: <filter>}`;
//! - `Discovery#Pong`: локальный ресурс → менеджеры, `{topic, uuid, value}`;
//! - `Discovery#Remove`: локальный ресурс → менеджеры, `{topic, uuid}`.
//!
//! Payload-ы передаются по шине как JSON (UTF-8).

use bytes::Bytes;
use discovery_error::FilterError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::TopicFilter;

pub const EVENT_PING: &str = "Discovery#Ping";
pub const EVENT_PONG: &str = "Discovery#Pong";
pub const EVENT_REMOVE: &str = "Discovery#Remove";

/// Запрос менеджера: кто публикует топики, подходящие под фильтр.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingPayload {
    pub topic: TopicFilter,
}

/// Анонс локального ресурса с его текущим значением.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PongPayload {
    pub topic: String,
    pub uuid: String,
    #[serde(default)]
    pub value: Value,
}

/// Уведомление об уходе локального ресурса.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovePayload {
    pub topic: String,
    pub uuid: String,
}

impl PongPayload {
    /// Анонс с пустым topic или uuid не описывает ресурс.
    pub fn is_well_formed(&self) -> bool {
        !self.topic.is_empty() && !self.uuid.is_empty()
    }
}

impl RemovePayload {
    pub fn is_well_formed(&self) -> bool {
        !self.topic.is_empty() && !self.uuid.is_empty()
    }
}

pub fn encode<T: Serialize>(msg: &T) -> Result<Bytes, FilterError> {
    serde_json::to_vec(msg)
        .map(Bytes::from)
        .map_err(|e| FilterError::decoding(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, FilterError> {
    serde_json::from_slice(payload).map_err(|e| FilterError::decoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Тест проверяет точный JSON Ping-запроса.
    #[test]
    fn test_ping_wire_shape() {
        let ping = PingPayload {
            topic: TopicFilter::exact("test").unwrap(),
        };
        let bytes = encode(&ping).unwrap();
        let raw: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(raw, json!({"topic": {"type": "string", "data": "test"}}));
        assert_eq!(decode::<PingPayload>(&bytes).unwrap(), ping);
    }

    /// Тест проверяет, что Pong без поля value декодируется со значением null.
    #[test]
    fn test_pong_without_value_defaults_to_null() {
        let pong: PongPayload = decode(br#"{"topic":"test","uuid":"my-uuid"}"#).unwrap();

        assert_eq!(pong.value, Value::Null);
        assert!(pong.is_well_formed());
    }

    /// Тест проверяет, что пустые поля считаются некорректными.
    #[test]
    fn test_empty_fields_are_not_well_formed() {
        let pong: PongPayload = decode(br#"{"topic":"","uuid":"u","value":1}"#).unwrap();
        assert!(!pong.is_well_formed());

        let remove: RemovePayload = decode(br#"{"topic":"t","uuid":""}"#).unwrap();
        assert!(!remove.is_well_formed());
    }

    /// Тест проверяет, что битые payload-ы дают ошибку декодирования.
    #[test]
    fn test_malformed_payloads() {
        let cases: [&[u8]; 5] = [
            b"not json",
            br#"{"uuid":"u"}"#,
            br#"{"topic":42,"uuid":"u"}"#,
            br#"{"topic":"plain-string"}"#,
            br#"{"topic":{"type":"glob","data":"*"}}"#,
        ];
        for raw in cases {
            assert!(
                decode::<PingPayload>(raw).is_err(),
                "{}",
                String::from_utf8_lossy(raw)
            );
        }
        assert!(decode::<PongPayload>(br#"{"topic":42,"uuid":"u"}"#).is_err());

        let err = decode::<RemovePayload>(b"[]").unwrap_err();
        assert!(matches!(err, FilterError::Decoding { .. }));
    }
}
