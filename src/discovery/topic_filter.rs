use std::fmt;

use discovery_error::FilterError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Фильтр топиков: точная строка или регулярное выражение.
///
/// Неизменяем после создания. Pattern ищет совпадение в любом месте топика
/// (поиск подстроки), а не полное совпадение.
///
/// Wire-форма: `{"type": "string"|"regex", "data": "<source>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WireFilter", into = "WireFilter")]
pub struct TopicFilter {
    kind: FilterKind,
}

#[derive(Debug, Clone)]
enum FilterKind {
    Exact(String),
    Pattern(Regex),
}

/// Сериализуемое представление фильтра.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum WireFilter {
    String(String),
    Regex(String),
}

impl TopicFilter {
    /// Фильтр точного совпадения. Пустая строка недопустима.
    pub fn exact(topic: impl Into<String>) -> Result<Self, FilterError> {
        let topic = topic.into();
        if topic.is_empty() {
            return Err(FilterError::invalid("exact filter must be a non-empty string"));
        }
        Ok(Self {
            kind: FilterKind::Exact(topic),
        })
    }

    /// Фильтр по регулярному выражению, заданному исходным текстом.
    pub fn pattern(expr: &str) -> Result<Self, FilterError> {
        if expr.is_empty() {
            return Err(FilterError::invalid("pattern must be a non-empty expression"));
        }
        let re = Regex::new(expr).map_err(|e| FilterError::invalid(e.to_string()))?;
        Self::try_from(re)
    }

    pub fn is_match(
        &self,
        topic: &str,
    ) -> bool {
        match &self.kind {
            FilterKind::Exact(expected) => expected == topic,
            FilterKind::Pattern(re) => re.is_match(topic),
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self.kind, FilterKind::Pattern(_))
    }

    /// Исходный текст: строка для Exact, выражение для Pattern.
    pub fn source(&self) -> &str {
        match &self.kind {
            FilterKind::Exact(topic) => topic,
            FilterKind::Pattern(re) => re.as_str(),
        }
    }

    pub fn to_wire(&self) -> WireFilter {
        match &self.kind {
            FilterKind::Exact(topic) => WireFilter::String(topic.clone()),
            FilterKind::Pattern(re) => WireFilter::Regex(re.as_str().to_string()),
        }
    }

    pub fn from_wire(wire: WireFilter) -> Result<Self, FilterError> {
        match wire {
            WireFilter::String(data) if data.is_empty() => {
                Err(FilterError::decoding("filter data must be non-empty"))
            }
            WireFilter::Regex(data) if data.is_empty() => {
                Err(FilterError::decoding("filter data must be non-empty"))
            }
            WireFilter::String(data) => Self::exact(data),
            WireFilter::Regex(data) => {
                Self::pattern(&data).map_err(|e| FilterError::decoding(e.to_string()))
            }
        }
    }
}

/// Пустое выражение отвергается: в wire-форме его не передать.
impl TryFrom<Regex> for TopicFilter {
    type Error = FilterError;

    fn try_from(re: Regex) -> Result<Self, Self::Error> {
        if re.as_str().is_empty() {
            return Err(FilterError::invalid("pattern must be a non-empty expression"));
        }
        Ok(Self {
            kind: FilterKind::Pattern(re),
        })
    }
}

impl TryFrom<&str> for TopicFilter {
    type Error = FilterError;

    fn try_from(topic: &str) -> Result<Self, Self::Error> {
        Self::exact(topic)
    }
}

impl TryFrom<String> for TopicFilter {
    type Error = FilterError;

    fn try_from(topic: String) -> Result<Self, Self::Error> {
        Self::exact(topic)
    }
}

impl TryFrom<WireFilter> for TopicFilter {
    type Error = FilterError;

    fn try_from(wire: WireFilter) -> Result<Self, Self::Error> {
        Self::from_wire(wire)
    }
}

impl From<TopicFilter> for WireFilter {
    fn from(filter: TopicFilter) -> Self {
        filter.to_wire()
    }
}

impl PartialEq for TopicFilter {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.is_pattern() == other.is_pattern() && self.source() == other.source()
    }
}

impl Eq for TopicFilter {}

impl fmt::Display for TopicFilter {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match &self.kind {
            FilterKind::Exact(topic) => write!(f, "\"{topic}\""),
            FilterKind::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}
