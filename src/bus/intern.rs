use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

/// Пул для повторного использования Arc<str> по одинаковым именам событий.
static EVENT_INTERN: Lazy<DashMap<String, Arc<str>>> = Lazy::new(DashMap::new);

/// Возвращает interned Arc<str> для данного имени события.
#[inline(always)]
pub(crate) fn intern_event<S: AsRef<str>>(event: S) -> Arc<str> {
    let key = event.as_ref();
    if let Some(existing) = EVENT_INTERN.get(key) {
        return existing.clone();
    }
    EVENT_INTERN
        .entry(key.to_string())
        .or_insert_with(|| Arc::from(key))
        .clone()
}

#[cfg(test)]
pub(crate) fn is_interned(event: &str) -> bool {
    EVENT_INTERN.contains_key(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Проверяет, что при повторном вызове возвращается тот же самый Arc.
    #[test]
    fn intern_new_and_repeats() {
        let a1 = intern_event("Discovery#Ping");
        assert_eq!(&*a1, "Discovery#Ping");

        let a2 = intern_event("Discovery#Ping");
        assert!(Arc::ptr_eq(&a1, &a2), "Должен вернуть тот же Arc по указателю");
    }

    /// Проверяет, что для разных имён создаются разные Arc<str>.
    #[test]
    fn intern_different_keys() {
        let a1 = intern_event("Discovery#Pong");
        let a2 = intern_event("Discovery#Remove");
        assert!(!Arc::ptr_eq(&a1, &a2), "Разные ключи - разные Arc");
    }

    /// Проверяет, что при конкурентных вызовах для одной строки все потоки
    /// получают один и тот же `Arc<str>`.
    #[test]
    fn intern_concurrent() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| intern_event("concurrent#event")))
            .collect();

        let arcs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for arc in &arcs[1..] {
            assert!(Arc::ptr_eq(&arcs[0], arc));
        }
    }
}
