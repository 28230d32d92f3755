use std::{sync::Arc, time::Duration};

use tracing::debug;

use super::{RemoteResource, ResourceManager, TopicFilter};
use crate::{bus::MessageBus, error::DiscoveryResult};

/// Разовое обнаружение: пингует шину, ждёт `window` и возвращает всё, что
/// успело ответить.
///
/// Под капотом создаётся временный [`ResourceManager`], который снимается с
/// шины перед возвратом. Возвращённые зеркала больше не обновляются.
pub async fn collect_resources(
    bus: Arc<dyn MessageBus>,
    filter: TopicFilter,
    window: Duration,
) -> DiscoveryResult<Vec<RemoteResource>> {
    let manager = ResourceManager::builder(filter).ping_on_load(true).build()?;
    manager.load(bus).await?;

    tokio::time::sleep(window).await;

    let found = manager.resources();
    manager.unload().await?;

    debug!(filter = %manager.filter(), found = found.len(), "collect window closed");
    Ok(found)
}
