#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use discovery::{
    bus::{Broker, MessageBus},
    discovery::{EVENT_PING, EVENT_PONG, EVENT_REMOVE},
    LocalResource, ResourceManager, TopicFilter,
};

#[derive(Debug, Arbitrary)]
enum Event {
    Ping,
    Pong,
    Remove,
}

#[derive(Debug, Arbitrary)]
struct Inbound {
    event: Event,
    payload: Vec<u8>,
}

fuzz_target!(|messages: Vec<Inbound>| {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    rt.block_on(async {
        let bus = Arc::new(Broker::new());
        let local = LocalResource::builder("fuzz/topic")
            .uuid("fuzz")
            .build()
            .expect("local resource");
        let manager = ResourceManager::new(TopicFilter::pattern("fuzz").expect("filter"));

        local.load(bus.clone()).await.expect("load local");
        manager.load(bus.clone()).await.expect("load manager");

        // Любой входящий мусор отбрасывается без паники.
        for msg in messages {
            let event = match msg.event {
                Event::Ping => EVENT_PING,
                Event::Pong => EVENT_PONG,
                Event::Remove => EVENT_REMOVE,
            };
            bus.send_event(event, None, msg.payload.into())
                .await
                .expect("send on open bus");
        }

        for res in manager.resources() {
            assert!(!res.uuid().is_empty());
            assert!(manager.filter().is_match(res.topic()));
        }

        manager.unload().await.expect("unload manager");
        let _ = local.unload().await;
    });
});
