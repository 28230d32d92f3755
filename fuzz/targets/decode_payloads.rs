#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use discovery::{
    discovery::protocol::{decode, encode, PingPayload, PongPayload, RemovePayload},
    TopicFilter,
};

#[derive(Debug, Arbitrary)]
enum Kind {
    Ping,
    Pong,
    Remove,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    kind: Kind,
    data: Vec<u8>,
    probe: String,
}

fuzz_target!(|input: FuzzInput| {
    // Декодеры не должны паниковать ни на каких данных.
    match input.kind {
        Kind::Ping => {
            if let Ok(ping) = decode::<PingPayload>(&input.data) {
                let matched = ping.topic.is_match(&input.probe);

                // декодированный фильтр кодируется обратно в эквивалентный
                let bytes = encode(&ping).expect("encode decoded ping");
                let again: PingPayload = decode(&bytes).expect("decode re-encoded ping");
                assert_eq!(again.topic, ping.topic);
                assert_eq!(again.topic.is_match(&input.probe), matched);
            }
        }
        Kind::Pong => {
            if let Ok(pong) = decode::<PongPayload>(&input.data) {
                let _ = pong.is_well_formed();
            }
        }
        Kind::Remove => {
            if let Ok(remove) = decode::<RemovePayload>(&input.data) {
                let _ = remove.is_well_formed();
            }
        }
    }

    // Произвольная строка как exact-фильтр и как pattern.
    if let Ok(text) = std::str::from_utf8(&input.data) {
        let _ = TopicFilter::exact(text).map(|f| f.is_match(&input.probe));
        let _ = TopicFilter::pattern(text).map(|f| f.is_match(&input.probe));
    }
});
