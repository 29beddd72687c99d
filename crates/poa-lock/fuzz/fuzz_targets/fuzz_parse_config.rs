//! Fuzz target for the authority configuration decoder.

#![no_main]

use libfuzzer_sys::fuzz_target;
use poa_lock::{AuthorityConfig, AuthoritySetup};

fuzz_target!(|data: &[u8]| {
    // Parsing must never panic.
    let Ok(config) = AuthorityConfig::parse(data) else {
        return;
    };

    assert!(config.change_threshold <= config.aggregator_count);
    assert_eq!(
        data.len(),
        44 + config.identity_size as usize * config.aggregator_count as usize
    );

    // Every accepted setup that re-validates encodes back to the same bytes.
    let setup = AuthoritySetup::from(&config);
    if let Ok(encoded) = setup.to_bytes() {
        let reparsed = AuthorityConfig::parse(&encoded).expect("encoded setup parses");
        assert_eq!(reparsed.identities().count(), config.identities().count());
        assert_eq!(reparsed.round_duration, config.round_duration);
    }
});
