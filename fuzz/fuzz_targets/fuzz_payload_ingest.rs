#![no_main]
use libfuzzer_sys::fuzz_target;
use tracker_core::{ControlConfigStore, TelemetryAggregator};

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    // Ingest never fails and never grows a history past its capacity
    let mut agg = TelemetryAggregator::new(4, Default::default());
    for _ in 0..6 {
        agg.ingest(payload.clone());
    }
    assert!(agg.acceleration_history().len() <= 4);
    assert!(agg.angle_history().len() <= 4);

    // A rejected configuration leaves the store untouched
    let mut store = ControlConfigStore::new();
    if store.replace_from_wire(payload).is_err() {
        assert_eq!(store.revision(), 0);
    }
});
