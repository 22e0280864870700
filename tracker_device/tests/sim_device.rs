use rstest::rstest;
use serde_json::{Value, json};
use tracker_device::SimulatedDevice;
use tracker_device::sim::factory_setting;
use tracker_traits::DeviceApi;

#[test]
fn telemetry_uses_string_numbers_like_firmware() {
    let mut dev = SimulatedDevice::new();
    let payload = dev.fetch_telemetry().unwrap();
    for key in ["x", "y", "z"] {
        let v = &payload["acc"][key];
        assert!(v.is_string(), "acc.{key} should be a string, got {v}");
        let parsed: f64 = v.as_str().unwrap().parse().unwrap();
        assert!((-1.5..=1.5).contains(&parsed));
    }
    assert!(payload["angle"]["x"].is_string());
    assert!(payload["panel"].is_object());
}

#[test]
fn yaw_advances_per_fetch_and_wraps() {
    let mut dev = SimulatedDevice::new();
    dev.set_yaw_step(200.0);
    let a: f64 = dev.fetch_telemetry().unwrap()["angle"]["x"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    let b: f64 = dev.fetch_telemetry().unwrap()["angle"]["x"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(a, 200.0);
    assert_eq!(b, 40.0);
    assert_eq!(dev.ticks(), 2);
}

#[test]
fn posted_setting_is_returned_verbatim() {
    let mut dev = SimulatedDevice::new();
    assert_eq!(dev.fetch_setting().unwrap(), factory_setting());

    let body = json!({"mode": "manual", "man": {"pitch": 10, "yaw": 90}});
    let ack = dev.post_setting(&body).unwrap();
    assert_eq!(ack, "setting data received");
    assert_eq!(dev.fetch_setting().unwrap(), body);
}

#[test]
fn clones_share_state() {
    let dev = SimulatedDevice::new();
    let mut other = dev.clone();
    other.fetch_telemetry().unwrap();
    assert_eq!(dev.ticks(), 1);
}

#[rstest]
#[case::string(json!("mode=auto"))]
#[case::array(json!([1, 2, 3]))]
#[case::null(Value::Null)]
fn non_object_setting_is_rejected(#[case] body: Value) {
    let mut dev = SimulatedDevice::new();
    assert!(dev.post_setting(&body).is_err());
    assert_eq!(dev.fetch_setting().unwrap(), factory_setting());
}

#[test]
fn brightness_echoes_data() {
    let mut dev = SimulatedDevice::new();
    let resp = dev.post_brightness(&json!({"data": 42})).unwrap();
    assert_eq!(resp["controlData"], json!(42));
    assert!(resp["message"].is_string());
}
