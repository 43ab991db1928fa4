use presence_shell::{Activity, ActivityKind, Button, PresenceState};
use serde_json::Value;

fn activity_to_value(presence: &PresenceState) -> Value {
    serde_json::to_value(Activity::from(presence)).expect("activity should serialize")
}

#[test]
fn presence_produces_discord_activity() {
    let presence = PresenceState {
        details: "Mission 5".into(),
        start_timestamp: 1234,
        buttons: vec![Button {
            label: "Join".into(),
            url: "https://example.com/join".into(),
        }],
        state: "Playing campaign".into(),
        large_image_key: "cover-art".into(),
        large_image_text: "Cover Art".into(),
        small_image_key: Some("icon".into()),
        small_image_text: Some("Icon Text".into()),
        kind: ActivityKind::Listening,
    };

    let value = activity_to_value(&presence);

    assert_eq!(value["state"], "Playing campaign");
    assert_eq!(value["details"], "Mission 5");
    assert_eq!(value["type"], 2);

    let timestamps = value
        .get("timestamps")
        .and_then(Value::as_object)
        .expect("timestamps serialized");
    assert_eq!(timestamps["start"], 1234);
    assert!(timestamps.get("end").is_none());

    let assets = value
        .get("assets")
        .and_then(Value::as_object)
        .expect("assets serialized");
    assert_eq!(assets["large_image"], "cover-art");
    assert_eq!(assets["small_text"], "Icon Text");

    let buttons = value["buttons"].as_array().expect("buttons serialize");
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0]["label"], "Join");
}

#[test]
fn cleared_buttons_are_left_out() {
    let mut presence = PresenceState::initial(0);
    presence.buttons.clear();
    presence.details.clear();

    let value = activity_to_value(&presence);
    assert!(value.get("buttons").is_none());
    assert!(value.get("details").is_none());
    assert_eq!(value["state"], "Default state");
}

#[test]
fn saved_shape_differs_from_wire_shape() {
    let presence = PresenceState::initial(99);
    let saved = serde_json::to_value(&presence).unwrap();
    let wire = activity_to_value(&presence);

    assert_eq!(saved["startTimestamp"], 99);
    assert_eq!(wire["timestamps"]["start"], 99);
    assert_eq!(saved["type"], "playing");
    assert_eq!(wire["type"], 0);
}
