//! End-to-end logging scenarios.

use eme_logger::prelude::*;

fn video_element() -> Value {
    Object::new("HTMLVideoElement")
        .with("id", "")
        .with("classList", Value::array(vec![]))
        .into()
}

fn test_event() -> ObjectRef {
    let proto = Object::new("Event")
        .with("type", "Test")
        .with("timeStamp", 0.0)
        .with("target", Object::new("HTMLDocument"))
        .into_ref();
    Object::new("Event")
        .with("isTrusted", false)
        .with_prototype(proto)
        .into_ref()
}

fn assert_well_formed(item: &LogItem) {
    assert_eq!(item.names.len(), item.values.len());
    assert!(!item.names.iter().any(|n| n == "title"));
    for value in &item.values {
        if let Some(child) = value.as_item() {
            assert_well_formed(child);
        }
    }
}

#[test]
fn method_call_is_flattened() {
    let logger = EmeLogger::with_defaults().unwrap();

    let call = MethodCall::new("TestMethodCall")
        .args(vec![
            Value::from("arg 1"),
            Value::array(vec![Value::from("arg 2 array")]),
        ])
        .labels(["Argument 1", "Argument 2"])
        .with_result("Result")
        .with_target(video_element());

    let item = logger.log_method_call(&call).unwrap();
    assert_well_formed(&item);

    assert_eq!(item.title, "TestMethodCall");
    assert_eq!(
        item.names,
        vec!["Argument 1", "Argument 2", "returned", "target", "formattedMessage"]
    );

    let args = item.values[1].as_item().unwrap();
    assert_eq!(args.title, "Array");
    assert_eq!(args.names, vec!["0"]);
    assert_eq!(args.values, vec![LogValue::from("arg 2 array")]);

    let target = item.values[3].as_item().unwrap();
    assert_eq!(target.title, "HTMLVideoElement");
    assert_eq!(target.names, vec!["id", "classes"]);
    assert_eq!(target.values, vec![LogValue::from(""), LogValue::from("")]);

    assert!(item.values[4].is_undefined());
}

#[test]
fn event_is_flattened() {
    let logger = EmeLogger::with_defaults().unwrap();
    let item = logger.log_event(&test_event()).unwrap();
    assert_well_formed(&item);

    assert_eq!(item.title, "TestEvent");
    assert_eq!(item.names, vec!["event", "timeStamp", "target", "formattedMessage"]);

    let event = item.values[0].as_item().unwrap();
    assert_eq!(event.title, "Event");
    assert_eq!(event.names, vec!["isTrusted"]);
    assert_eq!(event.values, vec![LogValue::Bool(false)]);

    assert!(item.values[1].as_str().is_some());

    let target = item.values[2].as_item().unwrap();
    assert_eq!(target.title, "HTMLDocument");
    assert_eq!(target.names, vec!["id"]);
    assert!(target.values[0].is_undefined());
}

#[test]
fn promise_result_is_flattened() {
    let logger = EmeLogger::with_defaults().unwrap();
    let result = Object::plain().with("result", "Result Object");

    let item = logger
        .log_promise_result("TestPromise", PromiseStatus::Resolved, result)
        .unwrap();
    assert_well_formed(&item);

    assert_eq!(item.names, vec!["status", "result"]);
    assert_eq!(item.values[0], LogValue::from("resolved"));

    let inner = item.values[1].as_item().unwrap();
    assert_eq!(inner.title, "Object");
    assert_eq!(inner.names, vec!["result"]);
    assert_eq!(inner.values, vec![LogValue::from("Result Object")]);
}

#[test]
fn clear_key_update_is_formatted() {
    let logger = EmeLogger::builder()
        .with_builtin_formatters()
        .build()
        .unwrap();

    let license = br#"{"keys":[{"kty":"oct","k":"c2VjcmV0","kid":"a2lk"}],"type":"temporary"}"#;
    let response = Value::uint8_array(license.to_vec());
    let call = MethodCall::new("update")
        .arg("response", response.clone())
        .with_data(response)
        .with_key_system("org.w3.clearkey");

    let item = logger.log_method_call(&call).unwrap();
    let message = item.get("formattedMessage").unwrap().as_str().unwrap();

    let mut lines = message.lines();
    assert_eq!(lines.next(), Some("Clear Key license (temporary)"));
    assert_eq!(lines.next(), Some("  key: kid=a2lk kty=oct"));
    assert!(lines.next().unwrap().starts_with("0000: 7b 22 6b 65"));
    assert!(!message.contains("c2VjcmV0"));
}

#[test]
fn loop_index_separator_with_skipped_formatter() {
    let logger = EmeLogger::builder()
        .with_builtin_formatters()
        .build()
        .unwrap();

    let call = MethodCall::new("generateRequest")
        .with_data(Value::array_buffer(vec![0u8, 0, 0, 0x20]))
        .with_key_system("com.widevine.alpha");
    let item = logger.log_method_call(&call).unwrap();

    // Only the hex dump handles generateRequest; it is first in its list.
    assert_eq!(
        item.get("formattedMessage").unwrap().as_str(),
        Some("0000: 00 00 00 20")
    );

    let event = Object::new("MediaKeyMessageEvent")
        .with("type", "message")
        .with("message", Value::array_buffer(vec![0x08u8]))
        .with("keySystem", "com.widevine.alpha")
        .into_ref();
    let item = logger.log_event(&event).unwrap();
    assert_eq!(
        item.get("formattedMessage").unwrap().as_str(),
        Some("\n0000: 08")
    );
}

#[test]
fn between_contributions_separator() {
    let logger = EmeLogger::builder()
        .with_builtin_formatters()
        .with_resolver_config(
            ResolverConfig::new().with_separator(SeparatorPolicy::BetweenContributions),
        )
        .build()
        .unwrap();

    let event = Object::new("MediaKeyMessageEvent")
        .with("type", "message")
        .with("message", Value::array_buffer(vec![0x08u8]))
        .with("keySystem", "com.widevine.alpha")
        .into_ref();
    let item = logger.log_event(&event).unwrap();
    assert_eq!(
        item.get("formattedMessage").unwrap().as_str(),
        Some("0000: 08")
    );
}

#[test]
fn cyclic_argument_is_rejected() {
    let logger = EmeLogger::with_defaults().unwrap();

    let session = Object::new("MediaKeySession").into_ref();
    session.set("self", session.clone());

    let err = logger
        .log_method_call(&MethodCall::new("close").with_target(session.clone()).arg("s", session))
        .unwrap_err();

    match err {
        LoggerError::Flatten(FlattenError::CycleDetected { path }) => {
            assert_eq!(path, "$.s.self");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn items_serialize_to_json() {
    let logger = EmeLogger::with_defaults().unwrap();
    let item = logger
        .log_promise_result("createMediaKeys", "rejected", Value::Undefined)
        .unwrap();

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["title"], "createMediaKeys");
    assert_eq!(json["names"], serde_json::json!(["status", "result"]));
    assert_eq!(json["values"], serde_json::json!(["rejected", null]));
}
