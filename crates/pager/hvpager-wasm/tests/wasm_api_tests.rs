#![cfg(target_arch = "wasm32")]
use hvpager_wasm::{abi_version, HvPager};
use js_sys::{Function, Object, Reflect, JSON};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn set(obj: &Object, name: &str, f: Function) {
    Reflect::set(obj, &JsValue::from_str(name), &f).unwrap();
}

/// In-memory host: records pins and jumps on itself.
fn host(ready: bool) -> JsValue {
    let obj = Object::new();
    set(&obj, "offset", Function::new_no_args("return this.y || 0;"));
    set(
        &obj,
        "viewport",
        Function::new_no_args("return { width: 1280, height: 800 };"),
    );
    set(&obj, "isPinned", Function::new_no_args("return !!this.pinned;"));
    set(&obj, "pin", Function::new_with_args("o", "this.pinned = true; this.y = 0;"));
    set(&obj, "unpin", Function::new_no_args("this.pinned = false;"));
    set(&obj, "scrollInstant", Function::new_with_args("o", "this.y = o;"));
    set(
        &obj,
        "isReady",
        Function::new_no_args(if ready { "return true;" } else { "return false;" }),
    );
    set(&obj, "currentIndex", Function::new_no_args("return this.index || 0;"));
    set(&obj, "speed", Function::new_no_args("return 850;"));
    set(&obj, "jumpTo", Function::new_with_args("i, d, s", "this.index = i;"));
    set(
        &obj,
        "toggleFlag",
        Function::new_with_args("k, c, on", "return k !== 'vision_video';"),
    );
    obj.into()
}

fn field(snapshot: &JsValue, name: &str) -> JsValue {
    Reflect::get(snapshot, &JsValue::from_str(name)).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    assert!(HvPager::new(host(true), JsValue::UNDEFINED).is_ok());
    assert!(HvPager::new(JsValue::NULL, JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    let cfg = JSON::parse(r#"{ "zone": { "disarm_fraction": 0.9, "rearm_fraction": 0.5 } }"#)
        .unwrap();
    assert!(HvPager::new(host(true), cfg).is_err());
}

#[wasm_bindgen_test]
fn wheel_advances_and_menu_is_rejected_while_pending() {
    let h = host(true);
    let mut pager = HvPager::new(h.clone(), JsValue::UNDEFINED).unwrap();
    pager.load(0.0);
    let snap = pager.snapshot().unwrap();
    assert_eq!(field(&snap, "locked").as_bool(), Some(true));

    assert!(pager.on_wheel(10.0, 0, 16.0));
    let snap = pager.snapshot().unwrap();
    assert_eq!(field(&snap, "step").as_string().as_deref(), Some("vision1"));
    assert_eq!(
        Reflect::get(&h, &JsValue::from_str("index")).unwrap().as_f64(),
        Some(1.0)
    );

    let nav = JSON::parse(r#"{ "target": "vision" }"#).unwrap();
    assert_eq!(pager.navigate(nav, 100.0).unwrap(), false);

    pager.tick(900.0);
    let snap = pager.snapshot().unwrap();
    assert!(field(&snap, "pending").is_null() || field(&snap, "pending").is_undefined());
}

#[wasm_bindgen_test]
fn unready_widget_disables_the_pager() {
    let mut pager = HvPager::new(host(false), JsValue::UNDEFINED).unwrap();
    pager.load(0.0);
    assert!(!pager.on_wheel(10.0, 0, 16.0));
    let snap = pager.snapshot().unwrap();
    assert_eq!(field(&snap, "enabled").as_bool(), Some(false));
}

#[wasm_bindgen_test]
fn bad_navigation_payload_is_an_error() {
    let mut pager = HvPager::new(host(true), JsValue::UNDEFINED).unwrap();
    let nav = JSON::parse(r#"{ "target": "nowhere" }"#).unwrap();
    assert!(pager.navigate(nav, 0.0).is_err());
}
