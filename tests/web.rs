// Browser tests for the DOM adapter. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use viewability_probe::{ViewabilityProbe, ViewabilitySnapshot};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_target(id: &str) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document.create_element("div").unwrap();
    element.set_id(id);
    element
        .set_attribute(
            "style",
            "position:fixed;top:0;left:0;width:100px;height:100px;",
        )
        .unwrap();
    document.body().unwrap().append_child(&element).unwrap();
    element.dyn_into::<HtmlElement>().unwrap()
}

fn snapshot(probe: &ViewabilityProbe) -> ViewabilitySnapshot {
    serde_json::from_str(&probe.snapshot().unwrap()).unwrap()
}

#[wasm_bindgen_test]
fn missing_element_is_rejected() {
    assert!(ViewabilityProbe::new("no-such-element", "{}").is_err());
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    mount_target("bad-config");
    assert!(ViewabilityProbe::new("bad-config", r#"{"threshold":250}"#).is_err());
}

#[wasm_bindgen_test]
fn clicks_on_target_are_counted() {
    let target = mount_target("click-target");
    let probe = ViewabilityProbe::new("click-target", "{}").unwrap();

    target.click();
    target.click();
    target.click();
    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .body()
        .unwrap()
        .click();

    assert_eq!(snapshot(&probe).click_count, 3);
}

#[wasm_bindgen_test]
async fn first_tick_measures_visible_area() {
    mount_target("tick-target");
    let mut probe = ViewabilityProbe::new("tick-target", r#"{"threshold":50}"#).unwrap();

    probe.start();
    assert!(probe.is_running());
    TimeoutFuture::new(50).await;

    assert_eq!(snapshot(&probe).percent_viewable, 100.0);
    probe.log();

    probe.stop();
    assert!(!probe.is_running());
}
