// Browser host: DOM layout reads, prefixed Page Visibility API, listeners and the
// spawn_local tick loop. Pure logic stays in the other modules; this file is plumbing.
// See DESIGN.md: Browser host

use std::rc::Rc;
use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use tokio_util::sync::CancellationToken;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, Performance, Window};

use crate::error::ProbeError;
use crate::focus::{VisibilityHandler, VisibilitySignal};
use crate::scheduler::{Clock, Scheduler, Sleeper};
use crate::tracker::{watch_visibility, LayoutSource, SharedTracker, ViewabilityTracker};
use crate::types::{
    ProbeConfig, Rect, Timestamp, ViewabilitySnapshot, ViewportSize, VisibilityState,
};

/// Vendor variants of the Page Visibility API, in detection order.
const VISIBILITY_APIS: [VisibilityApi; 3] = [
    VisibilityApi {
        hidden_property: "hidden",
        event: "visibilitychange",
    },
    VisibilityApi {
        hidden_property: "msHidden",
        event: "msvisibilitychange",
    },
    VisibilityApi {
        hidden_property: "webkitHidden",
        event: "webkitvisibilitychange",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisibilityApi {
    hidden_property: &'static str,
    event: &'static str,
}

fn detect_visibility_api(document: &Document) -> Option<VisibilityApi> {
    VISIBILITY_APIS.into_iter().find(|api| {
        js_sys::Reflect::get(document, &JsValue::from_str(api.hidden_property))
            .map(|value| !value.is_undefined())
            .unwrap_or(false)
    })
}

/// DOM event listener, removed from its target when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new<F>(target: EventTarget, event: &'static str, handler: F) -> Result<Self, ProbeError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|_| ProbeError::Listener(event.to_string()))?;
        Ok(Listener {
            target,
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let callback = self.callback.as_ref().unchecked_ref();
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, callback);
    }
}

/// Page visibility signal backed by whichever vendor API the document exposes.
pub struct DocumentVisibility {
    document: Document,
    api: Option<VisibilityApi>,
    listeners: Vec<Listener>,
}

impl DocumentVisibility {
    pub fn new(document: Document) -> Self {
        let api = detect_visibility_api(&document);
        DocumentVisibility {
            document,
            api,
            listeners: Vec::new(),
        }
    }
}

impl VisibilitySignal for DocumentVisibility {
    fn supports_visibility_signal(&self) -> bool {
        self.api.is_some()
    }

    fn on_visibility_change(&mut self, mut handler: VisibilityHandler) -> Result<(), ProbeError> {
        let api = self
            .api
            .ok_or_else(|| ProbeError::HostUnavailable("page visibility API".to_string()))?;
        let document = self.document.clone();
        let key = JsValue::from_str(api.hidden_property);

        let listener = Listener::new(self.document.clone().into(), api.event, move |_event| {
            let hidden = js_sys::Reflect::get(&document, &key)
                .ok()
                .and_then(|value| value.as_bool())
                .unwrap_or(false);
            handler(VisibilityState::from_hidden(hidden));
        })?;
        self.listeners.push(listener);
        Ok(())
    }
}

/// Reads the target's bounding client rect and the window's inner size.
pub struct DomLayout {
    window: Window,
    element: Element,
}

impl LayoutSource for DomLayout {
    fn target_rect(&self) -> Rect {
        let rect = self.element.get_bounding_client_rect();
        Rect::new(rect.top(), rect.bottom(), rect.left(), rect.right())
    }

    fn viewport(&self) -> ViewportSize {
        let read = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        ViewportSize::new(
            read(self.window.inner_width()),
            read(self.window.inner_height()),
        )
    }
}

/// Monotonic clock from `performance.now()`, falling back to `Date.now()`.
#[derive(Clone)]
pub struct PerformanceClock {
    performance: Option<Performance>,
}

impl PerformanceClock {
    pub fn new(window: &Window) -> Self {
        PerformanceClock {
            performance: window.performance(),
        }
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> Timestamp {
        let ms = match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        };
        Timestamp::from_millis_f64(ms)
    }
}

/// `setTimeout`-backed sleeper.
pub struct TimeoutSleeper;

impl Sleeper for TimeoutSleeper {
    type Sleep = TimeoutFuture;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        TimeoutFuture::new(duration.as_millis().min(u32::MAX as u128) as u32)
    }
}

/// WASM-exposed viewability probe for one element.
///
/// # Example JSON Config
/// ```json
/// { "threshold": 50, "suppress_click_default": true }
/// ```
#[wasm_bindgen]
pub struct ViewabilityProbe {
    tracker: SharedTracker,
    layout: Rc<DomLayout>,
    clock: PerformanceClock,
    running: Option<CancellationToken>,
    _visibility: DocumentVisibility,
    _click: Listener,
}

#[wasm_bindgen]
impl ViewabilityProbe {
    /// Create a probe for the element with id `element_id`.
    ///
    /// Fails if the element does not exist or the config is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str, config_json: &str) -> Result<ViewabilityProbe, JsValue> {
        Ok(Self::attach(element_id, config_json)?)
    }

    /// Start ticking. The first evaluation runs immediately. No-op while running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let token = CancellationToken::new();
        let scheduler = Scheduler::with_token(self.clock.clone(), TimeoutSleeper, token.clone());
        let tracker = Rc::clone(&self.tracker);
        let layout = Rc::clone(&self.layout);
        wasm_bindgen_futures::spawn_local(async move {
            scheduler.run(&tracker, layout.as_ref()).await;
        });
        self.running = Some(token);
    }

    /// Stop ticking. Metrics are kept and can still be queried.
    pub fn stop(&mut self) {
        if let Some(token) = self.running.take() {
            token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Current metrics as JSON:
    /// `{ is_viewable, percent_viewable, viewable_time_seconds, click_count }`.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.current_snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Write the human-readable report to the browser console.
    pub fn log(&self) {
        let report = self.current_snapshot().to_string();
        web_sys::console::log_1(&JsValue::from_str(&report));
    }
}

impl ViewabilityProbe {
    fn attach(element_id: &str, config_json: &str) -> Result<Self, ProbeError> {
        let config = ProbeConfig::from_json(config_json)?;
        let window =
            web_sys::window().ok_or_else(|| ProbeError::HostUnavailable("window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| ProbeError::HostUnavailable("document".to_string()))?;
        let element = document
            .get_element_by_id(element_id)
            .ok_or_else(|| ProbeError::MissingElement(element_id.to_string()))?;

        let tracker = ViewabilityTracker::new(&config)?.into_shared();

        let mut visibility = DocumentVisibility::new(document);
        watch_visibility(&mut visibility, &tracker)?;

        let handle = Rc::clone(&tracker);
        let suppress_default = config.suppress_click_default;
        let click = Listener::new(element.clone().into(), "click", move |event: Event| {
            if suppress_default {
                event.prevent_default();
            }
            handle.borrow_mut().on_click();
        })?;

        tracing::info!(element_id, threshold = config.threshold, "viewability probe attached");

        Ok(ViewabilityProbe {
            tracker,
            clock: PerformanceClock::new(&window),
            layout: Rc::new(DomLayout { window, element }),
            running: None,
            _visibility: visibility,
            _click: click,
        })
    }

    fn current_snapshot(&self) -> ViewabilitySnapshot {
        self.tracker.borrow().snapshot(self.clock.now())
    }
}

impl Drop for ViewabilityProbe {
    fn drop(&mut self) {
        self.stop();
    }
}
