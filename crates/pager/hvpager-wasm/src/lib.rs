use js_sys::{Array, Function, Reflect};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use hvpager::{
    DeltaMode, Flag, MissingTarget, NavTarget, Pager, PagerConfig, Presentation, ScrollSample,
    ScrollSurface, SlideWidget, Target, TouchInput, Viewport, WheelInput,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Host object whose function-valued properties implement the capabilities.
/// Missing functions are treated as no-ops.
#[derive(Clone)]
struct Host {
    obj: JsValue,
}

impl Host {
    fn call(&self, name: &str, args: &[JsValue]) -> Option<JsValue> {
        let f = Reflect::get(&self.obj, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        let argv: Array = args.iter().collect();
        f.apply(&self.obj, &argv).ok()
    }

    fn number(&self, name: &str) -> Option<f64> {
        self.call(name, &[]).and_then(|v| v.as_f64())
    }

    fn flag(&self, name: &str) -> Option<bool> {
        self.call(name, &[]).and_then(|v| v.as_bool())
    }
}

struct JsSurface(Host);

impl ScrollSurface for JsSurface {
    fn offset(&self) -> f64 {
        self.0.number("offset").unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        self.0
            .call("viewport", &[])
            .and_then(|v| swb::from_value(v).ok())
            .unwrap_or_default()
    }

    fn is_pinned(&self) -> bool {
        self.0.flag("isPinned").unwrap_or(false)
    }

    fn set_overflow_suppressed(&mut self, suppressed: bool) {
        self.0
            .call("setOverflowSuppressed", &[JsValue::from_bool(suppressed)]);
    }

    fn pin(&mut self, offset: f64) {
        self.0.call("pin", &[JsValue::from_f64(offset)]);
    }

    fn unpin(&mut self) {
        self.0.call("unpin", &[]);
    }

    fn scroll_instant(&mut self, offset: f64) {
        self.0.call("scrollInstant", &[JsValue::from_f64(offset)]);
    }
}

struct JsWidget(Host);

impl SlideWidget for JsWidget {
    fn is_ready(&self) -> bool {
        self.0.flag("isReady").unwrap_or(false)
    }

    fn current_index(&self) -> usize {
        self.0
            .number("currentIndex")
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as usize)
            .unwrap_or(0)
    }

    fn speed_ms(&self) -> f64 {
        self.0.number("speed").unwrap_or(0.0)
    }

    fn set_speed_ms(&mut self, ms: f64) {
        self.0.call("setSpeed", &[JsValue::from_f64(ms)]);
    }

    fn jump_to(&mut self, index: usize, duration_ms: f64, run_side_effects: bool) {
        self.0.call(
            "jumpTo",
            &[
                JsValue::from_f64(index as f64),
                JsValue::from_f64(duration_ms),
                JsValue::from_bool(run_side_effects),
            ],
        );
    }

    fn set_input_enabled(&mut self, wheel: bool, touch: bool) {
        self.0.call(
            "setInputEnabled",
            &[JsValue::from_bool(wheel), JsValue::from_bool(touch)],
        );
    }
}

/// Presentation callbacks return `false` when the target element is absent.
struct JsPresentation(Host);

impl JsPresentation {
    fn check(target: Target, result: Option<JsValue>) -> Result<(), MissingTarget> {
        match result.and_then(|v| v.as_bool()) {
            Some(false) => Err(MissingTarget(target.key())),
            _ => Ok(()),
        }
    }
}

impl Presentation for JsPresentation {
    fn toggle_flag(&mut self, target: Target, flag: Flag, on: bool) -> Result<(), MissingTarget> {
        let r = self.0.call(
            "toggleFlag",
            &[
                JsValue::from_str(&target.key()),
                JsValue::from_str(flag.class_name()),
                JsValue::from_bool(on),
            ],
        );
        Self::check(target, r)
    }

    fn set_attribute(
        &mut self,
        target: Target,
        name: &str,
        value: &str,
    ) -> Result<(), MissingTarget> {
        let r = self.0.call(
            "setAttribute",
            &[
                JsValue::from_str(&target.key()),
                JsValue::from_str(name),
                JsValue::from_str(value),
            ],
        );
        Self::check(target, r)
    }
}

/// JS-facing pager. Every input takes a millisecond timestamp
/// (`performance.now()`); `tick` belongs in the host's frame callback.
///
/// Forward the slide widget's lifecycle notifications asynchronously
/// (e.g. `queueMicrotask`): the pager commands the widget from inside its own
/// calls, and re-entering it synchronously is rejected by wasm-bindgen.
#[wasm_bindgen]
pub struct HvPager {
    core: Pager<JsSurface, JsWidget, JsPresentation>,
}

#[wasm_bindgen]
impl HvPager {
    /// Create a pager over a host object. Pass a JSON config object or
    /// undefined/null for defaults.
    /// Example:
    ///   new HvPager(host, { timing: { settle_ms: 400 } })
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue, config: JsValue) -> Result<HvPager, JsError> {
        #[cfg(feature = "console_error")]
        console_error_panic_hook::set_once();

        if jsvalue_is_undefined_or_null(&host) {
            return Err(JsError::new("host object is required"));
        }
        let cfg: PagerConfig = if jsvalue_is_undefined_or_null(&config) {
            PagerConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let host = Host { obj: host };
        let core = Pager::new(
            cfg,
            JsSurface(host.clone()),
            JsWidget(host.clone()),
            JsPresentation(host),
        )
        .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(HvPager { core })
    }

    pub fn load(&mut self, now: f64) {
        self.core.load(now);
    }

    /// Returns true when the host must call `preventDefault()`.
    #[wasm_bindgen(js_name = on_wheel)]
    pub fn on_wheel(&mut self, delta_y: f64, delta_mode: u32, now: f64) -> bool {
        let input = WheelInput {
            delta_y,
            mode: DeltaMode::from_dom(delta_mode),
        };
        self.core.on_wheel(input, now).is_consumed()
    }

    #[wasm_bindgen(js_name = on_touch_start)]
    pub fn on_touch_start(&mut self, y: f64, now: f64) -> bool {
        self.core.on_touch(TouchInput::Start { y }, now).is_consumed()
    }

    #[wasm_bindgen(js_name = on_touch_move)]
    pub fn on_touch_move(&mut self, y: f64, now: f64) -> bool {
        self.core.on_touch(TouchInput::Move { y }, now).is_consumed()
    }

    #[wasm_bindgen(js_name = on_touch_end)]
    pub fn on_touch_end(&mut self, now: f64) {
        self.core.on_touch(TouchInput::End, now);
    }

    #[wasm_bindgen(js_name = on_touch_cancel)]
    pub fn on_touch_cancel(&mut self, now: f64) {
        self.core.on_touch(TouchInput::Cancel, now);
    }

    /// `body_top` is the first body section's top relative to the viewport.
    #[wasm_bindgen(js_name = on_scroll)]
    pub fn on_scroll(&mut self, offset: f64, body_top: Option<f64>, now: f64) {
        self.core.on_scroll(ScrollSample { offset, body_top }, now);
    }

    #[wasm_bindgen(js_name = on_viewport_change)]
    pub fn on_viewport_change(&mut self, now: f64) {
        self.core.on_viewport_change(now);
    }

    /// Navigate to `{ target: "top" | "vision" }` or `{ target: "body", offset }`.
    /// Returns false when the intent was rejected.
    pub fn navigate(&mut self, target: JsValue, now: f64) -> Result<bool, JsError> {
        let target: NavTarget =
            swb::from_value(target).map_err(|e| JsError::new(&format!("navigate error: {e}")))?;
        Ok(self.core.navigate(target, now).is_ok())
    }

    #[wasm_bindgen(js_name = on_slide_change_start)]
    pub fn on_slide_change_start(&mut self, index: u32, now: f64) {
        self.core.on_slide_change_start(index as usize, now);
    }

    #[wasm_bindgen(js_name = on_slide_change_end)]
    pub fn on_slide_change_end(&mut self, index: u32, now: f64) {
        self.core.on_slide_change_end(index as usize, now);
    }

    pub fn tick(&mut self, now: f64) {
        self.core.tick(now);
    }

    #[wasm_bindgen(js_name = release_stale_locks)]
    pub fn release_stale_locks(&mut self, now: f64) {
        self.core.release_stale_locks(now);
    }

    pub fn detach(&mut self, now: f64) {
        self.core.detach(now);
    }

    /// Current state as a plain JS object.
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.snapshot())
            .map_err(|e| JsError::new(&format!("snapshot error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
