use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wasm_bindgen::JsCast;

/// One-shot `setTimeout`. Returns the timer id, or 0 without a window.
pub(crate) fn set_timeout(delay_ms: i32, f: impl FnOnce() + 'static) -> i32 {
    let Some(win) = web_sys::window() else {
        return 0;
    };
    let cb = wasm_bindgen::closure::Closure::once_into_js(f);
    win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay_ms.max(0))
        .unwrap_or(0)
}

pub(crate) fn clear_timeout(id: i32) {
    if id == 0 {
        return;
    }
    if let Some(win) = web_sys::window() {
        win.clear_timeout_with_handle(id);
    }
}

/// Named pending timers; re-arming a slot clears its previous timer.
#[derive(Clone, Default)]
pub(crate) struct TimerSlots {
    slots: Arc<Mutex<HashMap<&'static str, i32>>>,
}

impl TimerSlots {
    pub fn schedule(&self, slot: &'static str, delay_ms: i32, f: impl FnOnce() + 'static) {
        self.cancel(slot);

        let slots = self.slots.clone();
        let tid = set_timeout(delay_ms, move || {
            if let Ok(mut map) = slots.lock() {
                map.remove(slot);
            }
            f();
        });

        if let Ok(mut map) = self.slots.lock() {
            map.insert(slot, tid);
        }
    }

    pub fn cancel(&self, slot: &'static str) {
        if let Ok(mut map) = self.slots.lock() {
            if let Some(tid) = map.remove(slot) {
                clear_timeout(tid);
            }
        }
    }

    pub fn cancel_all(&self) {
        if let Ok(mut map) = self.slots.lock() {
            for (_, tid) in map.drain() {
                clear_timeout(tid);
            }
        }
    }
}
