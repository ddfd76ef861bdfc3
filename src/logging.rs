/// Conditional logging module for development builds
///
/// The `log!` macro provides informational console logging that is compiled out
/// in production (release) builds by default. Errors and warnings should continue
/// using `web_sys::console::error_*` and `web_sys::console::warn_*` directly.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// Off the browser (native tests, benches) there is no console to write to,
/// so the macro only evaluates its arguments.
///
/// # Examples
///
/// ```rust,ignore
/// use crate::logging::log;
///
/// log!("Derived fallback range for {} trains", train_count);
/// ```
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(all(target_arch = "wasm32", any(debug_assertions, feature = "console_logging")))]
        {
            web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&format!($($arg),+)));
        }
        #[cfg(not(all(target_arch = "wasm32", any(debug_assertions, feature = "console_logging"))))]
        {
            $( let _ = &$arg; )+
        }
    };
}

pub(crate) use log;
