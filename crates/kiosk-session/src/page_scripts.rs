//! Page-side scripts shipped with the worker.
//!
//! They only ever talk back through `window.ipc.postMessage` with the plain
//! strings from [`crate::protocol`].

/// Pull down from the top of a page that is scrolled to the top.
pub const PULL_TO_REFRESH_SCRIPT: &str = r#"
(function () {
    var THRESHOLD = 120;
    var startY = null;
    function atTop() {
        return (window.scrollY || document.documentElement.scrollTop || 0) <= 0;
    }
    window.addEventListener('touchstart', function (e) {
        startY = (e.touches.length === 1 && atTop()) ? e.touches[0].clientY : null;
    }, { passive: true });
    window.addEventListener('touchend', function (e) {
        if (startY === null) { return; }
        var dy = e.changedTouches[0].clientY - startY;
        startY = null;
        if (dy > THRESHOLD) { window.ipc.postMessage('PULL_TO_REFRESH'); }
    }, { passive: true });
    window.addEventListener('touchcancel', function () { startY = null; }, { passive: true });
})();
"#;

/// Ask for the on-screen keyboard when an editable element is touched or
/// receives focus right after a touch.
pub const KEYBOARD_REQUEST_SCRIPT: &str = r#"
(function () {
    var TEXT_TYPES = ['text', 'search', 'email', 'url', 'tel', 'password', 'number'];
    var lastTouch = 0;
    function editable(el) {
        if (!el || el.disabled || el.readOnly) { return false; }
        if (el.isContentEditable) { return true; }
        if (el.tagName === 'TEXTAREA') { return true; }
        if (el.tagName === 'INPUT') {
            return TEXT_TYPES.indexOf((el.type || 'text').toLowerCase()) >= 0;
        }
        return false;
    }
    document.addEventListener('touchstart', function () {
        lastTouch = Date.now();
    }, { capture: true, passive: true });
    document.addEventListener('touchend', function (e) {
        if (editable(e.target)) { window.ipc.postMessage('SHOW_OSK'); }
    }, { capture: true, passive: true });
    document.addEventListener('focusin', function (e) {
        if (Date.now() - lastTouch < 1000 && editable(e.target)) {
            window.ipc.postMessage('SHOW_OSK');
        }
    }, true);
})();
"#;

/// Exit control overlay. Hidden until the session says otherwise.
pub const EXIT_CONTROL_SCRIPT: &str = r#"
(function () {
    var state = { visible: false, button: null };
    function apply() {
        if (state.button) { state.button.style.display = state.visible ? 'block' : 'none'; }
    }
    function mount() {
        if (state.button || !document.body) { return; }
        var b = document.createElement('button');
        b.textContent = '✕';
        b.setAttribute('aria-label', 'Exit kiosk');
        b.style.cssText = 'position:fixed;top:12px;right:12px;z-index:2147483647;'
            + 'width:56px;height:56px;border-radius:28px;border:none;'
            + 'background:rgba(0,0,0,0.55);color:#fff;font-size:28px;display:none;';
        b.addEventListener('click', function (e) {
            e.preventDefault();
            e.stopPropagation();
            window.ipc.postMessage('EXIT_KIOSK');
        });
        document.body.appendChild(b);
        state.button = b;
        apply();
    }
    window.__kioskExit = {
        setVisible: function (v) { state.visible = !!v; mount(); apply(); }
    };
    if (document.readyState === 'loading') {
        document.addEventListener('DOMContentLoaded', mount);
    } else {
        mount();
    }
})();
"#;

/// Push exit control visibility into the current document.
pub fn exit_control_visibility(visible: bool) -> String {
    format!("window.__kioskExit && window.__kioskExit.setVisible({visible});")
}
