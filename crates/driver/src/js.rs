//! Page-side function declarations.
//!
//! Every script here is a function declaration evaluated through
//! `Runtime.callFunctionOn`; data goes in as structured call arguments,
//! never formatted into the source text. The element scan and structure walk
//! rely on the target app's attribute convention (`data-flutter-key`,
//! `data-flutter-widget-type`).

/// Scans every DOM node for matches against `{key, text, widgetType}`
/// criteria (logical OR), returning descriptors in traversal order.
pub(crate) const SCAN_ELEMENTS: &str = r#"
(query) => {
    const nodes = Array.from(document.querySelectorAll('*'));
    return nodes.filter((el) => {
        if (query.key && el.getAttribute('data-flutter-key') === query.key) return true;
        if (query.text && el.innerText && el.innerText.includes(query.text)) return true;
        if (query.widgetType && el.getAttribute('data-flutter-widget-type') === query.widgetType) return true;
        return false;
    }).map((el) => ({
        tag: el.tagName,
        id: el.id || undefined,
        key: el.getAttribute('data-flutter-key') || undefined,
        widgetType: el.getAttribute('data-flutter-widget-type') || undefined,
        text: el.innerText || undefined,
        rect: el.getBoundingClientRect().toJSON(),
    }));
}
"#;

/// Recursive structure walk from `document.body`; optional fields are left
/// undefined so they drop out of the returned JSON.
pub(crate) const PAGE_STRUCTURE: &str = r#"
() => {
    const walk = (el, depth) => {
        const children = Array.from(el.children).map((child) => walk(child, depth + 1));
        return {
            tag: el.tagName,
            id: el.id || undefined,
            class: el.className || undefined,
            widgetType: el.getAttribute('data-flutter-widget-type') || undefined,
            key: el.getAttribute('data-flutter-key') || undefined,
            text: el.innerText ? el.innerText.trim() : undefined,
            depth,
            children: children.length ? children : undefined,
        };
    };
    return walk(document.body, 0);
}
"#;

/// True when no element has a running animation or a pending transition.
///
/// Inspects inline animation/transform styles only, which is what the target
/// app's animations touch; a broader getAnimations() sweep flags unrelated
/// long-lived compositor animations and never settles.
pub(crate) const IDLE_PROBE: &str = r#"
() => {
    const animated = document.querySelectorAll('[style*="animation"], [style*="transform"]');
    for (const el of animated) {
        const style = window.getComputedStyle(el);
        if (style.animationPlayState === 'running' ||
            (style.transitionProperty !== 'none' && style.transitionDuration !== '0s')) {
            return false;
        }
    }
    return true;
}
"#;

/// Writes the argument to the system clipboard.
pub(crate) const SET_CLIPBOARD: &str = r#"
(text) => navigator.clipboard.writeText(text)
"#;

/// Renderer diagnostics: address, viewport, pixel ratio, and whether the
/// page looks like a Flutter app at all.
pub(crate) const RENDERER_INFO: &str = r#"
() => ({
    url: window.location.href,
    userAgent: navigator.userAgent,
    viewport: { width: window.innerWidth, height: window.innerHeight },
    devicePixelRatio: window.devicePixelRatio,
    hasFlutter: !!window.flutterConfiguration || document.body.hasAttribute('flt-renderer'),
    renderer: document.body.getAttribute('flt-renderer') || undefined,
})
"#;
