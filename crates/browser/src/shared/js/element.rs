pub const HAS_MATCHING: &str = r#"
(tag, attr, url, exact) => Array.from(document.getElementsByTagName(tag)).some(el => {
    const value = el.getAttribute(attr);
    if (value === null) return false;
    return exact ? value === url : value.startsWith(url);
})
"#;

/// Appends the element and parks its settle promise under `key`
pub const INSERT_ELEMENT: &str = r#"
(key, desc) => {
    const el = document.createElement(desc.tag);
    if (desc.tag === 'link') {
        el.setAttribute('rel', 'stylesheet');
        el.setAttribute('type', desc.mimeType);
    } else {
        el.type = desc.mimeType;
        el.async = desc.isAsync;
    }
    window.__siePending = window.__siePending || {};
    window.__siePending[key] = new Promise((resolve) => {
        el.addEventListener('load', () => resolve('load'));
        el.addEventListener('error', () => resolve('error'));
    });
    el.setAttribute(desc.attr, desc.url);
    const parent = desc.placement === 'body' ? document.body : document.head;
    parent.appendChild(el);
    return true;
}
"#;

/// Resolves with 'load' or 'error' once the element parked under `key` settles
pub const AWAIT_ELEMENT: &str = r#"
(key) => {
    const pending = (window.__siePending || {})[key];
    if (!pending) return 'error';
    return pending.then((event) => {
        delete window.__siePending[key];
        return event;
    });
}
"#;
