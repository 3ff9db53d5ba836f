pub mod element;
pub mod wait;

use serde_json::{Value, json};
use sie_core::{Placement, ResourceDescriptor};

pub fn build_js_call(func: &str, args: &[Value]) -> String {
    let args_str = args.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("({})({})", func, args_str)
}

/// Argument object consumed by [`element::INSERT_ELEMENT`]
pub fn descriptor_arg(descriptor: &ResourceDescriptor) -> Value {
    json!({
        "tag": descriptor.kind.tag(),
        "attr": descriptor.kind.url_attr(),
        "url": descriptor.url,
        "mimeType": descriptor.mime_type,
        "isAsync": descriptor.is_async,
        "placement": match descriptor.placement {
            Placement::Head => "head",
            Placement::Body => "body",
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sie_core::ResourceKind;

    #[test]
    fn js_call_quotes_arguments() {
        let js = build_js_call("(a, b) => a + b", &[json!("x\"y"), json!(true)]);
        assert_eq!(js, r#"((a, b) => a + b)("x\"y", true)"#);
    }

    #[test]
    fn descriptor_arg_uses_kind_attributes() {
        let d = ResourceDescriptor::new("/s.js", ResourceKind::Script)
            .with_async(true)
            .with_placement(Placement::Body);
        let arg = descriptor_arg(&d);
        assert_eq!(arg["tag"], "script");
        assert_eq!(arg["attr"], "src");
        assert_eq!(arg["isAsync"], true);
        assert_eq!(arg["placement"], "body");
    }
}
