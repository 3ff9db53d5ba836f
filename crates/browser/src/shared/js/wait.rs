pub const NEXT_FRAME: &str = r#"
() => new Promise((resolve) => requestAnimationFrame(() => resolve(true)))
"#;
