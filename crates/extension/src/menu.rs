//! Wrapping of a node type's extra-menu-options callback.

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Entry { content: String, disabled: bool },
    /// `null` in the host's option list
    Separator,
}

impl MenuItem {
    pub fn entry(content: impl Into<String>) -> Self {
        MenuItem::Entry {
            content: content.into(),
            disabled: false,
        }
    }
}

pub type MenuHook<N> = Arc<dyn Fn(&N, &mut Vec<MenuItem>) + Send + Sync>;
pub type BaseMenu<N, R> = Arc<dyn Fn(&N, &mut Vec<MenuItem>) -> R + Send + Sync>;

/// A base menu-options callback plus extra hooks layered on top of it.
/// Hooks run after the base, in the order they were added, on the same
/// node and option list. The base's return value is what callers get.
pub struct MenuHandlers<N, R = ()> {
    base: BaseMenu<N, R>,
    hooks: Vec<MenuHook<N>>,
}

impl<N, R> Clone for MenuHandlers<N, R> {
    fn clone(&self) -> Self {
        Self {
            base: Arc::clone(&self.base),
            hooks: self.hooks.clone(),
        }
    }
}

impl<N: 'static, R: Default + 'static> Default for MenuHandlers<N, R> {
    fn default() -> Self {
        Self::new(|_: &N, _: &mut Vec<MenuItem>| R::default())
    }
}

impl<N, R> MenuHandlers<N, R> {
    pub fn new<F>(base: F) -> Self
    where
        F: Fn(&N, &mut Vec<MenuItem>) -> R + Send + Sync + 'static,
    {
        Self {
            base: Arc::new(base),
            hooks: Vec::new(),
        }
    }

    pub fn add_menu_handler<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&N, &mut Vec<MenuItem>) + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn extra_menu_options(&self, node: &N, options: &mut Vec<MenuItem>) -> R {
        let result = (self.base)(node, options);
        for hook in &self.hooks {
            hook(node, options);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
