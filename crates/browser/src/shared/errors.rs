use sie_core::RegistryError;

pub fn to_registry_error(e: impl std::fmt::Display, action: &str) -> RegistryError {
    let s = e.to_string();
    if s.contains("timeout") || s.contains("Timeout") {
        RegistryError::new(action, format!("timed out: {}", s))
    } else if s.contains("Cannot find context") || s.contains("Execution context was destroyed") {
        RegistryError::new(action, format!("page navigated away: {}", s))
    } else {
        RegistryError::new(action, s)
    }
}
