//! Configuration access port trait.

/// Lookups over a sectioned key/value configuration source. Callers parse
/// numeric values themselves so malformed input can be rejected.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
