//! Canonical names derived from Rust types.
//!
//! Providers registered without an explicit key are stored under the name of
//! the type they produce, and resolutions without a key look up the name of the
//! type they request. Both sides go through [`type_key`] so the two agree.
//!
//! `std::any::type_name` returns fully qualified paths
//! (`alloc::sync::Arc<dyn my_app::services::Mailer>`); keys drop the module
//! paths and one outer shared-pointer wrapper so the same service keys as
//! `Mailer` regardless of where it is declared or how it is wrapped.

/// Pointer types that are peeled off the outermost layer of a key.
const WRAPPERS: &[&str] = &["Arc<", "Box<", "Rc<"];

/// Auto traits and lifetimes that never contribute to a key.
const AUTO_BOUNDS: &[&str] = &["Send", "Sync", "Unpin", "'static"];

/// Returns the default provider key for `T`.
///
/// # Examples
///
/// ```
/// use inject_container::type_key;
/// use std::sync::Arc;
///
/// trait Mailer: Send + Sync {}
///
/// assert_eq!(type_key::<String>(), "String");
/// assert_eq!(type_key::<Arc<dyn Mailer>>(), "Mailer");
/// assert_eq!(type_key::<Arc<dyn Mailer + Send + Sync>>(), "Mailer");
/// assert_eq!(type_key::<Vec<u8>>(), "Vec<u8>");
/// ```
pub fn type_key<T: ?Sized>() -> String {
    canonical_key(&short_type_name::<T>())
}

/// Returns `T`'s type name with every module path removed.
///
/// Used wherever a type is reported back to the caller, e.g. the `expected`
/// and `actual` fields of a type mismatch.
pub fn short_type_name<T: ?Sized>() -> String {
    strip_paths(std::any::type_name::<T>())
}

fn strip_paths(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();

    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            segment.push(ch);
        } else {
            flush_segment(&mut out, &mut segment);
            out.push(ch);
        }
    }
    flush_segment(&mut out, &mut segment);

    out
}

fn flush_segment(out: &mut String, segment: &mut String) {
    let last = segment.rsplit("::").next().unwrap_or_default();
    out.push_str(last);
    segment.clear();
}

fn canonical_key(name: &str) -> String {
    let inner = WRAPPERS
        .iter()
        .find_map(|wrapper| {
            name.strip_prefix(wrapper)
                .and_then(|rest| rest.strip_suffix('>'))
        })
        .unwrap_or(name);

    match inner.strip_prefix("dyn ") {
        Some(object) => object
            .split(" + ")
            .filter(|bound| !AUTO_BOUNDS.contains(bound))
            .collect::<Vec<_>>()
            .join(" + "),
        None => inner.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    trait Repository: Send + Sync {}

    struct InMemoryRepository;

    #[test]
    fn test_primitives_keep_their_name() {
        assert_eq!(type_key::<i32>(), "i32");
        assert_eq!(type_key::<bool>(), "bool");
        assert_eq!(type_key::<str>(), "str");
    }

    #[test]
    fn test_module_paths_are_stripped() {
        assert_eq!(type_key::<String>(), "String");
        assert_eq!(type_key::<InMemoryRepository>(), "InMemoryRepository");
        assert_eq!(
            type_key::<HashMap<String, Vec<u8>>>(),
            "HashMap<String, Vec<u8>>"
        );
    }

    #[test]
    fn test_shared_trait_objects_key_as_the_trait() {
        assert_eq!(type_key::<Arc<dyn Repository>>(), "Repository");
        assert_eq!(type_key::<Box<dyn Repository>>(), "Repository");
        assert_eq!(
            type_key::<Arc<dyn Repository + Send + Sync>>(),
            "Repository"
        );
    }

    #[test]
    fn test_shared_concrete_types_key_as_the_type() {
        assert_eq!(type_key::<Arc<InMemoryRepository>>(), "InMemoryRepository");
        assert_eq!(type_key::<Arc<String>>(), "String");
    }

    #[test]
    fn test_only_outer_wrapper_is_removed() {
        assert_eq!(type_key::<Arc<Arc<String>>>(), "Arc<String>");
        assert_eq!(type_key::<Vec<Arc<String>>>(), "Vec<Arc<String>>");
    }

    #[test]
    fn test_short_type_name_keeps_wrappers() {
        assert_eq!(
            short_type_name::<Arc<dyn Repository>>(),
            "Arc<dyn Repository>"
        );
        assert_eq!(short_type_name::<Option<String>>(), "Option<String>");
    }
}
