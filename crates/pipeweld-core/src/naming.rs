//! Naming conventions
//!
//! Helpers shared by extraction, placement and binding construction so that
//! every phase derives the same module, client and path names.

/// Convert an identifier to kebab-case.
///
/// `ProcessOrder` -> `process-order`, `HTTPClient` -> `http-client`,
/// `persist_order` -> `persist-order`.
pub fn kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' || c == '-' || c == '.' || c == '$' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }

        if c.is_uppercase() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.map_or(false, |n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out.trim_end_matches('-').to_string()
}

/// Convert an identifier to PascalCase.
///
/// `cache` -> `Cache`, `observe-latency` -> `ObserveLatency`.
pub fn pascal_case(input: &str) -> String {
    input
        .split(|c: char| c == '-' || c == '_' || c == ' ' || c == '.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Simple (unqualified) name of a type reference.
///
/// `com.acme.Order` -> `Order`; generic arguments are dropped.
pub fn simple_name(type_ref: &str) -> &str {
    let without_generics = type_ref.split('<').next().unwrap_or(type_ref);
    without_generics
        .rsplit(|c| c == '.' || c == ':')
        .next()
        .unwrap_or(without_generics)
}

/// Strip `suffix` from `name` unless doing so leaves nothing.
pub fn strip_suffix_nonempty<'a>(name: &'a str, suffix: &str) -> &'a str {
    match name.strip_suffix(suffix) {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("ProcessOrder"), "process-order");
        assert_eq!(kebab_case("A"), "a");
        assert_eq!(kebab_case("HTTPClient"), "http-client");
        assert_eq!(kebab_case("persist_order"), "persist-order");
        assert_eq!(kebab_case("already-kebab"), "already-kebab");
        assert_eq!(kebab_case("Step2Validate"), "step2-validate");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("cache"), "Cache");
        assert_eq!(pascal_case("observe-latency"), "ObserveLatency");
        assert_eq!(pascal_case("Persistence"), "Persistence");
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("com.acme.Order"), "Order");
        assert_eq!(simple_name("Order"), "Order");
        assert_eq!(simple_name("java.util.List<com.acme.Order>"), "List");
        assert_eq!(simple_name("crate::model::Invoice"), "Invoice");
    }

    #[test]
    fn test_strip_suffix_nonempty() {
        assert_eq!(strip_suffix_nonempty("ProcessOrderService", "Service"), "ProcessOrder");
        assert_eq!(strip_suffix_nonempty("Service", "Service"), "Service");
    }
}
