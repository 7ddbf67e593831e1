/// Route of the checkout step the widgets are built for.
pub const DEFAULT_CHECKOUT_ROUTE: &str = "/objednavka/krok-2/";

/// Activation gate: `true` when `path` is the checkout step `route`.
///
/// Matches the route exactly or anywhere inside the path (ignoring the
/// route's surrounding slashes), so locale prefixes still activate.
#[must_use]
pub fn is_checkout_page(path: &str, route: &str) -> bool {
    if path == route {
        return true;
    }
    let core = route.trim_matches('/');
    !core.is_empty() && path.contains(core)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_route_matches() {
        assert!(is_checkout_page("/objednavka/krok-2/", DEFAULT_CHECKOUT_ROUTE));
    }

    #[test]
    fn route_without_trailing_slash_matches() {
        assert!(is_checkout_page("/objednavka/krok-2", DEFAULT_CHECKOUT_ROUTE));
        assert!(is_checkout_page("/sk/objednavka/krok-2/", DEFAULT_CHECKOUT_ROUTE));
    }

    #[test]
    fn other_steps_do_not_match() {
        assert!(!is_checkout_page("/objednavka/krok-1/", DEFAULT_CHECKOUT_ROUTE));
        assert!(!is_checkout_page("/kosik/", DEFAULT_CHECKOUT_ROUTE));
    }

    #[test]
    fn empty_route_only_matches_empty_path() {
        assert!(!is_checkout_page("/anything", "/"));
        assert!(is_checkout_page("/", "/"));
    }
}
