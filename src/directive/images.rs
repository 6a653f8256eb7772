//! Static image-key table for `||IMAGE:key||` directives.

const WORKPLACE_IMAGES: &[(&str, &str)] = &[
    (
        "level2",
        "https://images.pexels.com/photos/21853674/pexels-photo-21853674.jpeg",
    ),
    (
        "chemicals",
        "https://images.pexels.com/photos/3735732/pexels-photo-3735732.jpeg",
    ),
    (
        "cloths",
        "https://images.pexels.com/photos/7876767/pexels-photo-7876767.jpeg",
    ),
    (
        "meeting",
        "https://images.pexels.com/photos/18033206/pexels-photo-18033206.jpeg",
    ),
    // Aliases the model tends to emit.
    (
        "cloths_wear",
        "https://images.pexels.com/photos/7876767/pexels-photo-7876767.jpeg",
    ),
    (
        "meeting_room",
        "https://images.pexels.com/photos/18033206/pexels-photo-18033206.jpeg",
    ),
    (
        "mops",
        "https://images.pexels.com/photos/7108400/pexels-photo-7108400.jpeg?auto=compress&cs=tinysrgb&w=600",
    ),
];

const SAFETY_IMAGES: &[(&str, &str)] = &[
    (
        "broken glass",
        "https://images.unsplash.com/photo-1585938389612-a552a28d6914?auto=format&fit=crop&q=80&w=600",
    ),
    (
        "broom",
        "https://images.unsplash.com/photo-1585938389612-a552a28d6914?auto=format&fit=crop&q=80&w=600",
    ),
    (
        "toilet",
        "https://images.unsplash.com/photo-1584622050111-993a426fbf0a?auto=format&fit=crop&q=80&w=600",
    ),
    (
        "brush",
        "https://images.unsplash.com/photo-1584622050111-993a426fbf0a?auto=format&fit=crop&q=80&w=600",
    ),
    (
        "gloves",
        "https://images.unsplash.com/photo-1584036561566-b93241b4d714?auto=format&fit=crop&q=80&w=600",
    ),
    (
        "waste",
        "https://images.unsplash.com/photo-1532996122724-e3c354a0b15b?auto=format&fit=crop&q=80&w=600",
    ),
    (
        "bin",
        "https://images.unsplash.com/photo-1532996122724-e3c354a0b15b?auto=format&fit=crop&q=80&w=600",
    ),
];

/// Resolve an already-normalised key. Workplace images win over the safety set.
pub fn lookup(key: &str) -> Option<&'static str> {
    WORKPLACE_IMAGES
        .iter()
        .chain(SAFETY_IMAGES)
        .find(|(k, _)| *k == key)
        .map(|(_, url)| *url)
}

/// Keys are matched lower-cased with surrounding whitespace removed.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{lookup, normalize_key};

    #[test]
    fn known_keys_resolve() {
        assert!(lookup("level2").unwrap().contains("21853674"));
        assert!(lookup("broken glass").is_some());
    }

    #[test]
    fn unknown_key_has_no_image() {
        assert_eq!(lookup("spaceship"), None);
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_key("  Level2 "), "level2");
        assert_eq!(lookup(&normalize_key(" Broken Glass")), lookup("broken glass"));
    }
}
