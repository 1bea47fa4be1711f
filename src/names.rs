//! Random pattern-name generation.
//!
//! The melodic compiler's top-level `pat()` entry point needs a name for
//! patterns the caller didn't explicitly name (see [`crate::combinators::name`]
//! for explicit naming). Word lists kept short and pronounceable; collisions
//! are harmless since names are a dispatch label, not an identity.

const ADJECTIVES: &[&str] = &[
    "brisk", "calm", "cosmic", "dusty", "eager", "faded", "golden", "hollow",
    "idle", "jagged", "keen", "lively", "muted", "noble", "ochre", "plain",
    "quiet", "rusty", "solar", "terse", "umber", "vivid", "warm", "young",
];

const NOUNS: &[&str] = &[
    "anvil", "brook", "cinder", "delta", "ember", "fern", "glade", "heron",
    "island", "jasper", "kestrel", "lantern", "meadow", "needle", "opal",
    "pebble", "quarry", "river", "spire", "thicket", "urchin", "valley",
    "willow", "zephyr",
];

/// Generates a two-word `adjective-noun` name, e.g. `"rusty-kestrel"`.
pub fn random_name() -> String {
    let adj = ADJECTIVES[fastrand::usize(..ADJECTIVES.len())];
    let noun = NOUNS[fastrand::usize(..NOUNS.len())];
    format!("{adj}-{noun}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_two_hyphenated_words() {
        let name = random_name();
        let parts: Vec<&str> = name.split('-').collect();
        assert_eq!(parts.len(), 2);
        assert!(ADJECTIVES.contains(&parts[0]));
        assert!(NOUNS.contains(&parts[1]));
    }
}
