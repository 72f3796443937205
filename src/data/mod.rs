mod loader;

pub use loader::{LoadError, bundled_deck, load_deck_from_json, parse_deck};
