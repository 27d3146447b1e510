//! Deterministic pseudonyms for people names.
//!
//! A display name is hashed with MD5 and the 128-bit digest picks a first
//! and last name from two fixed word lists. The lists and the index
//! arithmetic must stay exactly as they are: pseudonyms are compared across
//! runs, and changing either would rename everyone.

use md5::{Digest, Md5};

pub const FIRST_NAMES: [&str; 50] = [
    "Zephyr", "Luna", "Atlas", "Nova", "Orion", "Sage", "Phoenix", "Echo", "Caspian", "Aurora",
    "Ember", "Indigo", "Jasper", "Lyra", "Cosmo", "Juniper", "Cypress", "Solstice", "Zenith", "Nebula",
    "Fable", "Quasar", "Tempest", "Vesper", "Wren", "Zion", "Astro", "Borealis", "Celestial", "Dune",
    "Everest", "Frost", "Galaxy", "Horizon", "Infinity", "Jupiter", "Krypton", "Legacy", "Meridian", "Neon",
    "Olympus", "Pixel", "Quantum", "Rogue", "Stellar", "Tundra", "Utopia", "Vortex", "Whisper", "Xenon",
];

pub const LAST_NAMES: [&str; 50] = [
    "Starlight", "Moonbeam", "Thunderbolt", "Winterfall", "Summercrest", "Nightshade", "Daybreak", "Skydancer", "Fireforge", "Stormchaser",
    "Dreamweaver", "Shadowheart", "Lightbringer", "Cloudwalker", "Riverdance", "Mountaincrest", "Oceantide", "Windwhisper", "Sunseeker", "Moonshadow",
    "Stardust", "Frostfire", "Wildflower", "Silverbrook", "Goldenhawk", "Ironwood", "Crystalclear", "Emeraldsky", "Sapphirewave", "Rubyheart",
    "Diamondpeak", "Amberlight", "Pearlriver", "Jadeforest", "Obsidiannight", "Marblegleam", "Coralreef", "Azuresky", "Crimsonflame", "Violetdusk",
    "Indigomist", "Tealbreeze", "Magentabloom", "Vermilionrise", "Ceruleanfall", "Sienna", "Hazel", "Cobalt", "Amber", "Slate",
];

/// Map a display name to its stable "First Last" pseudonym.
pub fn anonymize(display_name: &str) -> String {
    let digest = Md5::digest(display_name.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);
    let hash = u128::from_be_bytes(bytes);

    let first_len = FIRST_NAMES.len() as u128;
    let last_len = LAST_NAMES.len() as u128;
    let first = FIRST_NAMES[(hash % first_len) as usize];
    let last = LAST_NAMES[((hash / first_len) % last_len) as usize];

    format!("{} {}", first, last)
}

/// Applies [`anonymize`] when enabled, otherwise passes names through.
#[derive(Debug, Clone, Copy)]
pub struct NameMasker {
    enabled: bool,
}

impl NameMasker {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mask(&self, name: &str) -> String {
        if self.enabled {
            anonymize(name)
        } else {
            name.to_string()
        }
    }
}
