//! The static biome table. Passability is authoritative for movement
//! validation; color is carried only because clients render from the same
//! broadcast state.

/// `true` if a character may stand on this biome. Unknown biome names fall
/// back to the same impassable default as `"default"`.
pub fn is_passable(biome: &str) -> bool {
    match biome {
        "deep_ocean" | "ocean" | "default" => false,
        "beach" | "grassland" | "forest" | "jungle" | "mountains" | "snowy_peak" | "desert"
        | "temperate_desert" | "scorched" => true,
        _ => false,
    }
}

/// Display color for a biome name, `#333333` for anything unrecognized.
pub fn color(biome: &str) -> &'static str {
    match biome {
        "deep_ocean" => "#00005c",
        "ocean" => "#003088",
        "beach" => "#d2b48c",
        "grassland" => "#567d46",
        "forest" => "#224d18",
        "jungle" => "#003820",
        "mountains" => "#6b6b6b",
        "snowy_peak" => "#f0f0f0",
        "desert" => "#c2b280",
        "temperate_desert" => "#94846c",
        "scorched" => "#555555",
        _ => "#333333",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocean_and_deep_ocean_are_impassable() {
        assert!(!is_passable("ocean"));
        assert!(!is_passable("deep_ocean"));
    }

    #[test]
    fn named_land_biomes_are_passable() {
        for biome in ["beach", "grassland", "forest", "jungle", "mountains", "snowy_peak", "desert", "temperate_desert", "scorched"] {
            assert!(is_passable(biome), "{biome} should be passable");
        }
    }

    #[test]
    fn unknown_biome_name_is_impassable_like_default() {
        assert!(!is_passable("volcano"));
    }
}
