//! On-disk layout (§4.9, §6.5):
//! - Characters: `saves/characters/save_{N}.json`.
//! - Worlds: `saves/worlds/{name}.world` (template) and
//!   `saves/worlds/{name}.state.json` (authoritative at runtime).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DomainError;
use crate::model::{Character, WorldState};

pub struct CharacterStore {
    dir: PathBuf,
}

impl CharacterStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = base_dir.as_ref().join("characters");
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, save_id: &str) -> PathBuf {
        self.dir.join(format!("{save_id}.json"))
    }

    /// `save_{N}.json` where `N` is one more than the highest existing
    /// numeric suffix (`get_next_save_id`), not caller-supplied.
    pub fn next_save_id(&self) -> Result<String, DomainError> {
        let mut max_id = 0i64;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(stem) = name.strip_suffix(".json") else {
                continue;
            };
            let Some(num) = stem.strip_prefix("save_") else {
                continue;
            };
            if let Ok(n) = num.parse::<i64>() {
                max_id = max_id.max(n);
            }
        }
        Ok(format!("save_{}", max_id + 1))
    }

    pub fn create(&self, character: &Character) -> Result<String, DomainError> {
        let save_id = self.next_save_id()?;
        self.save(character, &save_id)?;
        Ok(save_id)
    }

    pub fn save(&self, character: &Character, save_id: &str) -> Result<(), DomainError> {
        let body = serde_json::to_vec_pretty(character)?;
        fs::write(self.path_for(save_id), body)?;
        Ok(())
    }

    pub fn load(&self, save_id: &str) -> Result<Option<Character>, DomainError> {
        let path = self.path_for(save_id);
        if !path.exists() {
            return Ok(None);
        }
        let body = fs::read(path)?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

pub struct WorldStore {
    dir: PathBuf,
}

impl WorldStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = base_dir.as_ref().join("worlds");
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn state_path(&self, world_name: &str) -> PathBuf {
        self.dir.join(format!("{world_name}.state.json"))
    }

    fn template_path(&self, world_name: &str) -> PathBuf {
        self.dir.join(format!("{world_name}.world"))
    }

    pub fn save_state(&self, world: &WorldState) -> Result<(), DomainError> {
        let body = serde_json::to_vec_pretty(world)?;
        fs::write(self.state_path(&world.world_name), body)?;
        Ok(())
    }

    fn save_template(&self, world: &WorldState) -> Result<(), DomainError> {
        let body = serde_json::to_vec_pretty(world)?;
        fs::write(self.template_path(&world.world_name), body)?;
        Ok(())
    }

    /// State file, else template, else `generate()` (persisted as the new
    /// template) — §4.9's load-or-generate-on-first-run order.
    pub fn load_or_generate(
        &self,
        world_name: &str,
        generate: impl FnOnce() -> WorldState,
    ) -> Result<WorldState, DomainError> {
        if let Some(world) = self.read(&self.state_path(world_name))? {
            return Ok(world);
        }
        if let Some(world) = self.read(&self.template_path(world_name))? {
            return Ok(world);
        }
        let world = generate();
        self.save_template(&world)?;
        Ok(world)
    }

    fn read(&self, path: &Path) -> Result<Option<WorldState>, DomainError> {
        if !path.exists() {
            return Ok(None);
        }
        let body = fs::read(path)?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_save_id_is_one_past_the_highest_existing_number() {
        let dir = tempfile::tempdir().unwrap();
        let store = CharacterStore::new(dir.path()).unwrap();
        store.save(&Character::new("A", ""), "save_1").unwrap();
        store.save(&Character::new("B", ""), "save_4").unwrap();
        assert_eq!(store.next_save_id().unwrap(), "save_5");
    }

    #[test]
    fn next_save_id_starts_at_one_with_no_existing_saves() {
        let dir = tempfile::tempdir().unwrap();
        let store = CharacterStore::new(dir.path()).unwrap();
        assert_eq!(store.next_save_id().unwrap(), "save_1");
    }

    #[test]
    fn save_then_load_round_trips_a_character() {
        let dir = tempfile::tempdir().unwrap();
        let store = CharacterStore::new(dir.path()).unwrap();
        let mut character = Character::new("Aria", "a wanderer");
        character.discovered_cells.insert((3, 4));

        let save_id = store.create(&character).unwrap();
        let loaded = store.load(&save_id).unwrap().unwrap();
        assert_eq!(loaded.name, "Aria");
        assert_eq!(loaded.discovered_cells, character.discovered_cells);
    }

    #[test]
    fn load_of_missing_save_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CharacterStore::new(dir.path()).unwrap();
        assert!(store.load("save_999").unwrap().is_none());
    }

    fn world(name: &str) -> WorldState {
        WorldState {
            world_name: name.to_string(),
            seed: 7,
            map_size: (4, 4),
            year: 1000,
            tech_level: "fantasy".into(),
            magic_level: "medium".into(),
            biome_map: vec![vec!["grassland".to_string(); 4]; 4],
            points_of_interest: Vec::new(),
            factions: Vec::new(),
            history_log: Vec::new(),
        }
    }

    #[test]
    fn load_or_generate_prefers_state_file_over_template() {
        let dir = tempfile::tempdir().unwrap();
        let store = WorldStore::new(dir.path()).unwrap();

        let mut template = world("arda");
        template.year = 1;
        store.save_template(&template).unwrap();

        let mut state = world("arda");
        state.year = 2000;
        store.save_state(&state).unwrap();

        let loaded = store.load_or_generate("arda", || panic!("should not generate")).unwrap();
        assert_eq!(loaded.year, 2000);
    }

    #[test]
    fn load_or_generate_falls_back_to_generator_and_persists_a_template() {
        let dir = tempfile::tempdir().unwrap();
        let store = WorldStore::new(dir.path()).unwrap();

        let loaded = store.load_or_generate("new-world", || world("new-world")).unwrap();
        assert_eq!(loaded.world_name, "new-world");
        assert!(store.template_path("new-world").exists());
    }
}
