use std::fs;
use std::path::{Path, PathBuf};

use nukus_config::Config;
use serde::{Deserialize, Serialize};

const MAIN_PROFILE: &str = "main";

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Folder of `<name>.json` profiles
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn in_app_root() -> anyhow::Result<Self> {
        Ok(Self::new(nukus_config::app_root()?.join("profiles")))
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Create the profiles folder and the main profile if missing
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let main_profile = self.file(MAIN_PROFILE);
        if !main_profile.exists() {
            let profile = Profile {
                name: MAIN_PROFILE.into(),
                value: Config::default(),
            };
            fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
            tracing::info!("Created main profile at {:?}", main_profile);
        }

        Ok(())
    }

    /// Load a profile by name, falling back to main, then to defaults
    pub fn load(&self, name: &str) -> anyhow::Result<Config> {
        let profile_file = self.file(name);
        if profile_file.exists() {
            return read_profile(&profile_file);
        }

        tracing::warn!("Profile {name} not found, falling back to main profile");
        let main_file = self.file(MAIN_PROFILE);
        if main_file.exists() {
            read_profile(&main_file)
        } else {
            Ok(Config::default())
        }
    }
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)?;
    let profile: Profile = serde_json::from_str(&data)?;
    Ok(profile.value)
}
