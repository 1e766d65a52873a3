use crate::events::AppEvent;
use async_channel::Sender;
use directories::{BaseDirs, ProjectDirs};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use spindle::{ImageRef, RingSettings};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub struct HexColor(pub Srgb<u8>);

impl FromStr for HexColor {
    type Err = palette::rgb::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::from_str(s.trim()).map(HexColor)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

impl HexColor {
    pub fn to_rgb(&self) -> (f64, f64, f64) {
        let c: Srgb<f64> = self.0.into_format();
        (c.red, c.green, c.blue)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub image: ImageRef,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub background: Option<HexColor>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Orbit".to_string(),
            width: 1024,
            height: 720,
            background: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub ring: RingSettings,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

impl Config {
    pub fn images(&self) -> Vec<ImageRef> {
        self.items.iter().map(|i| i.image.clone()).collect()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Failed to resolve config path: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "orbit", "orbit").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Explicit path from the command line, or the platform config file.
///
/// The result is always absolute so it can be compared with watcher events.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };
    Ok(std::path::absolute(path)?)
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("ORBIT").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the config at `path`, falling back to the bundled sample ring.
pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        log::info!(
            "No config at {}, using the bundled sample ring",
            path.display()
        );
        return default_config();
    }

    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            default_config()
        }
    }
}

fn default_config() -> Config {
    match parse_config(DEFAULT_CONFIG) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Bundled config is invalid: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

/// Expands `~/` and resolves relative image paths against the config directory.
pub fn image_path(image: &ImageRef, config_path: &Path) -> PathBuf {
    let raw = image.as_str();
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(base) = BaseDirs::new()
    {
        return base.home_dir().join(rest);
    }

    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    config_path
        .parent()
        .map(|dir| dir.join(&path))
        .unwrap_or(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

type WatchEvents = async_channel::Receiver<notify::Result<notify::Event>>;

fn watch_dir(dir: &Path) -> Result<(RecommendedWatcher, WatchEvents), ConfigError> {
    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, bridge_rx))
}

/// Whether `event` writes, creates or removes the config file itself.
fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Sends [`AppEvent::ConfigReload`] each time the file at `config_path` changes.
///
/// Expects the absolute path returned by [`resolve_config_path`].
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let Some(config_dir) = config_path.parent() else {
        log::warn!(
            "{} has no parent directory, hot reload disabled",
            config_path.display()
        );
        return;
    };

    if let Err(e) = fs_err::create_dir_all(config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (_watcher, events) = match watch_dir(config_dir) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Hot reload disabled: {}", e);
            return;
        }
    };
    log::debug!("Watching {} for changes", config_path.display());

    while let Ok(res) = events.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle::Easing;

    #[test]
    fn test_bundled_config_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.items.len(), 4);
        assert_eq!(config.ring.initial_rotation, -90.0);
        assert_eq!(config.ring.entrance.easing, Easing::EaseOut);
        assert_eq!(config.window.title, "Projects");
        assert!(config.ring.validate().is_ok());
    }

    #[test]
    fn test_sections_are_optional() {
        let config = parse_config(
            r#"
            [[items]]
            image = "a.png"
            title = "A"
            "#,
        )
        .unwrap();
        assert_eq!(config.items[0].description, "");
        assert!(config.items[0].tags.is_empty());
        assert_eq!(config.ring, RingSettings::default());
        assert_eq!(config.window.width, 1024);
    }

    #[test]
    fn test_empty_config_has_no_items() {
        let config = parse_config("").unwrap();
        assert!(config.images().is_empty());
    }

    #[test]
    fn test_hex_color_deserialization() {
        let cases = vec![
            ("\"#10131a\"", (0x10, 0x13, 0x1a)),
            ("\"10131A\"", (0x10, 0x13, 0x1a)),
            ("\"#fff\"", (0xff, 0xff, 0xff)),
        ];

        for (json, (r, g, b)) in cases {
            let color: HexColor = serde_json::from_str(json).unwrap();
            assert_eq!(color.0, Srgb::new(r, g, b));
        }
        assert!(serde_json::from_str::<HexColor>("\"#12\"").is_err());
        assert_eq!(HexColor(Srgb::new(1, 2, 255)).to_string(), "#0102ff");
    }

    #[test]
    fn test_explicit_config_path_is_made_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let bare = resolve_config_path(Some(Path::new("config.toml"))).unwrap();
        assert_eq!(bare, cwd.join("config.toml"));
        assert!(bare.parent().is_some_and(|p| !p.as_os_str().is_empty()));

        let nested = resolve_config_path(Some(Path::new("./conf/config.toml"))).unwrap();
        assert_eq!(nested, cwd.join("conf").join("config.toml"));

        let fixed = Path::new("/etc/orbit/config.toml");
        assert_eq!(resolve_config_path(Some(fixed)).unwrap(), fixed);
    }

    #[test]
    fn test_only_changes_to_the_config_file_trigger_reload() {
        use notify::event::{AccessKind, CreateKind, ModifyKind};

        let config_path = Path::new("/home/me/.config/orbit/config.toml");
        let write = notify::Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(config_path.to_path_buf());
        assert!(touches_config(&write, config_path));

        let sibling = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/home/me/.config/orbit/other.toml"));
        assert!(!touches_config(&sibling, config_path));

        let read = notify::Event::new(EventKind::Access(AccessKind::Any))
            .add_path(config_path.to_path_buf());
        assert!(!touches_config(&read, config_path));
    }

    #[test]
    fn test_relative_images_resolve_next_to_config() {
        let config_path = Path::new("/etc/orbit/config.toml");
        assert_eq!(
            image_path(&ImageRef::new("shots/a.png"), config_path),
            PathBuf::from("/etc/orbit/shots/a.png")
        );
        assert_eq!(
            image_path(&ImageRef::new("/srv/b.png"), config_path),
            PathBuf::from("/srv/b.png")
        );
    }
}
