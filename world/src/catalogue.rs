//! Tile descriptor catalogue loaded from a TOML manifest.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use glam::Vec2;
use serde::Deserialize;
use tidepool_core::{CoinKind, FoodKind, ReceptacleKind, ShellColor, TileKind};

/// Catalogue format version understood by this build.
pub const SUPPORTED_CATALOGUE_VERSION: u32 = 1;

/// Keys of every tile descriptor the engine needs to size its tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorKey {
    /// Solid wall tile.
    Wall,
    /// Open floor tile.
    Background,
    /// Apple food item.
    Apple,
    /// Cherries food item.
    Cherries,
    /// Sandwich food item.
    Sandwich,
    /// Cake food item.
    Cake,
    /// Silver coin.
    Silver,
    /// Gold coin.
    Gold,
    /// Orange shell.
    OrangeShell,
    /// Blue shell.
    BlueShell,
    /// Pink shell.
    PinkShell,
    /// Purple shell.
    PurpleShell,
    /// Treasure map item.
    TreasureMap,
    /// Marker the treasure map points to.
    MapMarker,
    /// Rare bonus decoration.
    RareBonus,
    /// Board the player fills with shells.
    EmptyBoard,
    /// Board showing the target arrangement.
    ReferenceBoard,
    /// Countdown timer.
    Timer,
}

impl DescriptorKey {
    /// Every descriptor key in catalogue order.
    pub const ALL: [DescriptorKey; 18] = [
        DescriptorKey::Wall,
        DescriptorKey::Background,
        DescriptorKey::Apple,
        DescriptorKey::Cherries,
        DescriptorKey::Sandwich,
        DescriptorKey::Cake,
        DescriptorKey::Silver,
        DescriptorKey::Gold,
        DescriptorKey::OrangeShell,
        DescriptorKey::BlueShell,
        DescriptorKey::PinkShell,
        DescriptorKey::PurpleShell,
        DescriptorKey::TreasureMap,
        DescriptorKey::MapMarker,
        DescriptorKey::RareBonus,
        DescriptorKey::EmptyBoard,
        DescriptorKey::ReferenceBoard,
        DescriptorKey::Timer,
    ];

    /// Name of the key inside the `[tiles]` table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DescriptorKey::Wall => "wall",
            DescriptorKey::Background => "background",
            DescriptorKey::Apple => "apple",
            DescriptorKey::Cherries => "cherries",
            DescriptorKey::Sandwich => "sandwich",
            DescriptorKey::Cake => "cake",
            DescriptorKey::Silver => "silver",
            DescriptorKey::Gold => "gold",
            DescriptorKey::OrangeShell => "orange_shell",
            DescriptorKey::BlueShell => "blue_shell",
            DescriptorKey::PinkShell => "pink_shell",
            DescriptorKey::PurpleShell => "purple_shell",
            DescriptorKey::TreasureMap => "treasure_map",
            DescriptorKey::MapMarker => "map_marker",
            DescriptorKey::RareBonus => "rare_bonus",
            DescriptorKey::EmptyBoard => "empty_board",
            DescriptorKey::ReferenceBoard => "reference_board",
            DescriptorKey::Timer => "timer",
        }
    }

    /// Resolves a key from its table name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Descriptor that sizes tiles of the provided kind.
    #[must_use]
    pub const fn for_tile(kind: TileKind) -> Self {
        match kind {
            TileKind::Background => DescriptorKey::Background,
            TileKind::Wall => DescriptorKey::Wall,
            TileKind::Food(FoodKind::Apple) => DescriptorKey::Apple,
            TileKind::Food(FoodKind::Cherries) => DescriptorKey::Cherries,
            TileKind::Food(FoodKind::Sandwich) => DescriptorKey::Sandwich,
            TileKind::Food(FoodKind::Cake) => DescriptorKey::Cake,
            TileKind::Coin(CoinKind::Silver) => DescriptorKey::Silver,
            TileKind::Coin(CoinKind::Gold) => DescriptorKey::Gold,
            TileKind::Shell(ShellColor::Orange) => DescriptorKey::OrangeShell,
            TileKind::Shell(ShellColor::Blue) => DescriptorKey::BlueShell,
            TileKind::Shell(ShellColor::Pink) => DescriptorKey::PinkShell,
            TileKind::Shell(ShellColor::Purple) => DescriptorKey::PurpleShell,
            TileKind::TreasureMap => DescriptorKey::TreasureMap,
            TileKind::MapMarker => DescriptorKey::MapMarker,
            TileKind::RareBonus => DescriptorKey::RareBonus,
            TileKind::PuzzleReceptacle(ReceptacleKind::Empty) => DescriptorKey::EmptyBoard,
            TileKind::PuzzleReceptacle(ReceptacleKind::Reference(_)) => {
                DescriptorKey::ReferenceBoard
            }
            TileKind::Timer => DescriptorKey::Timer,
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Declarative description of a tile type.
///
/// Only the size is interpreted by the engine; the asset paths are forwarded
/// untouched to the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct TileDescriptor {
    name: String,
    width: u32,
    height: u32,
    texture_path: String,
    collected_audio_path: Option<String>,
}

impl TileDescriptor {
    /// Creates a descriptor without a collection sound.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32, texture_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            texture_path: texture_path.into(),
            collected_audio_path: None,
        }
    }

    /// Attaches the sound played when the tile is collected.
    #[must_use]
    pub fn with_collected_audio(mut self, path: impl Into<String>) -> Self {
        self.collected_audio_path = Some(path.into());
        self
    }

    /// Human readable name of the tile.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width and height in world units.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Opaque texture reference for the presentation layer.
    #[must_use]
    pub fn texture_path(&self) -> &str {
        &self.texture_path
    }

    /// Opaque collection sound reference for the presentation layer.
    #[must_use]
    pub fn collected_audio_path(&self) -> Option<&str> {
        self.collected_audio_path.as_deref()
    }
}

/// Errors raised while loading a tile catalogue.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// The catalogue file could not be read.
    #[error("failed to read tile catalogue at {}", .path.display())]
    Io {
        /// Location that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The catalogue is not valid TOML or does not match the expected shape.
    #[error("failed to parse tile catalogue toml contents")]
    Parse(#[from] toml::de::Error),
    /// The catalogue declares an unsupported format version.
    #[error("unsupported tile catalogue version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
    /// The catalogue names a tile the engine does not know.
    #[error("unknown tile descriptor `{0}`")]
    UnknownTile(String),
    /// A descriptor the engine needs is absent.
    #[error("tile catalogue missing descriptor `{0}`")]
    MissingTile(&'static str),
    /// A descriptor declares a zero width or height.
    #[error("tile descriptor `{key}` has invalid size {width}x{height}")]
    InvalidSize {
        /// Key of the offending descriptor.
        key: &'static str,
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
}

/// Complete set of tile descriptors, one per [`DescriptorKey`].
#[derive(Clone, Debug, PartialEq)]
pub struct TileCatalogue {
    descriptors: Vec<TileDescriptor>,
}

impl TileCatalogue {
    /// Stock catalogue: 48-unit world tiles and 16-unit items.
    #[must_use]
    pub fn builtin() -> Self {
        let descriptors = DescriptorKey::ALL
            .into_iter()
            .map(|key| {
                let side = match key {
                    DescriptorKey::Wall
                    | DescriptorKey::Background
                    | DescriptorKey::MapMarker
                    | DescriptorKey::EmptyBoard
                    | DescriptorKey::ReferenceBoard
                    | DescriptorKey::Timer => 48,
                    _ => 16,
                };
                let descriptor = TileDescriptor::new(
                    key.name(),
                    side,
                    side,
                    format!("textures/tiles/{}", key.name()),
                );
                if matches!(key, DescriptorKey::Wall | DescriptorKey::Background) {
                    descriptor
                } else {
                    descriptor.with_collected_audio(format!("sounds/{}", key.name()))
                }
            })
            .collect();
        Self { descriptors }
    }

    /// Loads the catalogue stored at the provided path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses a catalogue from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogueError> {
        let file: CatalogueFile = toml::from_str(contents)?;
        if file.version != SUPPORTED_CATALOGUE_VERSION {
            return Err(CatalogueError::UnsupportedVersion {
                found: file.version,
                expected: SUPPORTED_CATALOGUE_VERSION,
            });
        }

        let mut resolved = BTreeMap::new();
        for (name, record) in file.tiles {
            let Some(key) = DescriptorKey::parse(&name) else {
                return Err(CatalogueError::UnknownTile(name));
            };
            if record.width == 0 || record.height == 0 {
                return Err(CatalogueError::InvalidSize {
                    key: key.name(),
                    width: record.width,
                    height: record.height,
                });
            }
            let _ = resolved.insert(key, record);
        }

        let mut descriptors = Vec::with_capacity(DescriptorKey::ALL.len());
        for key in DescriptorKey::ALL {
            let Some(record) = resolved.remove(&key) else {
                return Err(CatalogueError::MissingTile(key.name()));
            };
            descriptors.push(TileDescriptor {
                name: record.name,
                width: record.width,
                height: record.height,
                texture_path: record.texture_path,
                collected_audio_path: record.collected_audio_path,
            });
        }

        Ok(Self { descriptors })
    }

    /// Descriptor registered for the key.
    #[must_use]
    pub fn descriptor(&self, key: DescriptorKey) -> &TileDescriptor {
        &self.descriptors[key.slot()]
    }

    /// Descriptor that sizes tiles of the provided kind.
    #[must_use]
    pub fn descriptor_for(&self, kind: TileKind) -> &TileDescriptor {
        self.descriptor(DescriptorKey::for_tile(kind))
    }

    /// Size of a single grid cell in world units.
    #[must_use]
    pub fn world_tile_size(&self) -> Vec2 {
        self.descriptor(DescriptorKey::Background).size()
    }
}

impl Default for TileCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogueFile {
    version: u32,
    tiles: BTreeMap<String, DescriptorRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptorRecord {
    name: String,
    width: u32,
    height: u32,
    texture_path: String,
    #[serde(default)]
    collected_audio_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_catalogue() -> String {
        let mut text = String::from("version = 1\n");
        for key in DescriptorKey::ALL {
            text.push_str(&format!(
                "[tiles.{name}]\nname = \"{name}\"\nwidth = 48\nheight = 48\ntexture_path = \"textures/{name}\"\n",
                name = key.name()
            ));
        }
        text
    }

    #[test]
    fn catalogue_parses_every_descriptor() {
        let catalogue = TileCatalogue::from_toml_str(&full_catalogue()).expect("catalogue should parse");
        let timer = catalogue.descriptor(DescriptorKey::Timer);
        assert_eq!(timer.name(), "timer");
        assert_eq!(timer.size(), Vec2::splat(48.0));
        assert_eq!(timer.texture_path(), "textures/timer");
        assert_eq!(timer.collected_audio_path(), None);
    }

    #[test]
    fn catalogue_keeps_optional_audio_paths() {
        let text = full_catalogue().replace(
            "texture_path = \"textures/gold\"\n",
            "texture_path = \"textures/gold\"\ncollected_audio_path = \"sounds/coin\"\n",
        );
        let catalogue = TileCatalogue::from_toml_str(&text).expect("catalogue should parse");
        assert_eq!(
            catalogue.descriptor(DescriptorKey::Gold).collected_audio_path(),
            Some("sounds/coin")
        );
    }

    #[test]
    fn catalogue_requires_every_descriptor() {
        let text = full_catalogue().replace("[tiles.timer]", "[tiles.cake_duplicate]");
        let error = TileCatalogue::from_toml_str(&text).expect_err("unknown key must fail");
        assert!(matches!(error, CatalogueError::UnknownTile(name) if name == "cake_duplicate"));

        let truncated: String = full_catalogue()
            .split("[tiles.timer]")
            .next()
            .unwrap_or_default()
            .to_owned();
        let error = TileCatalogue::from_toml_str(&truncated).expect_err("missing timer must fail");
        assert!(matches!(error, CatalogueError::MissingTile("timer")));
    }

    #[test]
    fn catalogue_rejects_missing_size_fields() {
        let text = full_catalogue().replacen("width = 48\n", "", 1);
        assert!(matches!(
            TileCatalogue::from_toml_str(&text),
            Err(CatalogueError::Parse(_))
        ));
    }

    #[test]
    fn catalogue_rejects_zero_sizes() {
        let text = full_catalogue().replacen("height = 48", "height = 0", 1);
        assert!(matches!(
            TileCatalogue::from_toml_str(&text),
            Err(CatalogueError::InvalidSize { key: "wall", .. })
        ));
    }

    #[test]
    fn catalogue_rejects_other_versions() {
        let text = full_catalogue().replace("version = 1", "version = 2");
        assert!(matches!(
            TileCatalogue::from_toml_str(&text),
            Err(CatalogueError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn builtin_catalogue_uses_world_sized_tiles() {
        let catalogue = TileCatalogue::builtin();
        assert_eq!(catalogue.world_tile_size(), Vec2::splat(48.0));
        assert_eq!(
            catalogue.descriptor_for(TileKind::Food(FoodKind::Cake)).size(),
            Vec2::splat(16.0)
        );
    }
}
