//! # font-locate
//!
//! Resolve a font family name (e.g. `"Arial"`, `"DejaVuSans"`) to the raw
//! bytes of a TrueType/OpenType face, so that renderers only ever deal with
//! "give me the font called X" and never with platform font paths.
//!
//! ## Lookup order
//!
//! On every call to [`locate`]:
//!
//! 1. `<dir>/<family>.ttf` / `.otf` / `.ttc` when an explicit directory is given.
//! 2. The same file names inside [`fonts_dir()`] (`FONT_LOCATE_DIR` override,
//!    else the platform user font directory).
//! 3. The system font database, queried by family name via `fontdb`.
//!
//! The system database is scanned once per process and cached; files from
//! steps 1–2 are read fresh on each call.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use font_locate::{available_families, locate};
//! use std::path::Path;
//!
//! let dir = Path::new("assets/fonts");
//! for family in available_families(dir).unwrap_or_default() {
//!     println!("{family}");
//! }
//! let font = locate("Arial", Some(dir)).expect("no Arial anywhere");
//! println!("{} bytes from {:?}", font.data.len(), font.source);
//! ```
//!
//! ## Environment variable overrides
//!
//! - `FONT_LOCATE_DIR`: directory searched before the user font directory.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// File extensions recognised as font files, in lookup priority order.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Environment variable naming an extra fonts directory.
pub const FONT_DIR_ENV: &str = "FONT_LOCATE_DIR";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by font-locate operations.
#[derive(Error, Debug)]
pub enum FontLocateError {
    /// No directory entry and no system face matched the family name.
    #[error("Font family '{family}' not found in fonts directory or system fonts")]
    NotFound { family: String },

    /// A fonts directory could not be listed or a font file could not be read.
    #[error("Font I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system database reported a face but its data could not be loaded.
    #[error("Font family '{family}' matched but its data could not be read")]
    Unreadable { family: String },
}

// ── Located font ─────────────────────────────────────────────────────────────

/// Where a [`LocatedFont`] was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// A file inside a fonts directory.
    File(PathBuf),
    /// The system font database.
    System,
}

/// Raw font bytes plus the face index inside a collection.
#[derive(Clone)]
pub struct LocatedFont {
    /// Family name the caller asked for.
    pub family: String,
    /// Raw TTF/OTF/TTC bytes.
    pub data: Vec<u8>,
    /// Face index (non-zero only inside `.ttc` collections).
    pub index: u32,
    pub source: FontSource,
}

impl std::fmt::Debug for LocatedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocatedFont")
            .field("family", &self.family)
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .field("index", &self.index)
            .field("source", &self.source)
            .finish()
    }
}

// ── Directory resolution ─────────────────────────────────────────────────────

/// Returns the fonts directory searched after the explicit one.
///
/// `FONT_LOCATE_DIR` wins when set; otherwise the platform user font
/// directory (`~/.local/share/fonts`, `~/Library/Fonts`, …). `None` when the
/// platform has no such directory.
pub fn fonts_dir() -> Option<PathBuf> {
    if let Ok(override_dir) = std::env::var(FONT_DIR_ENV) {
        return Some(PathBuf::from(override_dir));
    }
    dirs::font_dir()
}

// ── Thread-safe system database cache ────────────────────────────────────────

static SYSTEM_FONTS: OnceLock<Database> = OnceLock::new();

fn system_fonts() -> &'static Database {
    SYSTEM_FONTS.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Resolve `family` to font bytes. See the crate docs for the lookup order.
pub fn locate(family: &str, dir: Option<&Path>) -> Result<LocatedFont, FontLocateError> {
    let user_dir = fonts_dir();
    let dirs = dir.into_iter().chain(user_dir.as_deref());

    for d in dirs {
        if let Some(path) = find_in_dir(d, family) {
            let data = std::fs::read(&path).map_err(|source| FontLocateError::Io {
                path: path.clone(),
                source,
            })?;
            return Ok(LocatedFont {
                family: family.to_string(),
                data,
                index: 0,
                source: FontSource::File(path),
            });
        }
    }

    locate_system(family)
}

/// Returns `true` when [`locate`] would succeed, without reading font data
/// from a directory hit.
pub fn is_available(family: &str, dir: Option<&Path>) -> bool {
    let user_dir = fonts_dir();
    if dir
        .into_iter()
        .chain(user_dir.as_deref())
        .any(|d| find_in_dir(d, family).is_some())
    {
        return true;
    }
    query_family(system_fonts(), family).is_some()
}

/// Sorted, de-duplicated family names (file stems) of the font files in `dir`.
pub fn available_families(dir: &Path) -> Result<Vec<String>, FontLocateError> {
    let entries = std::fs::read_dir(dir).map_err(|source| FontLocateError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_font_extension(p))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();

    names.sort();
    names.dedup();
    Ok(names)
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn find_in_dir(dir: &Path, family: &str) -> Option<PathBuf> {
    FONT_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{family}.{ext}")))
        .find(|p| p.is_file())
}

fn query_family(db: &Database, family: &str) -> Option<fontdb::ID> {
    let families = [Family::Name(family)];
    db.query(&Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    })
}

fn locate_system(family: &str) -> Result<LocatedFont, FontLocateError> {
    let db = system_fonts();
    let id = query_family(db, family).ok_or_else(|| FontLocateError::NotFound {
        family: family.to_string(),
    })?;

    db.with_face_data(id, |data, index| LocatedFont {
        family: family.to_string(),
        data: data.to_vec(),
        index,
        source: FontSource::System,
    })
    .ok_or_else(|| FontLocateError::Unreadable {
        family: family.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"not really a font").unwrap();
    }

    #[test]
    fn available_families_sorted_stems() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "Times.ttf");
        touch(tmp.path(), "Arial.ttf");
        touch(tmp.path(), "Courier.otf");
        touch(tmp.path(), "readme.txt");

        let names = available_families(tmp.path()).unwrap();
        assert_eq!(names, vec!["Arial", "Courier", "Times"]);
    }

    #[test]
    fn available_families_missing_dir_is_io_error() {
        let err = available_families(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, FontLocateError::Io { .. }));
    }

    #[test]
    fn locate_prefers_explicit_dir() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "MyFamily.ttf");

        let font = locate("MyFamily", Some(tmp.path())).unwrap();
        assert_eq!(font.family, "MyFamily");
        assert_eq!(font.index, 0);
        assert_eq!(font.source, FontSource::File(tmp.path().join("MyFamily.ttf")));
        assert_eq!(font.data, b"not really a font");
    }

    #[test]
    fn is_available_in_dir() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "Mono.otf");
        assert!(is_available("Mono", Some(tmp.path())));
    }

    #[test]
    fn unknown_family_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = locate("NoSuchFamily-8c1f2a", Some(tmp.path())).unwrap_err();
        assert!(matches!(err, FontLocateError::NotFound { .. }));
        assert!(err.to_string().contains("NoSuchFamily-8c1f2a"));
    }

    #[test]
    fn fonts_dir_override_via_env() {
        std::env::set_var(FONT_DIR_ENV, "/tmp/test_font_locate_override");
        let d = fonts_dir();
        std::env::remove_var(FONT_DIR_ENV);
        assert_eq!(d, Some(PathBuf::from("/tmp/test_font_locate_override")));
    }
}
