// src/charts/font.rs

use ab_glyph::FontRef;
use once_cell::sync::OnceCell;
use plotters::style::{register_font, FontStyle};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

static REGISTERED: OnceCell<Option<PathBuf>> = OnceCell::new();

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Register a TrueType font as `sans-serif`, once per process.
/// Returns whether chart text can be drawn.
pub fn ensure_font(explicit: Option<&Path>) -> bool {
    REGISTERED
        .get_or_init(|| {
            let candidates = explicit
                .map(Path::to_path_buf)
                .into_iter()
                .chain(SYSTEM_FONTS.iter().map(PathBuf::from));
            for path in candidates {
                match load(&path) {
                    Ok(()) => {
                        info!(font = %path.display(), "chart font registered");
                        return Some(path);
                    }
                    Err(e) => debug!(font = %path.display(), error = %e, "font unusable"),
                }
            }
            warn!("no usable TrueType font found; charts will be drawn without text");
            None
        })
        .is_some()
}

fn load(path: &Path) -> Result<(), String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    // Parse with the same reader plotters uses, so only accepted fonts are leaked.
    FontRef::try_from_slice(&bytes)
        .map_err(|_| format!("{} is not a usable TrueType font", path.display()))?;
    // plotters keeps registered font data for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font("sans-serif", FontStyle::Normal, bytes)
        .map_err(|_| format!("{} was rejected by the chart backend", path.display()))
}
