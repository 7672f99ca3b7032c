//! System font lookup

use std::path::PathBuf;

use log::{debug, info};

/// Well-known monospace font locations
const CANDIDATES: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansMono-Regular.ttf",
    // CJK capable
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    // macOS (development/testing)
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
];

/// Locate a font file
///
/// Search order:
/// 1. TTFBLIT_FONT environment variable
/// 2. Known paths (hardcoded)
pub fn find_system_font() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("TTFBLIT_FONT") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Font selected: {} (TTFBLIT_FONT)", path.display());
            return Some(path);
        }
        debug!("TTFBLIT_FONT does not exist: {}", path.display());
    }

    let found = CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists());
    match &found {
        Some(path) => info!("Font selected: {}", path.display()),
        None => debug!("No system font found in {} known paths", CANDIDATES.len()),
    }
    found
}
