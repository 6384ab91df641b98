//! Initial window geometry for a panel.

use easel_common::Rect;
use easel_package::{PanelKind, PanelManifest};
use easel_window::LayoutSnapshot;

const DEFAULT_WIDTH: f64 = 400.0;
const DEFAULT_HEIGHT: f64 = 300.0;

pub(crate) fn min_size(manifest: &PanelManifest) -> Option<(f64, f64)> {
    size_pair(manifest.min_width, manifest.min_height, 0.0)
}

pub(crate) fn max_size(manifest: &PanelManifest) -> Option<(f64, f64)> {
    size_pair(manifest.max_width, manifest.max_height, f64::MAX)
}

fn size_pair(w: Option<u32>, h: Option<u32>, fallback: f64) -> Option<(f64, f64)> {
    if w.is_none() && h.is_none() {
        return None;
    }
    Some((
        w.map(f64::from).unwrap_or(fallback),
        h.map(f64::from).unwrap_or(fallback),
    ))
}

/// Saved geometry wins over the declared size; fixed-size panels are then
/// clamped into their declared limits. `None` leaves the choice to the
/// window registry.
pub(crate) fn initial_bounds(
    manifest: &PanelManifest,
    saved: Option<&LayoutSnapshot>,
) -> Option<Rect> {
    let saved = saved.filter(|s| s.width > 0.0 && s.height > 0.0);
    let mut bounds = match saved {
        Some(s) => s.bounds(),
        None if manifest.width.is_some() || manifest.height.is_some() => Rect::new(
            0.0,
            0.0,
            manifest.width.map(f64::from).unwrap_or(DEFAULT_WIDTH),
            manifest.height.map(f64::from).unwrap_or(DEFAULT_HEIGHT),
        ),
        None if manifest.kind == PanelKind::FixedSize => {
            Rect::new(0.0, 0.0, DEFAULT_WIDTH, DEFAULT_HEIGHT)
        }
        None => return None,
    };

    if manifest.kind == PanelKind::FixedSize {
        if let Some((min_w, min_h)) = min_size(manifest) {
            bounds.width = bounds.width.max(min_w);
            bounds.height = bounds.height.max(min_h);
        }
        if let Some((max_w, max_h)) = max_size(manifest) {
            bounds.width = bounds.width.min(max_w);
            bounds.height = bounds.height.min(max_h);
        }
    }
    Some(bounds)
}
