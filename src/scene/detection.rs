//! Scene type detection
//!
//! Studio tags its scenes with a marker string. The marker decides which
//! record codecs are worth running over the payload.

use tracing::debug;

use crate::aishoujo::NEO_V2_SCENE_MARKER;
use crate::common::SceneBuffer;
use crate::honeyselect::{HONEY_SCENE_MARKER, NEO_SCENE_MARKER};
use crate::koikatu::KSTUDIO_SCENE_MARKER;
use crate::playhome::PH_STUDIO_MARKER;

/// Kind of scene a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// PlayHome Studio: only the scene tree walker runs
    PlayHome,
    /// Studio NEO, NEO V2, KStudio or Honey Studio: marker-scanned records
    Studio,
    /// No known scene marker
    Unknown,
}

/// Classify a scene. `full` enables the PlayHome, KStudio and Honey
/// Studio checks; NEO and NEO V2 are always recognized.
pub fn detect_scene(buffer: &SceneBuffer, full: bool) -> SceneKind {
    if full && buffer.has_scene_marker(PH_STUDIO_MARKER) {
        debug!("PlayHome Studio scene");
        return SceneKind::PlayHome;
    }

    let mut markers = vec![NEO_SCENE_MARKER, NEO_V2_SCENE_MARKER];
    if full {
        markers.extend([KSTUDIO_SCENE_MARKER, HONEY_SCENE_MARKER]);
    }

    match markers.into_iter().find(|m| buffer.has_scene_marker(m)) {
        Some(marker) => {
            debug!(marker, "Studio scene");
            SceneKind::Studio
        }
        None => SceneKind::Unknown,
    }
}
