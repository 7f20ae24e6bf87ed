use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub bgcolor: String,
    /// Storage id of the cover image, needed when deleting the
    /// notebook so the backend can drop the image too.
    #[serde(default, alias = "idAvatar")]
    pub id_avatar: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNotebook {
    pub title: String,
    pub avatar: String,
    pub bgcolor: String,
}

/// Accent colors assigned to notebooks created without a cover image.
const BGCOLORS: [&str; 11] = [
    "#FFDBE9", "#D6E6FF", "#D1F5D3", "#FFF3C4", "#E8DAFF", "#FFE0CC", "#C9F0FF",
    "#F3D1DC", "#DCF8E7", "#FBE4FF", "#E2E8F0",
];

impl NewNotebook {
    pub fn new(title: String) -> Self {
        // Cheap pseudo-random pick; the accent color is purely cosmetic.
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let bgcolor = BGCOLORS[nanos as usize % BGCOLORS.len()].to_string();
        Self {
            title,
            avatar: String::new(),
            bgcolor,
        }
    }
}
