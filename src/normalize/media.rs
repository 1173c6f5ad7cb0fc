//! Creative media resolution.

use super::raw::RawAdItem;
use crate::models::AdType;

const CARD_VIDEO: &[&str] = &[
    "/snapshot/cards/0/video_hd_url",
    "/snapshot/cards/0/video_sd_url",
];
const CARD_PREVIEW: &str = "/snapshot/cards/0/video_preview_image_url";

const SNAPSHOT_VIDEO: &[&str] = &[
    "/snapshot/videos/0/video_hd_url",
    "/snapshot/videos/0/video_sd_url",
];
const SNAPSHOT_PREVIEW: &str = "/snapshot/videos/0/video_preview_image_url";

const IMAGE: &[&str] = &[
    "/snapshot/images/0/original_image_url",
    "/snapshot/cards/0/original_image_url",
];

/// Resolved creative type and media locations for one ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub ad_type: AdType,
    pub download_url: Option<String>,
    pub thumbnail: String,
}

/// Resolve media for a raw item.
///
/// The first card wins over the snapshot video list, and HD wins over SD
/// within each. Without any video URL the ad is an image ad and both the
/// download URL and thumbnail come from the first image source found, or are
/// empty when there is none.
pub fn resolve_media(item: &RawAdItem<'_>) -> Media {
    let video = [(CARD_VIDEO, CARD_PREVIEW), (SNAPSHOT_VIDEO, SNAPSHOT_PREVIEW)]
        .into_iter()
        .find_map(|(urls, preview)| item.first_text(urls).map(|url| (url, preview)));

    if let Some((url, preview)) = video {
        return Media {
            ad_type: AdType::Video,
            download_url: Some(url),
            thumbnail: item.text(preview).unwrap_or_default(),
        };
    }

    let image = item.first_text(IMAGE).unwrap_or_default();
    Media {
        ad_type: AdType::Image,
        thumbnail: image.clone(),
        download_url: Some(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn media(raw: Value) -> Media {
        resolve_media(&RawAdItem::new(&raw).unwrap())
    }

    #[test]
    fn test_card_hd_preferred() {
        let m = media(json!({"snapshot": {"cards": [{
            "video_hd_url": "https://v/hd.mp4",
            "video_sd_url": "https://v/sd.mp4",
            "video_preview_image_url": "https://v/prev.jpg"
        }]}}));
        assert_eq!(m.ad_type, AdType::Video);
        assert_eq!(m.download_url.as_deref(), Some("https://v/hd.mp4"));
        assert_eq!(m.thumbnail, "https://v/prev.jpg");
    }

    #[test]
    fn test_card_sd_fallback() {
        let m = media(json!({"snapshot": {"cards": [{"video_sd_url": "https://v/sd.mp4"}]}}));
        assert_eq!(m.ad_type, AdType::Video);
        assert_eq!(m.download_url.as_deref(), Some("https://v/sd.mp4"));
        assert_eq!(m.thumbnail, "");
    }

    #[test]
    fn test_snapshot_videos_used_when_card_has_no_video() {
        let m = media(json!({"snapshot": {
            "cards": [{"original_image_url": "https://i/card.jpg"}],
            "videos": [{
                "video_sd_url": "https://v/snap-sd.mp4",
                "video_preview_image_url": "https://v/snap.jpg"
            }]
        }}));
        assert_eq!(m.ad_type, AdType::Video);
        assert_eq!(m.download_url.as_deref(), Some("https://v/snap-sd.mp4"));
        assert_eq!(m.thumbnail, "https://v/snap.jpg");
    }

    #[test]
    fn test_empty_videos_list_is_image() {
        let m = media(json!({"snapshot": {"videos": [{}], "images": [{"original_image_url": "https://i/a.jpg"}]}}));
        assert_eq!(m.ad_type, AdType::Image);
        assert_eq!(m.download_url.as_deref(), Some("https://i/a.jpg"));
        assert_eq!(m.thumbnail, "https://i/a.jpg");
    }

    #[test]
    fn test_image_falls_back_to_card_image() {
        let m = media(json!({"snapshot": {"cards": [{"original_image_url": "https://i/card.jpg"}]}}));
        assert_eq!(m.ad_type, AdType::Image);
        assert_eq!(m.download_url.as_deref(), Some("https://i/card.jpg"));
    }

    #[test]
    fn test_no_media_at_all() {
        let m = media(json!({}));
        assert_eq!(m.ad_type, AdType::Image);
        assert_eq!(m.download_url.as_deref(), Some(""));
        assert_eq!(m.thumbnail, "");
    }
}
