//! Live stream status summaries for the settings page.

use std::collections::HashSet;

use crate::models::{ProbeStream, StreamStatusEntry, StreamStatusMap};

const NOT_AVAILABLE: &str = "N/A";

/// One rendered row of the stream status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub channel: String,
    pub channel_name: String,
    pub current_program: String,
    pub subscribers: u32,
    pub stream_url: String,
    pub video_codec: String,
    pub resolution: String,
    pub audio: String,
}

impl StreamSummary {
    pub fn from_entry(channel: &str, entry: &StreamStatusEntry) -> Self {
        let streams: &[ProbeStream] = entry
            .probe_info
            .as_ref()
            .and_then(|p| p.streams.as_deref())
            .unwrap_or(&[]);
        let video = streams.iter().find(|s| s.codec_type.as_deref() == Some("video"));
        let audio = streams.iter().find(|s| s.codec_type.as_deref() == Some("audio"));

        let (video_codec, resolution) = match video {
            Some(v) => (
                or_na(v.codec_name.as_deref()),
                format!("{}x{}", display_opt(v.width), display_opt(v.height)),
            ),
            None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
        };
        let audio = match audio {
            Some(a) => format!(
                "{} {}Hz {}ch",
                or_na(a.codec_name.as_deref()),
                a.sample_rate.as_deref().unwrap_or(NOT_AVAILABLE),
                display_opt(a.channels)
            ),
            None => NOT_AVAILABLE.to_string(),
        };

        Self {
            channel: channel.to_string(),
            channel_name: or_na(entry.channel_name.as_deref()),
            current_program: or_na(entry.current_program.as_ref().and_then(|p| p.title.as_deref())),
            subscribers: entry.subscriber_count,
            stream_url: or_na(entry.stream_url.as_deref()),
            video_codec,
            resolution,
            audio,
        }
    }
}

/// Summaries for a whole status map, numeric channels first in numeric
/// order, then the rest lexically.
pub fn summarize_streams(map: &StreamStatusMap) -> Vec<StreamSummary> {
    let mut rows: Vec<StreamSummary> =
        map.iter().map(|(channel, entry)| StreamSummary::from_entry(channel, entry)).collect();
    rows.sort_by(|a, b| match (a.channel.parse::<i64>(), b.channel.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.channel.cmp(&b.channel),
    });
    rows
}

/// Channels with a stop request in flight. Lives outside the polled rows
/// so a table rebuild cannot re-enable a pending stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingStops(HashSet<String>);

impl PendingStops {
    /// Mark a stop as started. False if one is already running.
    pub fn begin(&mut self, channel: &str) -> bool {
        self.0.insert(channel.to_string())
    }

    pub fn finish(&mut self, channel: &str) {
        self.0.remove(channel);
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.0.contains(channel)
    }
}

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn display_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_stop_survives_a_status_rebuild() {
        let mut pending = PendingStops::default();
        assert!(pending.begin("12"));
        assert!(!pending.begin("12"));

        // A fresh poll result does not touch the pending set
        let map: StreamStatusMap =
            serde_json::from_str(r#"{"12": {"subscriber_count": 1}, "7": {"subscriber_count": 2}}"#).unwrap();
        let rows = summarize_streams(&map);
        assert!(rows.iter().any(|r| pending.contains(&r.channel)));
        assert!(!pending.contains("7"));

        pending.finish("12");
        assert!(!pending.contains("12"));
        assert!(pending.begin("12"));
    }

    #[test]
    fn picks_first_video_and_audio_streams() {
        let map: StreamStatusMap = serde_json::from_str(
            r#"{"12": {"subscriber_count": 1, "stream_url": "http://src/12", "channel_name": "Twelve",
                "current_program": {"title": "Match of the Day"},
                "probe_info": {"streams": [
                    {"codec_type": "audio", "codec_name": "aac", "sample_rate": "48000", "channels": 2},
                    {"codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080},
                    {"codec_type": "audio", "codec_name": "ac3", "sample_rate": "44100", "channels": 6}
                ]}}}"#,
        )
        .unwrap();
        let rows = summarize_streams(&map);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.video_codec, "h264");
        assert_eq!(row.resolution, "1920x1080");
        assert_eq!(row.audio, "aac 48000Hz 2ch");
        assert_eq!(row.current_program, "Match of the Day");
        assert_eq!(row.stream_url, "http://src/12");
    }

    #[test]
    fn missing_details_render_as_na() {
        let entry = StreamStatusEntry { subscriber_count: 3, ..Default::default() };
        let row = StreamSummary::from_entry("7", &entry);
        assert_eq!(row.channel_name, "N/A");
        assert_eq!(row.current_program, "N/A");
        assert_eq!(row.stream_url, "N/A");
        assert_eq!(row.video_codec, "N/A");
        assert_eq!(row.resolution, "N/A");
        assert_eq!(row.audio, "N/A");
    }

    #[test]
    fn channels_sort_numerically() {
        let mut map = StreamStatusMap::new();
        for ch in ["10", "9", "news"] {
            map.insert(ch.to_string(), StreamStatusEntry::default());
        }
        let order: Vec<String> = summarize_streams(&map).into_iter().map(|r| r.channel).collect();
        assert_eq!(order, vec!["9", "10", "news"]);
    }
}
