//! Data models returned by the channel server.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One channel as listed by `GET /api/channels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRow {
    pub id: i64,
    /// Display number. Integer-like, but kept as text because the server
    /// is the source of truth and may send anything.
    #[serde(deserialize_with = "number_as_string")]
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default, deserialize_with = "flag_as_bool")]
    pub active: bool,
    /// EPG entry (display name) this channel is mapped to.
    #[serde(default)]
    pub epg_entry: String,
    /// Title of the programme currently on air.
    #[serde(default)]
    pub epg_title: String,
    #[serde(default)]
    pub stream_url: String,
}

impl ChannelRow {
    /// File-name portion of the logo URL.
    pub fn logo_file_name(&self) -> &str {
        logo_file_name(&self.logo_url)
    }
}

/// Last path segment of a logo URL.
pub fn logo_file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// True if the logo's file name contains `filter` (case-insensitive).
pub fn logo_matches(url: &str, filter: &str) -> bool {
    logo_file_name(url)
        .to_lowercase()
        .contains(&filter.to_lowercase())
}

/// EPG entry returned by `GET /api/epg_entries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpgEntry {
    pub display_name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Programme currently on air (`GET /api/current_program`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentProgram {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub stop: Option<String>,
}

/// A named transcode template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FfmpegProfile {
    pub name: String,
    #[serde(alias = "args_str", default)]
    pub args: String,
}

/// `GET /api/ffmpeg/profiles` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileList {
    #[serde(default)]
    pub profiles: Vec<FfmpegProfile>,
    #[serde(default)]
    pub selected: Option<String>,
}

/// One sub-stream of an ffprobe result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sample_rate: Option<String>,
    #[serde(default)]
    pub channels: Option<u32>,
}

/// Probe output attached to a stream status entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeInfo {
    #[serde(default)]
    pub streams: Option<Vec<ProbeStream>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Value of one entry in `GET /api/stream_status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamStatusEntry {
    #[serde(default)]
    pub subscriber_count: u32,
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub current_program: Option<CurrentProgram>,
    #[serde(default)]
    pub probe_info: Option<ProbeInfo>,
}

/// `GET /api/stream_status` body, keyed by channel.
pub type StreamStatusMap = BTreeMap<String, StreamStatusEntry>;

/// `GET /api/config` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_tuner_count")]
    pub tuner_count: u32,
}

fn default_tuner_count() -> u32 {
    1
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { tuner_count: default_tuner_count() }
    }
}

fn number_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn flag_as_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        serde_json::Value::String(s) => matches!(s.as_str(), "1" | "true" | "True"),
        _ => false,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_row_accepts_numeric_and_flag_variants() {
        let row: ChannelRow = serde_json::from_str(
            r#"{"id": 7, "number": 105, "name": "Sport One", "active": 1}"#,
        )
        .unwrap();
        assert_eq!(row.number, "105");
        assert!(row.active);
        assert_eq!(row.category, "");

        let row: ChannelRow = serde_json::from_str(
            r#"{"id": 8, "number": "12", "name": "News", "active": "0"}"#,
        )
        .unwrap();
        assert_eq!(row.number, "12");
        assert!(!row.active);
    }

    #[test]
    fn logo_filter_only_looks_at_file_name() {
        let url = "/static/logos/Sports/espn_hd.png";
        assert!(logo_matches(url, "ESPN"));
        assert!(!logo_matches(url, "sports"));
        assert!(logo_matches(url, ""));
        assert_eq!(logo_file_name("plain.png"), "plain.png");
    }

    #[test]
    fn profile_list_reads_args_str_alias() {
        let list: ProfileList = serde_json::from_str(
            r#"{"profiles": [{"name": "CPU", "args_str": "-i {input}"}], "selected": "CPU"}"#,
        )
        .unwrap();
        assert_eq!(list.profiles[0].args, "-i {input}");
        assert_eq!(list.selected.as_deref(), Some("CPU"));
    }

    #[test]
    fn stream_status_tolerates_probe_errors() {
        let map: StreamStatusMap = serde_json::from_str(
            r#"{"3": {"subscriber_count": 2, "stream_url": "http://x", "channel_name": "Three",
                      "current_program": null, "probe_info": {"error": "timeout"}}}"#,
        )
        .unwrap();
        let entry = &map["3"];
        assert_eq!(entry.subscriber_count, 2);
        assert!(entry.current_program.is_none());
        assert_eq!(entry.probe_info.as_ref().and_then(|p| p.error.as_deref()), Some("timeout"));
    }
}
