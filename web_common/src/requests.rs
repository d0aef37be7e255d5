//! Request bodies sent to the channel server.
//!
//! Form-encoded and multipart endpoints take their fields from
//! [`FormBody::fields`]; the browser side decides how to encode them.

use serde::{Deserialize, Serialize};

/// A request whose body is a flat list of form fields.
pub trait FormBody {
    /// Endpoint path, relative to the API base.
    const PATH: &'static str;
    /// Multipart unless the endpoint reads `application/x-www-form-urlencoded`.
    const MULTIPART: bool = true;

    fn fields(&self) -> Vec<(&'static str, String)>;
}

/// `POST /update_channel_active` (form-encoded).
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveUpdate {
    pub channel_id: i64,
    pub active: bool,
}

impl FormBody for ActiveUpdate {
    const PATH: &'static str = "/update_channel_active";
    const MULTIPART: bool = false;

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("channel_id", self.channel_id.to_string()),
            ("active", self.active.to_string()),
        ]
    }
}

/// `POST /update_channels_active_bulk` (form-encoded).
#[derive(Debug, Clone, PartialEq)]
pub struct BulkActiveUpdate {
    pub channel_ids: Vec<i64>,
    pub active: bool,
}

impl FormBody for BulkActiveUpdate {
    const PATH: &'static str = "/update_channels_active_bulk";
    const MULTIPART: bool = false;

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("channel_ids", join_ids(&self.channel_ids)),
            ("active", self.active.to_string()),
        ]
    }
}

/// `POST /update_channel_logo` (multipart).
#[derive(Debug, Clone, PartialEq)]
pub struct LogoUpdate {
    pub channel_id: i64,
    pub new_logo: String,
}

impl FormBody for LogoUpdate {
    const PATH: &'static str = "/update_channel_logo";

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("channel_id", self.channel_id.to_string()),
            ("new_logo", self.new_logo.clone()),
        ]
    }
}

/// `POST /update_channel_number` (multipart).
#[derive(Debug, Clone, PartialEq)]
pub struct NumberUpdate {
    pub channel_id: i64,
    pub current_number: String,
    pub new_number: String,
}

impl FormBody for NumberUpdate {
    const PATH: &'static str = "/update_channel_number";

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("channel_id", self.channel_id.to_string()),
            ("current_id", self.current_number.clone()),
            ("new_id", self.new_number.clone()),
        ]
    }
}

/// `POST /update_channel_properties` (multipart), the modal's "Save All".
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPropertiesUpdate {
    pub channel_id: i64,
    pub number: String,
    pub name: String,
    pub category: String,
    pub logo: String,
    pub epg_entry: String,
    pub active: bool,
}

impl FormBody for ChannelPropertiesUpdate {
    const PATH: &'static str = "/update_channel_properties";

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("channel_id", self.channel_id.to_string()),
            ("new_channel_number", self.number.clone()),
            ("new_name", self.name.clone()),
            ("new_category", self.category.clone()),
            ("new_logo", self.logo.clone()),
            ("new_epg_entry", self.epg_entry.clone()),
            ("new_active", if self.active { "1" } else { "0" }.to_string()),
        ]
    }
}

/// `POST /delete_channel` (multipart).
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteChannel {
    pub channel_id: i64,
}

impl FormBody for DeleteChannel {
    const PATH: &'static str = "/delete_channel";

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("channel_id", self.channel_id.to_string())]
    }
}

/// `POST /auto_number_channels` (multipart).
#[derive(Debug, Clone, PartialEq)]
pub struct AutoNumberRequest {
    pub start_number: String,
    /// Visible channel ids in display order.
    pub channel_ids: Vec<i64>,
}

impl FormBody for AutoNumberRequest {
    const PATH: &'static str = "/auto_number_channels";

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_number", self.start_number.clone()),
            ("channel_ids", join_ids(&self.channel_ids)),
        ]
    }
}

/// `POST /insert_channel_at` (multipart).
#[derive(Debug, Clone, PartialEq)]
pub struct InsertAtRequest {
    pub insert_at: u32,
}

impl FormBody for InsertAtRequest {
    const PATH: &'static str = "/insert_channel_at";

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("insert_at", self.insert_at.to_string())]
    }
}

/// `POST /update_epg_color` (form-encoded).
#[derive(Debug, Clone, PartialEq)]
pub struct EpgColorUpdate {
    pub filename: String,
    pub color: String,
}

impl FormBody for EpgColorUpdate {
    const PATH: &'static str = "/update_epg_color";
    const MULTIPART: bool = false;

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("filename", self.filename.clone()), ("color", self.color.clone())]
    }
}

/// `POST /delete_epg` (multipart).
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteEpgRequest {
    pub filename: String,
}

impl FormBody for DeleteEpgRequest {
    const PATH: &'static str = "/delete_epg";

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("filename", self.filename.clone())]
    }
}

/// `POST /update_config` (form-encoded).
#[derive(Debug, Clone, PartialEq)]
pub struct TunerConfigUpdate {
    pub tuner_count: u32,
}

impl FormBody for TunerConfigUpdate {
    const PATH: &'static str = "/update_config";
    const MULTIPART: bool = false;

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("tuner_count", self.tuner_count.to_string())]
    }
}

/// `POST /api/streams/stop` JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopStreamRequest {
    pub channel: String,
}

/// `POST /api/ffmpeg/profiles` JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfileRequest {
    pub name: String,
    pub args: String,
}

/// `PUT /api/ffmpeg/profiles/:name` JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileArgsUpdate {
    pub args: String,
}

/// `POST /api/ffmpeg/profiles/select` JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectProfileRequest {
    pub name: String,
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_update_joins_ids_with_commas() {
        let req = BulkActiveUpdate { channel_ids: vec![3, 1, 12], active: false };
        assert_eq!(
            req.fields(),
            vec![("channel_ids", "3,1,12".to_string()), ("active", "false".to_string())]
        );
    }

    #[test]
    fn properties_update_encodes_active_as_digit() {
        let req = ChannelPropertiesUpdate {
            channel_id: 9,
            number: "101".into(),
            name: "Nine".into(),
            category: "News".into(),
            logo: "/logos/nine.png".into(),
            epg_entry: "Nine HD".into(),
            active: true,
        };
        let fields = req.fields();
        assert!(fields.contains(&("new_active", "1".to_string())));
        assert!(fields.contains(&("new_channel_number", "101".to_string())));
        assert_eq!(ChannelPropertiesUpdate::PATH, "/update_channel_properties");
        assert!(ChannelPropertiesUpdate::MULTIPART);
        assert!(!ActiveUpdate::MULTIPART);
    }
}
