//! Settings page state.

/// Long-running settings actions. While any is in flight the stream
/// status poll skips its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsActivity {
    ParsingEpg,
    UploadingEpg,
    DeletingEpg,
    UploadingM3u,
}

/// In-flight flags for [`SettingsActivity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlags {
    parsing_epg: bool,
    uploading_epg: bool,
    deleting_epg: bool,
    uploading_m3u: bool,
}

impl BusyFlags {
    fn slot(&mut self, activity: SettingsActivity) -> &mut bool {
        match activity {
            SettingsActivity::ParsingEpg => &mut self.parsing_epg,
            SettingsActivity::UploadingEpg => &mut self.uploading_epg,
            SettingsActivity::DeletingEpg => &mut self.deleting_epg,
            SettingsActivity::UploadingM3u => &mut self.uploading_m3u,
        }
    }

    pub fn start(&mut self, activity: SettingsActivity) {
        *self.slot(activity) = true;
    }

    pub fn finish(&mut self, activity: SettingsActivity) {
        *self.slot(activity) = false;
    }

    pub fn is_busy(&self, activity: SettingsActivity) -> bool {
        match activity {
            SettingsActivity::ParsingEpg => self.parsing_epg,
            SettingsActivity::UploadingEpg => self.uploading_epg,
            SettingsActivity::DeletingEpg => self.deleting_epg,
            SettingsActivity::UploadingM3u => self.uploading_m3u,
        }
    }

    pub fn any(&self) -> bool {
        self.parsing_epg || self.uploading_epg || self.deleting_epg || self.uploading_m3u
    }
}

/// Query parameters the server appends after a redirect; stripped on load.
pub const ONE_SHOT_PARAMS: [&str; 5] = [
    "updated",
    "upload_success",
    "epg_upload_success",
    "m3u_upload_success",
    "parse_epg_success",
];

/// True if a `?a=b&c` query string carries any one-shot parameter.
pub fn has_one_shot_params(query: &str) -> bool {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split('=').next())
        .any(|key| ONE_SHOT_PARAMS.contains(&key))
}

/// Validate the tuner-count form.
pub fn parse_tuner_count(input: &str) -> Result<u32, String> {
    match input.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err("Tuner count must be a whole number of at least 1.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_flag_marks_busy() {
        let mut flags = BusyFlags::default();
        assert!(!flags.any());
        flags.start(SettingsActivity::DeletingEpg);
        assert!(flags.any());
        assert!(flags.is_busy(SettingsActivity::DeletingEpg));
        flags.finish(SettingsActivity::DeletingEpg);
        assert!(!flags.any());
    }

    #[test]
    fn detects_redirect_parameters() {
        assert!(has_one_shot_params("?updated=true"));
        assert!(has_one_shot_params("?x=1&m3u_upload_success=1"));
        assert!(!has_one_shot_params("?tab=epg"));
        assert!(!has_one_shot_params(""));
    }

    #[test]
    fn tuner_count_is_at_least_one() {
        assert_eq!(parse_tuner_count("2"), Ok(2));
        assert!(parse_tuner_count("0").is_err());
        assert!(parse_tuner_count("two").is_err());
    }
}
