//! FFmpeg transcode profile rules.

use crate::models::FfmpegProfile;

/// Built-in profiles that can be selected but never edited or deleted.
pub const PROTECTED_PROFILES: [&str; 2] = ["CPU", "CUDA"];

/// Placeholder the server substitutes with the stream URL.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Collection endpoint for transcode profiles.
pub const PROFILES_PATH: &str = "/api/ffmpeg/profiles";

/// Resource path of one profile. The name is a single path segment, so
/// `/`, `#` and `?` in it are escaped.
pub fn profile_path(name: &str) -> String {
    format!("{}/{}", PROFILES_PATH, urlencoding::encode(name))
}

pub fn is_protected_profile(name: &str) -> bool {
    PROTECTED_PROFILES.contains(&name)
}

/// Validate the add-profile form. Returns trimmed `(name, args)`.
pub fn validate_new_profile(
    name: &str,
    args: &str,
    existing: &[FfmpegProfile],
) -> Result<(String, String), String> {
    let name = name.trim();
    let args = args.trim();
    if name.is_empty() || args.is_empty() {
        return Err("Name and args are required.".to_string());
    }
    if existing.iter().any(|p| p.name == name) {
        return Err(format!("A profile named '{}' already exists.", name));
    }
    Ok((name.to_string(), args.to_string()))
}

/// Validate the edit form. Returns the trimmed args.
pub fn validate_profile_args(args: &str) -> Result<String, String> {
    let args = args.trim();
    if args.is_empty() {
        return Err("Args cannot be empty.".to_string());
    }
    Ok(args.to_string())
}

/// Warning shown when args would never see the input URL.
pub fn args_warning(args: &str) -> Option<String> {
    (!args.contains(INPUT_PLACEHOLDER))
        .then(|| format!("Args do not contain {}; the stream URL will not be passed.", INPUT_PLACEHOLDER))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> FfmpegProfile {
        FfmpegProfile { name: name.to_string(), args: "-i {input}".to_string() }
    }

    #[test]
    fn profile_names_stay_one_path_segment() {
        assert_eq!(profile_path("Fast"), "/api/ffmpeg/profiles/Fast");
        assert_eq!(profile_path("HD/Fast"), "/api/ffmpeg/profiles/HD%2FFast");
        assert_eq!(profile_path("a#b"), "/api/ffmpeg/profiles/a%23b");
        assert_eq!(profile_path("x?y"), "/api/ffmpeg/profiles/x%3Fy");
        assert_eq!(profile_path("low latency"), "/api/ffmpeg/profiles/low%20latency");
    }

    #[test]
    fn builtins_are_protected() {
        assert!(is_protected_profile("CPU"));
        assert!(is_protected_profile("CUDA"));
        assert!(!is_protected_profile("cpu"));
        assert!(!is_protected_profile("Fast"));
    }

    #[test]
    fn new_profile_needs_name_args_and_unique_name() {
        let existing = vec![profile("CPU")];
        assert!(validate_new_profile("", "-i {input}", &existing).is_err());
        assert!(validate_new_profile("Fast", "   ", &existing).is_err());
        assert!(validate_new_profile("CPU", "-i {input}", &existing).is_err());
        assert_eq!(
            validate_new_profile(" Fast ", " -i {input} -c copy ", &existing),
            Ok(("Fast".to_string(), "-i {input} -c copy".to_string()))
        );
    }

    #[test]
    fn edit_requires_non_blank_args() {
        assert!(validate_profile_args("  ").is_err());
        assert_eq!(validate_profile_args(" -c copy "), Ok("-c copy".to_string()));
        assert!(args_warning("-c copy").is_some());
        assert!(args_warning("-i {input}").is_none());
    }
}
