//! EPG search and source-file colour inference planning.

use std::collections::HashMap;

use crate::color::DEFAULT_SWATCH;

/// The typeahead stays closed below this many characters.
pub const EPG_SEARCH_MIN_CHARS: usize = 2;

/// Concurrent colour lookups per batch.
pub const COLOR_LOOKUP_BATCH: usize = 5;

/// Trimmed search term, or `None` while it is too short to query.
pub fn search_term(input: &str) -> Option<String> {
    let term = input.trim();
    (term.chars().count() >= EPG_SEARCH_MIN_CHARS).then(|| term.to_string())
}

/// Files with no known colour, in listing order.
pub fn files_needing_color(files: &[String], known: &HashMap<String, String>) -> Vec<String> {
    files
        .iter()
        .filter(|f| known.get(*f).map_or(true, |c| c.trim().is_empty()))
        .cloned()
        .collect()
}

/// Split colour lookups into sequential batches of bounded size.
pub fn lookup_batches(files: &[String], batch_size: usize) -> Vec<Vec<String>> {
    files.chunks(batch_size.max(1)).map(|chunk| chunk.to_vec()).collect()
}

/// Swatch colour for a file, falling back to the default.
pub fn file_color<'a>(colors: &'a HashMap<String, String>, file: &str) -> &'a str {
    colors
        .get(file)
        .map(String::as_str)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_SWATCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_terms_do_not_search() {
        assert_eq!(search_term(" a "), None);
        assert_eq!(search_term("bb"), Some("bb".to_string()));
        assert_eq!(search_term("  sky news "), Some("sky news".to_string()));
    }

    #[test]
    fn only_uncoloured_files_are_sampled_in_batches() {
        let files: Vec<String> = (1..=7).map(|i| format!("f{}.xml", i)).collect();
        let mut known = HashMap::new();
        known.insert("f1.xml".to_string(), "#ff0000".to_string());
        known.insert("f2.xml".to_string(), "".to_string());

        let missing = files_needing_color(&files, &known);
        assert_eq!(missing.len(), 6);
        assert_eq!(missing[0], "f2.xml");

        let batches = lookup_batches(&missing, COLOR_LOOKUP_BATCH);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 5);
        assert_eq!(batches[1], vec!["f7.xml".to_string()]);
    }

    #[test]
    fn unknown_files_get_default_swatch() {
        let mut colors = HashMap::new();
        colors.insert("a.xml".to_string(), "#00ff00".to_string());
        assert_eq!(file_color(&colors, "a.xml"), "#00ff00");
        assert_eq!(file_color(&colors, "b.xml"), DEFAULT_SWATCH);
    }
}
