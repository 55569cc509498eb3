//! Small string helpers used when printing progress lines.

pub const DEFAULT_CUT_LIMIT: usize = 60;

const ELLIPSIS: &str = "...";

/// Return current local time as `HH:MM:SS`
pub fn current_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Shorten `text` to `limit` characters by replacing its middle with `...`.
///
/// Keeps the first quarter of the budget from the head and the rest from the
/// tail, so the file name at the end of a path stays readable. Texts that
/// already fit, and limits below 5, are returned unchanged.
pub fn truncate_middle(text: &str, limit: usize) -> String {
    let length = text.chars().count();
    if limit < 5 || limit >= length {
        return text.to_string();
    }

    let head_len = limit / 4;
    let tail_len = limit - head_len - ELLIPSIS.len();

    let head: String = text.chars().take(head_len).collect();
    let tail: String = text.chars().skip(length - tail_len).collect();

    format!("{}{}{}", head, ELLIPSIS, tail)
}

/// Drop a `?query` suffix from an asset name or path.
pub fn strip_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        let text = "a/very/long/path/to/file.js";
        assert_eq!(truncate_middle(text, DEFAULT_CUT_LIMIT), text);
    }

    #[test]
    fn test_text_at_limit_unchanged() {
        let text = "x".repeat(60);
        assert_eq!(truncate_middle(&text, 60), text);
    }

    #[test]
    fn test_small_limit_unchanged() {
        let text = "some/long/path/that/would/otherwise/be/cut.js";
        assert_eq!(truncate_middle(text, 4), text);
        assert_eq!(truncate_middle(text, 0), text);
    }

    #[test]
    fn test_long_text_keeps_head_and_tail() {
        let text = format!("/home/build/project/dist/{}/bundle.min.js", "nested/".repeat(10));
        let cut = truncate_middle(&text, 60);

        assert_eq!(cut.chars().count(), 60);
        assert!(cut.starts_with("/home/build/pro"));
        assert!(cut.ends_with("bundle.min.js"));
        assert_eq!(&cut[15..18], "...");
    }

    #[test]
    fn test_multibyte_text_is_cut_on_char_boundaries() {
        let text = "ファイル/".repeat(10) + "最後.js";
        let cut = truncate_middle(&text, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("最後.js"));
        assert!(cut.contains("..."));
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("js/app.js?v=12"), "js/app.js");
        assert_eq!(strip_query("js/app.js"), "js/app.js");
        assert_eq!(strip_query(""), "");
    }

    #[test]
    fn test_current_time_format() {
        let time = current_time();
        assert_eq!(time.len(), 8);
        assert_eq!(time.as_bytes()[2], b':');
        assert_eq!(time.as_bytes()[5], b':');
    }
}
