//! Expansion of tag tokens inside a name template into the equivalent
//! regex fragment, so templates can be authored with the same tags used
//! in `create_folders` (spec §3's `NameTemplates` glossary entry: "Tag
//! tokens... appearing in a template are expanded to their equivalent
//! regex fragments before matching").

/// Replace every recognised tag token in `template` with a regex
/// fragment matching whatever that tag expands to at format time.
/// Unrecognised `@..@` tokens (an author typo) are left untouched so the
/// resulting regex simply never matches, surfacing as a `TEMPLATE` issue
/// rather than a silent expansion bug.
pub fn expand_template_tags(template: &str) -> String {
    template
        .replace("@DATETIME@", r"\d{8}T\d{6}")
        .replace("@DATETIMETO@", r"\d{8}T\d{6}")
        .replace("@DATETO@", r"\d{8}")
        .replace("@DATE@", r"\d{8}")
        .replace("@TIMETO@", r"\d{6}")
        .replace("@TIME@", r"\d{6}")
        .replace("@TO@", r"\d+")
        .replace("@*@", r".*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_date_tag_to_digit_run() {
        assert_eq!(expand_template_tags(r"sub-\d\d_@DATE@"), r"sub-\d\d_\d{8}");
    }

    #[test]
    fn expands_datetime_before_date_and_time() {
        let expanded = expand_template_tags("@DATETIME@");
        assert_eq!(expanded, r"\d{8}T\d{6}");
    }

    #[test]
    fn leaves_unrecognised_tag_untouched() {
        assert_eq!(expand_template_tags("@NOPE@"), "@NOPE@");
    }
}
