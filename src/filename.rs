use chrono::NaiveDate;

/// Lowercases `name`, drops apostrophes and collapses every other run of
/// non-alphanumeric characters into a single hyphen.
pub fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if matches!(c, '\'' | '\u{2019}') {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// `{slug}-report-{yyyyMMdd}.{extension}`, using `fallback` when the client
/// name is missing or slugs to nothing.
pub fn report_filename(
    client_name: Option<&str>,
    date: NaiveDate,
    fallback: &str,
    extension: &str,
) -> String {
    let client = client_name
        .map(slug)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| fallback.to_owned());

    format!("{client}-report-{}.{extension}", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::{report_filename, slug};

    #[test]
    fn slugs() {
        assert_eq!(slug("Joe's Bakery & Co."), "joes-bakery-co");
        assert_eq!(slug("  ACME -- Widgets  "), "acme-widgets");
        assert_eq!(slug("Müller GmbH"), "m-ller-gmbh");
        assert_eq!(slug("2024 Q3"), "2024-q3");
        assert_eq!(slug("???"), "");
    }

    #[test]
    fn filename_with_client() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        assert_eq!(
            report_filename(Some("Joe's Bakery & Co."), date, "client", "pdf"),
            "joes-bakery-co-report-20240307.pdf"
        );
    }

    #[test]
    fn filename_fallback() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

        assert_eq!(
            report_filename(None, date, "client", "pdf"),
            "client-report-20241231.pdf"
        );
        assert_eq!(
            report_filename(Some(" & "), date, "client", "pdf"),
            "client-report-20241231.pdf"
        );
    }
}
