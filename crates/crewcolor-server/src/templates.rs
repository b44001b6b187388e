//! Compiled page templates.
//!
//! Templates live in `templates/` and are compiled into the binary by
//! askama, so there is nothing to load or look up at runtime. Two helpers:
//! `incr` turns a 0-based member index into the 1-based number shown to
//! viewers, and `css_escape` makes a submitted color name safe to drop into
//! the stylesheet, which askama does not escape.

use askama::Template;

use crewcolor_core::palette;

mod filters {
    use std::fmt::Write as _;

    /// Anything that reads as a 0-based index, however many references deep
    /// the template engine hands it over.
    pub trait ZeroBased {
        fn zero_based(&self) -> usize;
    }

    impl ZeroBased for usize {
        fn zero_based(&self) -> usize {
            *self
        }
    }

    impl<T: ZeroBased + ?Sized> ZeroBased for &T {
        fn zero_based(&self) -> usize {
            (**self).zero_based()
        }
    }

    /// `{{ i|incr }}`: `i + 1`.
    #[allow(clippy::unnecessary_wraps)]
    pub fn incr<T: ZeroBased>(n: T) -> ::askama::Result<usize> {
        Ok(n.zero_based() + 1)
    }

    /// `{{ color|css_escape }}`: every character outside `[A-Za-z0-9_-]`
    /// becomes a CSS hex escape (`;` is `\3b `), so a color name can neither
    /// close the declaration nor the string it sits in.
    pub fn css_escape<T: std::fmt::Display>(value: T) -> ::askama::Result<String> {
        let raw = value.to_string();
        let mut out = String::with_capacity(raw.len());
        for c in raw.chars() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                out.push(c);
            } else {
                write!(out, "\\{:x} ", u32::from(c))?;
            }
        }
        Ok(out)
    }
}

/// One entry of the member count dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountOption {
    pub value: usize,
    pub selected: bool,
}

/// One swatch radio button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorChoice {
    pub name: &'static str,
    pub checked: bool,
}

/// The swatch row for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSlot {
    pub index: usize,
    pub saved: String,
    pub choices: Vec<ColorChoice>,
}

/// `GET /select`: the operator's form.
#[derive(Template, Debug)]
#[template(path = "select.html")]
pub struct SelectPage {
    pub count_options: Vec<CountOption>,
    pub count_unset: bool,
    pub slots: Vec<MemberSlot>,
    pub error: String,
}

impl SelectPage {
    /// Build the page context.
    ///
    /// `selected_count` is the stored member count (`None` before the first
    /// submission). `saved_colors` holds one entry per member slot, empty
    /// where nothing is stored; slots without an entry render empty too.
    #[must_use]
    pub fn new(selected_count: Option<usize>, saved_colors: &[String], error: String) -> Self {
        let count_options = palette::member_counts()
            .map(|value| CountOption {
                value,
                selected: selected_count == Some(value),
            })
            .collect();

        let slots = palette::member_indices()
            .map(|index| {
                let saved = saved_colors.get(index).cloned().unwrap_or_default();
                let choices = palette::COLORS
                    .iter()
                    .map(|&name| ColorChoice {
                        name,
                        checked: name == saved,
                    })
                    .collect();
                MemberSlot {
                    index,
                    saved,
                    choices,
                }
            })
            .collect();

        Self {
            count_options,
            count_unset: selected_count.is_none_or(|c| !palette::member_counts().contains(&c)),
            slots,
            error,
        }
    }
}

/// `GET /overlay`: the ordered color list for the game overlay.
#[derive(Template, Debug)]
#[template(path = "overlay.html")]
pub struct OverlayPage {
    pub colors: Vec<String>,
}

/// One CSS rule per member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRule {
    pub index: usize,
    pub color: String,
}

/// `GET /css`: the assignment as a stylesheet, one `.member-N` rule per
/// member with `N` starting at 1.
#[derive(Template, Debug)]
#[template(path = "stylesheet.css", escape = "none")]
pub struct Stylesheet {
    pub rules: Vec<ColorRule>,
}

impl Stylesheet {
    #[must_use]
    pub fn new(colors: Vec<String>) -> Self {
        let rules = colors
            .into_iter()
            .enumerate()
            .map(|(index, color)| ColorRule { index, color })
            .collect();
        Self { rules }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn incr_adds_one() {
        assert_eq!(filters::incr(0_usize).unwrap(), 1);
        assert_eq!(filters::incr(&&14_usize).unwrap(), 15);
    }

    #[test]
    fn select_page_without_state() {
        let page = SelectPage::new(None, &[], String::new());
        assert!(page.count_unset);
        assert!(page.count_options.iter().all(|o| !o.selected));
        assert_eq!(page.slots.len(), palette::MAX_MEMBERS);
        assert!(page.slots.iter().all(|s| s.saved.is_empty()));
        assert!(page.slots.iter().flat_map(|s| &s.choices).all(|c| !c.checked));

        let html = page.render().unwrap();
        assert!(html.contains(r#"action="/color""#));
        assert!(!html.contains(r#"class="error""#));
    }

    #[test]
    fn select_page_preselects_saved_state() {
        let saved = vec!["red".to_owned(), String::new(), "coral".to_owned()];
        let page = SelectPage::new(Some(6), &saved, "3-th color is not selected".to_owned());

        assert!(!page.count_unset);
        let selected: Vec<usize> = page
            .count_options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, vec![6]);
        assert_eq!(page.slots[0].saved, "red");
        assert!(page.slots[0].choices.iter().any(|c| c.name == "red" && c.checked));
        assert!(page.slots[1].choices.iter().all(|c| !c.checked));

        let html = page.render().unwrap();
        assert!(html.contains("3-th color is not selected"));
        assert!(html.contains(r#"<option value="6" selected>"#));
    }

    #[test]
    fn select_page_escapes_error() {
        let page = SelectPage::new(None, &[], "<script>".to_owned());
        let html = page.render().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn out_of_range_count_leaves_dropdown_unset() {
        let page = SelectPage::new(Some(20), &[], String::new());
        assert!(page.count_unset);
    }

    #[test]
    fn overlay_lists_colors_in_order() {
        let html = OverlayPage {
            colors: vec!["red".to_owned(), "blue".to_owned(), "green".to_owned()],
        }
        .render()
        .unwrap();

        let red = html.find(r#"data-color="red""#).unwrap();
        let blue = html.find(r#"data-color="blue""#).unwrap();
        let green = html.find(r#"data-color="green""#).unwrap();
        assert!(red < blue && blue < green);
    }

    #[test]
    fn stylesheet_numbers_rules_from_one() {
        let css = Stylesheet::new(vec!["red".to_owned(), "lime".to_owned()])
            .render()
            .unwrap();

        assert!(css.contains(".member-1 {"));
        assert!(css.contains(".member-2 {"));
        assert!(!css.contains(".member-0"));
        assert!(!css.contains(".member-3"));

        let first = css.find(".member-1").unwrap();
        let red = css.find("--member-color: red;").unwrap();
        let second = css.find(".member-2").unwrap();
        let lime = css.find("--member-color: lime;").unwrap();
        assert!(first < red && red < second && second < lime);
    }

    #[test]
    fn css_escape_keeps_plain_names() {
        assert_eq!(filters::css_escape("light-blue_2").unwrap(), "light-blue_2");
    }

    #[test]
    fn css_escape_hex_encodes_everything_else() {
        assert_eq!(filters::css_escape("a;b}").unwrap(), "a\\3b b\\7d ");
        assert_eq!(filters::css_escape("\"").unwrap(), "\\22 ");
    }

    #[test]
    fn stylesheet_cannot_be_broken_out_of() {
        let css = Stylesheet::new(vec![
            "red;} body{display:none".to_owned(),
            "x\");} *{color:red".to_owned(),
        ])
        .render()
        .unwrap();

        assert!(!css.contains("red;}"));
        assert!(!css.contains("body{"));
        assert!(!css.contains("*{"));
        // Only the two rule blocks open and close braces.
        assert_eq!(css.matches('{').count(), 2);
        assert_eq!(css.matches('}').count(), 2);
        assert!(css.contains("--member-color: red\\3b \\7d \\20 body\\7b display\\3a none;"));
    }
}
