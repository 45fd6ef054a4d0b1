//! Surface-text checks over submitted HTML/CSS.
//!
//! Example:
//!   html: `<p hidden>check my last insta story</p>`
//!   `has_bare_hidden_attr` -> true, `has_open_tag(html, "p")` -> true
//!
//! These are deliberate substring heuristics, not a parser: missions grade
//! learner markup on textual evidence (tag gone, declaration present), which
//! keeps grading instant and predictable for beginners. Every helper expects
//! lower-cased input; the validator lower-cases once per submission.

/// True if an exact, attribute-less opening tag `<name>` occurs.
pub fn has_open_tag(html: &str, name: &str) -> bool {
    html.contains(&format!("<{name}>"))
}

/// True if the closing tag `</name>` occurs.
pub fn has_close_tag(html: &str, name: &str) -> bool {
    html.contains(&format!("</{name}>"))
}

/// True if an opening delimiter `<name` occurs, attributes allowed.
/// Useful for tags that typically carry attributes (`<font color="red">`).
pub fn has_tag_start(html: &str, name: &str) -> bool {
    html.contains(&format!("<{name}"))
}

/// True if a bare `hidden` attribute survives in any of the spellings a
/// learner's editor produces: `hidden>`, `hidden ` or ` hidden`.
pub fn has_bare_hidden_attr(html: &str) -> bool {
    html.contains("hidden>") || html.contains("hidden ") || html.contains(" hidden")
}

/// True if content is hidden through an inline `display: none` style.
pub fn has_inline_display_none(html: &str) -> bool {
    html.contains(r#"style="display: none""#) || html.contains(r#"style="display:none""#)
}

/// True if the element is addressed anywhere: as a `#id` selector in CSS or
/// an `id="..."` attribute in HTML.
pub fn targets_element(html: &str, css: &str, id: &str) -> bool {
    css.contains(&format!("#{id}")) || html.contains(&format!(r#"id="{id}""#))
}

/// True if the selector text occurs in the stylesheet.
pub fn has_selector(css: &str, selector: &str) -> bool {
    css.contains(selector)
}

/// True if the property name occurs with its colon attached.
/// Substring check, so `color` also matches inside `background-color:`.
pub fn has_property(css: &str, property: &str) -> bool {
    css.contains(&format!("{property}:"))
}

/// True if `property: value` occurs, with or without the space after the colon.
pub fn has_declaration(css: &str, property: &str, value: &str) -> bool {
    css.contains(&format!("{property}: {value}")) || css.contains(&format!("{property}:{value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_tag_is_exact() {
        assert!(has_open_tag("<body><center>x</center></body>", "center"));
        assert!(!has_open_tag("<centered-box>x</centered-box>", "center"));
    }

    #[test]
    fn tag_start_allows_attributes() {
        assert!(has_tag_start(r#"<font color="red">x</font>"#, "font"));
        assert!(!has_open_tag(r#"<font color="red">x</font>"#, "font"));
        assert!(has_close_tag(r#"<font color="red">x</font>"#, "font"));
    }

    #[test]
    fn bare_hidden_attr_covers_editor_spellings() {
        assert!(has_bare_hidden_attr("<p hidden>secret</p>"));
        assert!(has_bare_hidden_attr(r#"<p hidden class="msg">secret</p>"#));
        assert!(!has_bare_hidden_attr("<p>secret</p>"));
    }

    #[test]
    fn inline_display_none_matches_both_spacings() {
        assert!(has_inline_display_none(r#"<p style="display: none">x</p>"#));
        assert!(has_inline_display_none(r#"<p style="display:none">x</p>"#));
        assert!(!has_inline_display_none(r#"<p style="display: block">x</p>"#));
    }

    #[test]
    fn element_targets_match_css_or_html() {
        assert!(targets_element("", "#insta-clue { color: red; }", "insta-clue"));
        assert!(targets_element(r#"<div id="insta-clue"></div>"#, "", "insta-clue"));
        assert!(!targets_element("<div></div>", ".insta-clue {}", "insta-clue"));
    }

    #[test]
    fn property_match_includes_compound_names() {
        assert!(has_property("background-color: red;", "color"));
        assert!(!has_property("colorless:1;", "font-size"));
    }

    #[test]
    fn declaration_match_ignores_colon_spacing() {
        assert!(has_declaration("#x { display: block; }", "display", "block"));
        assert!(has_declaration("#x{display:block}", "display", "block"));
        assert!(!has_declaration("#x { display: inline; }", "display", "block"));
    }
}
