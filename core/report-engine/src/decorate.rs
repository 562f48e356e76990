//! FILENAME: core/report-engine/src/decorate.rs
//! Page-key enrichment.
//!
//! The page key is usually a subject id. The surrounding application links
//! it to a detail view and may hide the real id behind an alias. Values that
//! the query already supplied are never replaced.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use query_model::Cell;
use crate::definition::KeyLinkOptions;

/// Supplies a navigation url and a display value for a page key.
pub trait KeyDecorator {
    fn url_for(&self, key: &Cell) -> Option<String>;

    fn display_for(&self, key: &Cell, page_index: usize) -> Option<String>;
}

/// Leaves keys as the query returned them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecoration;

impl KeyDecorator for NoDecoration {
    fn url_for(&self, _key: &Cell) -> Option<String> {
        None
    }

    fn display_for(&self, _key: &Cell, _page_index: usize) -> Option<String> {
        None
    }
}

/// Links keys through a url template and, in demo mode, masks them.
#[derive(Debug, Clone)]
pub struct SubjectLinkDecorator {
    options: KeyLinkOptions,
}

impl SubjectLinkDecorator {
    pub fn new(options: KeyLinkOptions) -> Self {
        SubjectLinkDecorator { options }
    }
}

impl KeyDecorator for SubjectLinkDecorator {
    /// No link in demo mode: the url would carry the raw key.
    fn url_for(&self, key: &Cell) -> Option<String> {
        if key.is_null() || self.options.demo_mode {
            return None;
        }
        let raw = key.value.to_display_string();
        let encoded = utf8_percent_encode(&raw, NON_ALPHANUMERIC).to_string();
        Some(self.options.url_template.replace("{key}", &encoded))
    }

    fn display_for(&self, _key: &Cell, page_index: usize) -> Option<String> {
        if self.options.demo_mode {
            Some(format!("{}{}", self.options.alias_prefix, page_index + 1))
        } else {
            None
        }
    }
}

/// Returns a copy of `key` with a missing url and display value filled in.
pub fn decorate_key(key: &Cell, page_index: usize, decorator: &dyn KeyDecorator) -> Cell {
    let mut cell = key.clone();
    if cell.url.is_none() {
        cell.url = decorator.url_for(key);
    }
    if cell.display_value.is_none() {
        cell.display_value = decorator.display_for(key, page_index);
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(demo_mode: bool) -> SubjectLinkDecorator {
        let mut options = KeyLinkOptions::new("/study/participant?id={key}");
        options.demo_mode = demo_mode;
        SubjectLinkDecorator::new(options)
    }

    #[test]
    fn test_url_is_encoded() {
        let cell = decorate_key(&Cell::text("PT 1/2"), 0, &link(false));
        assert_eq!(cell.url.as_deref(), Some("/study/participant?id=PT%201%2F2"));
        assert_eq!(cell.display_value, None);
    }

    #[test]
    fn test_present_values_are_kept() {
        let key = Cell::text("PT-1")
            .with_url("/custom")
            .with_display("Masked");
        let cell = decorate_key(&key, 3, &link(true));
        assert_eq!(cell.url.as_deref(), Some("/custom"));
        assert_eq!(cell.display_value.as_deref(), Some("Masked"));
    }

    #[test]
    fn test_demo_mode_alias() {
        let cell = decorate_key(&Cell::text("PT-1"), 4, &link(true));
        assert_eq!(cell.display_value.as_deref(), Some("Participant 5"));
        assert_eq!(cell.value, Cell::text("PT-1").value);
    }

    #[test]
    fn test_demo_mode_does_not_link_raw_key() {
        let cell = decorate_key(&Cell::text("PT-1"), 0, &link(true));
        assert_eq!(cell.url, None);
        assert_eq!(cell.display_value.as_deref(), Some("Participant 1"));
    }

    #[test]
    fn test_null_key_gets_no_url() {
        let cell = decorate_key(&Cell::null(), 0, &link(false));
        assert_eq!(cell.url, None);
    }

    #[test]
    fn test_no_decoration() {
        let key = Cell::number(12.0);
        assert_eq!(decorate_key(&key, 0, &NoDecoration), key);
    }
}
