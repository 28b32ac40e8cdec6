//! Cover picking flow
//!
//! The core never talks to a browser or a search API directly. Whatever
//! mechanism lets the user look at results and point at one image drives
//! this state machine and hands back a URL (or cancels). Only a confirmed
//! candidate ever reaches the fetcher.

use crate::CoverError;

/// Anything that can turn a search query into one picked image URL
///
/// Implementations may be an embedded web view, an external browser plus
/// clipboard, or an API-backed image search; the core does not care.
pub trait CandidateSource {
    /// Let the user pick one image for the query; `None` means cancelled
    fn pick_candidate(&self, query: &str) -> Option<String>;
}

/// Picker flow state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerState {
    Idle,
    Searching,
    CandidateSelected(String),
    Confirmed(String),
    Cancelled,
}

/// Drives the pick-a-cover flow for one game title
#[derive(Debug)]
pub struct CoverPicker {
    state: PickerState,
    query: String,
}

impl CoverPicker {
    /// Start an idle picker for a game title
    pub fn new(title: &str) -> Self {
        Self {
            state: PickerState::Idle,
            query: format!("{} flash game cover", title),
        }
    }

    /// Current state
    pub fn state(&self) -> &PickerState {
        &self.state
    }

    /// The search query the picker was built for
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Image-search URL for whatever front end displays the results
    pub fn search_url(&self) -> String {
        format!(
            "https://www.google.com/search?q={}&tbm=isch&tbs=isz:l",
            percent_encode(&self.query)
        )
    }

    /// Begin searching
    pub fn begin_search(&mut self) -> Result<(), CoverError> {
        match self.state {
            PickerState::Idle => {
                self.state = PickerState::Searching;
                Ok(())
            }
            ref s => Err(CoverError::InvalidTransition(format!(
                "begin_search from {:?}",
                s
            ))),
        }
    }

    /// Select (or re-select) a candidate image
    pub fn select_candidate(&mut self, url: impl Into<String>) -> Result<(), CoverError> {
        match self.state {
            PickerState::Searching | PickerState::CandidateSelected(_) => {
                self.state = PickerState::CandidateSelected(url.into());
                Ok(())
            }
            ref s => Err(CoverError::InvalidTransition(format!(
                "select_candidate from {:?}",
                s
            ))),
        }
    }

    /// Confirm the current candidate, yielding its URL
    pub fn confirm(&mut self) -> Result<String, CoverError> {
        match std::mem::replace(&mut self.state, PickerState::Cancelled) {
            PickerState::CandidateSelected(url) => {
                self.state = PickerState::Confirmed(url.clone());
                Ok(url)
            }
            s => {
                self.state = s.clone();
                Err(CoverError::InvalidTransition(format!("confirm from {:?}", s)))
            }
        }
    }

    /// Abandon the flow; a no-op once already confirmed or cancelled
    pub fn cancel(&mut self) {
        match self.state {
            PickerState::Confirmed(_) | PickerState::Cancelled => {}
            _ => self.state = PickerState::Cancelled,
        }
    }

    /// The confirmed URL, if the flow ended with one
    pub fn confirmed_url(&self) -> Option<&str> {
        match &self.state {
            PickerState::Confirmed(url) => Some(url),
            _ => None,
        }
    }
}

/// Minimal query-string percent encoding (space as '+')
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut picker = CoverPicker::new("My Game");
        assert_eq!(*picker.state(), PickerState::Idle);

        picker.begin_search().unwrap();
        picker.select_candidate("http://img.example/a.png").unwrap();
        let url = picker.confirm().unwrap();

        assert_eq!(url, "http://img.example/a.png");
        assert_eq!(picker.confirmed_url(), Some("http://img.example/a.png"));
    }

    #[test]
    fn test_reselection_loops() {
        let mut picker = CoverPicker::new("G");
        picker.begin_search().unwrap();
        picker.select_candidate("http://img.example/a.png").unwrap();
        picker.select_candidate("http://img.example/b.png").unwrap();

        assert_eq!(picker.confirm().unwrap(), "http://img.example/b.png");
    }

    #[test]
    fn test_confirm_requires_candidate() {
        let mut picker = CoverPicker::new("G");
        assert!(picker.confirm().is_err());

        picker.begin_search().unwrap();
        assert!(picker.confirm().is_err());
        assert_eq!(*picker.state(), PickerState::Searching);
    }

    #[test]
    fn test_cancel_anywhere() {
        let mut picker = CoverPicker::new("G");
        picker.begin_search().unwrap();
        picker.select_candidate("http://img.example/a.png").unwrap();
        picker.cancel();

        assert_eq!(*picker.state(), PickerState::Cancelled);
        assert!(picker.confirmed_url().is_none());
        assert!(picker.select_candidate("x").is_err());
    }

    #[test]
    fn test_cancel_after_confirm_is_noop() {
        let mut picker = CoverPicker::new("G");
        picker.begin_search().unwrap();
        picker.select_candidate("http://img.example/a.png").unwrap();
        picker.confirm().unwrap();

        picker.cancel();
        assert_eq!(picker.confirmed_url(), Some("http://img.example/a.png"));
    }

    #[test]
    fn test_search_url_encoding() {
        let picker = CoverPicker::new("My Game");
        assert_eq!(
            picker.search_url(),
            "https://www.google.com/search?q=My+Game+flash+game+cover&tbm=isch&tbs=isz:l"
        );
    }

    struct FixedSource(Option<String>);

    impl CandidateSource for FixedSource {
        fn pick_candidate(&self, _query: &str) -> Option<String> {
            self.0.clone()
        }
    }

    #[test]
    fn test_candidate_source_trait() {
        let source = FixedSource(Some("http://img.example/a.png".into()));
        assert_eq!(
            source.pick_candidate("q"),
            Some("http://img.example/a.png".to_string())
        );

        let cancelled = FixedSource(None);
        assert_eq!(cancelled.pick_candidate("q"), None);
    }
}
