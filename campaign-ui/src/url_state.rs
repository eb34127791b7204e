//! Filter and selection state mirrored into the page's query string, so a
//! reload or shared link restores the same view.

use campaign_api::hooks::ConstituentFilter;
use campaign_core::pagination::DEFAULT_PAGE_SIZE;
use wasm_bindgen::JsValue;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Dashboard,
    Constituents,
    Outreach,
    Transport,
    Voting,
    Map,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Constituents,
        Tab::Outreach,
        Tab::Transport,
        Tab::Voting,
        Tab::Map,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Constituents => "constituents",
            Tab::Outreach => "outreach",
            Tab::Transport => "transport",
            Tab::Voting => "voting",
            Tab::Map => "map",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Constituents => "Constituents",
            Tab::Outreach => "Outreach",
            Tab::Transport => "Transport",
            Tab::Voting => "Voting",
            Tab::Map => "Map",
        }
    }

    fn parse(raw: &str) -> Option<Tab> {
        Tab::ALL.into_iter().find(|t| t.as_str() == raw)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub tab: Tab,
    pub constituency: Option<String>,
    pub search: String,
    pub party: Option<String>,
    pub candidate: Option<String>,
    pub offset: usize,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl FilterState {
    /// Unknown keys and unparsable values are ignored.
    pub fn from_query(query: &str) -> Self {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(query.trim_start_matches('?')).unwrap_or_default();
        let mut state = FilterState::default();
        for (key, value) in pairs {
            match key.as_str() {
                "tab" => state.tab = Tab::parse(&value).unwrap_or_default(),
                "constituency" => state.constituency = non_empty(value),
                "search" => state.search = value.trim().to_string(),
                "party" => state.party = non_empty(value),
                "candidate" => state.candidate = non_empty(value),
                "offset" => state.offset = value.parse().unwrap_or(0),
                _ => {}
            }
        }
        state
    }

    /// Defaults are left out so the landing URL stays bare.
    pub fn to_query(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if self.tab != Tab::default() {
            pairs.push(("tab", self.tab.as_str().to_string()));
        }
        if let Some(c) = &self.constituency {
            pairs.push(("constituency", c.clone()));
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(p) = &self.party {
            pairs.push(("party", p.clone()));
        }
        if let Some(c) = &self.candidate {
            pairs.push(("candidate", c.clone()));
        }
        if self.offset > 0 {
            pairs.push(("offset", self.offset.to_string()));
        }
        serde_urlencoded::to_string(pairs).unwrap_or_default()
    }

    /// Narrowing the result set starts again from the first page.
    pub fn set_constituency(&mut self, constituency: Option<String>) {
        self.constituency = constituency.and_then(non_empty);
        self.offset = 0;
    }

    pub fn set_search(&mut self, search: String) {
        self.search = search.trim().to_string();
        self.offset = 0;
    }

    pub fn constituent_filter(&self) -> ConstituentFilter {
        ConstituentFilter {
            constituency: self.constituency.clone(),
            search: non_empty(self.search.clone()),
            offset: self.offset,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

pub fn read_location() -> FilterState {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|q| FilterState::from_query(&q))
        .unwrap_or_default()
}

/// Replaces the current history entry; filter changes do not add back-button
/// steps.
pub fn write_location(state: &FilterState) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let path = window.location().pathname().unwrap_or_default();
    let query = state.to_query();
    let url = if query.is_empty() {
        path
    } else {
        format!("{path}?{query}")
    };
    if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(&url)) {
        leptos::logging::warn!("could not update the address bar: {err:?}");
    }
}
