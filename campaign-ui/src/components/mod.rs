pub mod constituents;
pub mod dashboard;
pub mod map;
pub mod outreach;
pub mod pager;
pub mod toasts;
pub mod transport;
pub mod voting;

use crate::url_state::FilterState;
use campaign_api::{ApiError, CampaignApi};
use campaign_core::dialog::Dialog;
use campaign_core::models::{CandidateView, Group, Party};
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use leptos::*;
use std::future::Future;
use toasts::Toasts;
use wasm_bindgen_futures::spawn_local;

/// Everything a tab needs, provided once by the shell.
#[derive(Clone)]
pub struct Session {
    pub api: CampaignApi,
    pub filter: RwSignal<FilterState>,
    pub toasts: Toasts,
    pub group: RwSignal<Option<Group>>,
    pub parties: RwSignal<Vec<Party>>,
    /// Bumped after every successful write so loaders re-run against the
    /// invalidated cache.
    pub refresh: RwSignal<u64>,
}

impl Session {
    pub fn report(&self, err: ApiError) {
        self.toasts.error(err.user_message());
    }

    pub fn bump(&self) {
        self.refresh.update(|n| *n += 1);
    }

    pub fn candidates(&self) -> Vec<CandidateView> {
        self.group
            .get()
            .map(|g| g.candidates)
            .unwrap_or_default()
    }

    /// Distinct constituencies of the group's candidates, sorted.
    pub fn constituencies(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .candidates()
            .into_iter()
            .map(|c| c.constituency)
            .filter(|c| !c.is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

pub fn session() -> Session {
    expect_context::<Session>()
}

/// Local calendar date from the browser clock.
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or_default()
}

/// The browser's current UTC offset. Falls back to UTC if the reported
/// offset is out of range.
pub fn local_offset() -> FixedOffset {
    // getTimezoneOffset is minutes behind UTC
    let minutes_west = js_sys::Date::new_0().get_timezone_offset() as i32;
    FixedOffset::west_opt(minutes_west * 60).unwrap_or_else(|| Utc.fix())
}

/// Drives a dialog through submit: the draft is sent, the dialog closes with
/// a success toast or stays open with the server's message.
pub fn submit_dialog<D, F, Fut>(
    session: &Session,
    dialog: RwSignal<Dialog<D>>,
    success: &'static str,
    send: F,
) where
    D: Clone + Default + 'static,
    F: FnOnce(CampaignApi, D) -> Fut + 'static,
    Fut: Future<Output = Result<(), ApiError>> + 'static,
{
    let mut draft = None;
    dialog.update(|d| draft = d.begin_submit().ok());
    let Some(draft) = draft else {
        return;
    };
    let session = session.clone();
    spawn_local(async move {
        let result = send(session.api.clone(), draft).await;
        let succeeded = result.is_ok();
        let mut toast = None;
        dialog.update(|d| {
            toast = match result {
                Ok(()) => d.succeed(success).ok(),
                Err(err) => d.fail(err.user_message()).ok(),
            };
        });
        if let Some(toast) = toast {
            session.toasts.push(toast);
        }
        if succeeded {
            session.bump();
        }
    });
}

#[component]
pub fn ConstituencyPicker() -> impl IntoView {
    let session = session();
    let filter = session.filter;
    let options = move || session.constituencies();
    view! {
      <select
        on:change=move |ev| {
          let value = event_target_value(&ev);
          filter.update(|f| f.set_constituency(Some(value)));
        }
      >
        <option value="" selected=move || filter.get().constituency.is_none()>"All constituencies"</option>
        {move || options()
          .into_iter()
          .map(|name| {
            let selected = name.clone();
            view! {
              <option
                value=name.clone()
                selected=move || filter.get().constituency.as_deref() == Some(selected.as_str())
              >
                {name.clone()}
              </option>
            }
          })
          .collect_view()}
      </select>
    }
}

/// Modal frame shared by the form dialogs.
#[component]
pub fn DialogFrame(
    title: &'static str,
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(into)] on_submit: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
      <Show when=move || open.get() fallback=|| ()>
        <div class="dialog-backdrop">
          <div class="dialog panel">
            <h3>{title}</h3>
            <div class="stack">{children()}</div>
            <Show when=move || error.get().is_some() fallback=|| ()>
              <pre class="error">{move || error.get().unwrap_or_default()}</pre>
            </Show>
            <div class="row">
              <button disabled=move || busy.get() on:click=move |_| on_submit.call(())>
                {move || if busy.get() { "Saving..." } else { "Save" }}
              </button>
              <button disabled=move || busy.get() on:click=move |_| on_cancel.call(())>"Cancel"</button>
            </div>
          </div>
        </div>
      </Show>
    }
}
