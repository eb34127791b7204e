use super::pager::Pager;
use super::{session, submit_dialog, ConstituencyPicker, DialogFrame};
use crate::forms::{PlotForm, SupportForm};
use crate::url_state::FilterState;
use campaign_api::hooks::SupportFilter;
use campaign_core::dialog::{Dialog, DialogPhase};
use campaign_core::models::{Constituent, ConstituentDetail, Page, SupportAssessment};
use campaign_core::pagination::PageCursor;
use campaign_core::SupportLevel;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn ConstituentsTab() -> impl IntoView {
    let session = session();
    let filter = session.filter;
    let refresh = session.refresh;
    let page = create_rw_signal(Page::<Constituent>::default());
    let loading = create_rw_signal(false);
    let selected = create_rw_signal(None::<String>);

    let loader = session.clone();
    create_effect(move |_| {
        refresh.track();
        let query = filter.with(FilterState::constituent_filter);
        let api = loader.api.clone();
        // keep the last page on screen while the next one loads
        if let Some(previous) = api.placeholder::<Page<Constituent>>(&api.constituents_key(&query)) {
            page.set(previous);
        }
        loading.set(true);
        let loader = loader.clone();
        spawn_local(async move {
            match api.constituents(&query).await {
                Ok(p) => page.set(p),
                Err(err) => loader.report(err),
            }
            loading.set(false);
        });
    });

    let cursor = Signal::derive(move || page.with(PageCursor::of));
    let shown = Signal::derive(move || page.with(|p| p.items.len()));

    view! {
      <div class="layout">
        <section class="panel">
          <h2>"Constituents"</h2>
          <div class="row">
            <input
              prop:value=move || filter.get().search
              on:change=move |ev| {
                let value = event_target_value(&ev);
                filter.update(|f| f.set_search(value));
              }
              placeholder="Search name, ID or address"
            />
            <ConstituencyPicker/>
            <Show when=move || loading.get() fallback=|| ()>
              <span class="meta">"Loading..."</span>
            </Show>
          </div>
          <table>
            <thead>
              <tr><th>"Name"</th><th>"National ID"</th><th>"Island"</th><th>"Constituency"</th><th>"Plotted"</th></tr>
            </thead>
            <tbody>
              <For
                each=move || page.get().items
                key=|c| c.id.clone()
                children=move |c| {
                  let id = c.id.clone();
                  let row_id = c.id.clone();
                  view! {
                    <tr
                      class=move || if selected.get().as_deref() == Some(row_id.as_str()) { "selected" } else { "" }
                      on:click=move |_| selected.set(Some(id.clone()))
                    >
                      <td>{c.full_name()}</td>
                      <td>{c.national_id.clone()}</td>
                      <td>{c.island.clone()}</td>
                      <td>{c.constituency.clone()}</td>
                      <td>{if c.is_plotted() { "yes" } else { "no" }}</td>
                    </tr>
                  }
                }
              />
            </tbody>
          </table>
          <Pager cursor=cursor shown=shown on_page=move |offset| filter.update(|f| f.offset = offset)/>
        </section>

        <section class="panel">
          <Show
            when=move || selected.get().is_some()
            fallback=|| view! { <p class="meta">"Select a constituent to see details."</p> }
          >
            <ConstituentPanel id=Signal::derive(move || selected.get().unwrap_or_default())/>
          </Show>
        </section>
      </div>
    }
}

#[component]
fn ConstituentPanel(#[prop(into)] id: Signal<String>) -> impl IntoView {
    let session = session();
    let refresh = session.refresh;
    let detail = create_rw_signal(None::<ConstituentDetail>);
    let history = create_rw_signal(Vec::<SupportAssessment>::new());
    let support_dialog = create_rw_signal(Dialog::<SupportForm>::default());
    let plot_dialog = create_rw_signal(Dialog::<PlotForm>::default());

    let loader = session.clone();
    create_effect(move |_| {
        refresh.track();
        let id = id.get();
        if id.is_empty() {
            return;
        }
        let loader = loader.clone();
        spawn_local(async move {
            let api = &loader.api;
            match api.constituent(&id).await {
                Ok(d) => detail.set(Some(d)),
                Err(err) => loader.report(err),
            }
            let filter = SupportFilter {
                constituent_id: Some(id),
                candidate_id: None,
            };
            match api.support(&filter).await {
                Ok(mut rows) => {
                    rows.sort_by(|a, b| b.assessed_at.cmp(&a.assessed_at));
                    history.set(rows);
                }
                Err(err) => loader.report(err),
            }
        });
    });

    let names = session.clone();
    let candidate_name = move |candidate_id: Option<String>| {
        candidate_id
            .and_then(|k| names.candidates().into_iter().find(|c| c.id == k).map(|c| c.name))
            .unwrap_or_else(|| "General".into())
    };

    let support_submit = session.clone();
    let save_support = move || {
        let constituent_id = id.get_untracked();
        submit_dialog(&support_submit, support_dialog, "Support logged", move |api, form: SupportForm| async move {
            let draft = form.to_request(&constituent_id)?;
            api.log_support(&draft).await.map(|_| ())
        });
    };

    let plot_submit = session.clone();
    let save_plot = move || {
        let constituent_id = id.get_untracked();
        submit_dialog(&plot_submit, plot_dialog, "House plotted", move |api, form: PlotForm| async move {
            api.plot_house(&constituent_id, form.to_location()?).await
        });
    };

    let open_plot = move || {
        let current = detail.get_untracked().map(|d| d.constituent);
        let prefill = PlotForm {
            latitude: current.as_ref().and_then(|c| c.latitude).map(|v| v.to_string()).unwrap_or_default(),
            longitude: current.as_ref().and_then(|c| c.longitude).map(|v| v.to_string()).unwrap_or_default(),
        };
        plot_dialog.update(|d| d.open_edit(id.get_untracked(), prefill));
    };

    let candidates = session.clone();

    view! {
      {move || detail.get().map(|d| {
        let today = super::today();
        let affiliations: Vec<String> = d
          .current_affiliations(today)
          .into_iter()
          .map(|a| a.party_name.clone())
          .collect();
        view! {
          <h2>{d.constituent.full_name()}</h2>
          <div class="meta">{format!("{} | {} | {}", d.constituent.national_id, d.constituent.address, d.constituent.constituency)}</div>
          <div>{d.profile.clone().unwrap_or_default()}</div>
          <div class="meta">{format!("Nicknames: {}", if d.nicknames.is_empty() { "-".to_string() } else { d.nicknames.join(", ") })}</div>
          <div class="meta">{format!("Current party: {}", if affiliations.is_empty() { "-".to_string() } else { affiliations.join(", ") })}</div>
        }
      })}

      <div class="row">
        <button on:click=move |_| support_dialog.update(|d| d.open_new())>"Log support"</button>
        <button on:click=move |_| open_plot()>"Plot house"</button>
      </div>

      <h3>"Support history"</h3>
      <ul>
        <For
          each=move || history.get()
          key=|a| a.id.clone()
          children=move |a| {
            let who = candidate_name(a.candidate_id.clone());
            view! {
              <li>
                <span class="badge" style=format!("background:{}", a.support_level.color())>{a.support_level.label()}</span>
                " " <b>{who}</b>
                <div class="meta">{format!("confidence {} by {} on {}", a.confidence, a.assessed_by, a.assessed_at.with_timezone(&super::local_offset()).format("%Y-%m-%d"))}</div>
              </li>
            }
          }
        />
      </ul>

      <DialogFrame
        title="Log support"
        open=Signal::derive(move || support_dialog.with(Dialog::is_open))
        busy=Signal::derive(move || support_dialog.with(|d| d.phase() == DialogPhase::Submitting))
        error=Signal::derive(move || support_dialog.with(|d| d.last_error().map(str::to_string)))
        on_submit=move |_| save_support()
        on_cancel=move |_| support_dialog.update(|d| { let _ = d.close(); })
      >
        <select on:change=move |ev| {
          let value = event_target_value(&ev);
          support_dialog.update(|d| d.edit(|f| f.candidate_id = value));
        }>
          <option value="">"General (no candidate)"</option>
          {
            let candidates = candidates.clone();
            move || candidates.candidates().into_iter().map(|c| view! { <option value=c.id.clone()>{c.name.clone()}</option> }).collect_view()
          }
        </select>
        <select on:change=move |ev| {
          if let Ok(level) = event_target_value(&ev).parse::<SupportLevel>() {
            support_dialog.update(|d| d.edit(|f| f.level = level));
          }
        }>
          {SupportLevel::ALL.into_iter().map(|level| view! {
            <option value=level.as_str() selected=move || support_dialog.with(|d| d.draft().level == level)>{level.label()}</option>
          }).collect_view()}
        </select>
        <input
          type="number" min="1" max="5"
          prop:value=move || support_dialog.with(|d| d.draft().confidence.to_string())
          on:input=move |ev| {
            let confidence = event_target_value(&ev).parse().unwrap_or(0);
            support_dialog.update(|d| d.edit(|f| f.confidence = confidence));
          }
        />
        <input
          placeholder="Assessed by"
          prop:value=move || support_dialog.with(|d| d.draft().assessed_by.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            support_dialog.update(|d| d.edit(|f| f.assessed_by = value));
          }
        />
        <input
          placeholder="Notes"
          prop:value=move || support_dialog.with(|d| d.draft().notes.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            support_dialog.update(|d| d.edit(|f| f.notes = value));
          }
        />
      </DialogFrame>

      <DialogFrame
        title="Plot house"
        open=Signal::derive(move || plot_dialog.with(Dialog::is_open))
        busy=Signal::derive(move || plot_dialog.with(|d| d.phase() == DialogPhase::Submitting))
        error=Signal::derive(move || plot_dialog.with(|d| d.last_error().map(str::to_string)))
        on_submit=move |_| save_plot()
        on_cancel=move |_| plot_dialog.update(|d| { let _ = d.close(); })
      >
        <input
          placeholder="Latitude"
          prop:value=move || plot_dialog.with(|d| d.draft().latitude.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            plot_dialog.update(|d| d.edit(|f| f.latitude = value));
          }
        />
        <input
          placeholder="Longitude"
          prop:value=move || plot_dialog.with(|d| d.draft().longitude.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            plot_dialog.update(|d| d.edit(|f| f.longitude = value));
          }
        />
      </DialogFrame>
    }
}
