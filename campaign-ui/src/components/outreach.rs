use super::{session, submit_dialog, DialogFrame};
use crate::forms::{DoorToDoorForm, OutreachForm};
use campaign_api::hooks::OutreachFilter;
use campaign_core::aggregates::{method_tally, outcome_tally};
use campaign_core::dialog::{Dialog, DialogPhase};
use campaign_core::models::{OutreachLog, OutreachMethod, OutreachOutcome};
use campaign_core::SupportLevel;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

const RECENT_ROWS: usize = 20;

#[component]
pub fn OutreachTab() -> impl IntoView {
    let session = session();
    let refresh = session.refresh;
    let logs = create_rw_signal(Vec::<OutreachLog>::new());
    let contact_dialog = create_rw_signal(Dialog::<OutreachForm>::default());
    let door_dialog = create_rw_signal(Dialog::<DoorToDoorForm>::default());

    let loader = session.clone();
    create_effect(move |_| {
        refresh.track();
        let loader = loader.clone();
        spawn_local(async move {
            match loader.api.outreach(&OutreachFilter::default()).await {
                Ok(mut rows) => {
                    rows.sort_by(|a, b| b.contacted_at.cmp(&a.contacted_at));
                    logs.set(rows);
                }
                Err(err) => loader.report(err),
            }
        });
    });

    let contact_submit = session.clone();
    let save_contact = move || {
        submit_dialog(&contact_submit, contact_dialog, "Contact logged", |api, form: OutreachForm| async move {
            api.log_outreach(&form.to_request()?).await.map(|_| ())
        });
    };

    let door_submit = session.clone();
    let save_door = move || {
        submit_dialog(&door_submit, door_dialog, "Visit logged", |api, form: DoorToDoorForm| async move {
            api.log_door_to_door(&form.to_visit()?).await.map(|_| ())
        });
    };

    let door_opener = session.clone();
    let open_door = move || {
        let form = DoorToDoorForm::for_candidates(&door_opener.candidates());
        door_dialog.update(|d| {
            d.open_new();
            d.edit(|f| *f = form);
        });
    };

    let names = session.clone();
    // rebuild the pick rows only when the candidate list changes
    let pick_ids = create_memo(move |_| {
        door_dialog.with(|d| {
            d.draft()
                .picks
                .iter()
                .map(|(id, _)| id.clone())
                .collect::<Vec<_>>()
        })
    });

    view! {
      <div class="row">
        <button on:click=move |_| contact_dialog.update(|d| d.open_new())>"Log contact"</button>
        <button on:click=move |_| open_door()>"Door-to-door visit"</button>
      </div>
      <div class="layout">
        <section class="panel">
          <h2>"Outcomes"</h2>
          <ul>
            {move || outcome_tally(&logs.get()).into_iter().map(|b| view! {
              <li><span>{b.label.clone()}</span> " " <b>{b.count}</b></li>
            }).collect_view()}
          </ul>
          <h2>"Methods"</h2>
          <ul>
            {move || method_tally(&logs.get()).into_iter().map(|b| view! {
              <li><span>{b.label.clone()}</span> " " <b>{b.count}</b></li>
            }).collect_view()}
          </ul>
        </section>

        <section class="panel">
          <h2>"Recent contacts"</h2>
          <ul>
            <For
              each={move || logs.get().into_iter().take(RECENT_ROWS).collect::<Vec<_>>()}
              key=|l| l.id.clone()
              children=move |l| view! {
                <li>
                  <div><b>{l.constituent_id.clone()}</b> " " <span class="meta">{l.method.label()}</span></div>
                  <div>{l.outcome.label()}</div>
                  <div class="meta">{format!("{} on {}", l.contacted_by, l.contacted_at.with_timezone(&super::local_offset()).format("%Y-%m-%d %H:%M"))}</div>
                </li>
              }
            />
          </ul>
        </section>
      </div>

      <DialogFrame
        title="Log contact"
        open=Signal::derive(move || contact_dialog.with(Dialog::is_open))
        busy=Signal::derive(move || contact_dialog.with(|d| d.phase() == DialogPhase::Submitting))
        error=Signal::derive(move || contact_dialog.with(|d| d.last_error().map(str::to_string)))
        on_submit=move |_| save_contact()
        on_cancel=move |_| contact_dialog.update(|d| { let _ = d.close(); })
      >
        <input
          placeholder="Constituent ID"
          prop:value=move || contact_dialog.with(|d| d.draft().constituent_id.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            contact_dialog.update(|d| d.edit(|f| f.constituent_id = value));
          }
        />
        <select on:change=move |ev| {
          if let Some(method) = OutreachMethod::parse(&event_target_value(&ev)) {
            contact_dialog.update(|d| d.edit(|f| f.method = method));
          }
        }>
          {OutreachMethod::ALL.into_iter().map(|m| view! {
            <option value=m.as_str() selected=move || contact_dialog.with(|d| d.draft().method == m)>{m.label()}</option>
          }).collect_view()}
        </select>
        <select on:change=move |ev| {
          if let Some(outcome) = OutreachOutcome::parse(&event_target_value(&ev)) {
            contact_dialog.update(|d| d.edit(|f| f.outcome = outcome));
          }
        }>
          {OutreachOutcome::ALL.into_iter().map(|o| view! {
            <option value=o.as_str() selected=move || contact_dialog.with(|d| d.draft().outcome == o)>{o.label()}</option>
          }).collect_view()}
        </select>
        <input
          placeholder="Contacted by"
          prop:value=move || contact_dialog.with(|d| d.draft().contacted_by.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            contact_dialog.update(|d| d.edit(|f| f.contacted_by = value));
          }
        />
        <input
          type="date"
          prop:value=move || contact_dialog.with(|d| d.draft().follow_up.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            contact_dialog.update(|d| d.edit(|f| f.follow_up = value));
          }
        />
        <input
          placeholder="Notes"
          prop:value=move || contact_dialog.with(|d| d.draft().notes.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            contact_dialog.update(|d| d.edit(|f| f.notes = value));
          }
        />
      </DialogFrame>

      <DialogFrame
        title="Door-to-door visit"
        open=Signal::derive(move || door_dialog.with(Dialog::is_open))
        busy=Signal::derive(move || door_dialog.with(|d| d.phase() == DialogPhase::Submitting))
        error=Signal::derive(move || door_dialog.with(|d| d.last_error().map(str::to_string)))
        on_submit=move |_| save_door()
        on_cancel=move |_| door_dialog.update(|d| { let _ = d.close(); })
      >
        <input
          placeholder="Constituent ID"
          prop:value=move || door_dialog.with(|d| d.draft().constituent_id.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            door_dialog.update(|d| d.edit(|f| f.constituent_id = value));
          }
        />
        <input
          placeholder="Canvasser"
          prop:value=move || door_dialog.with(|d| d.draft().canvasser.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            door_dialog.update(|d| d.edit(|f| f.canvasser = value));
          }
        />
        <input
          type="number" min="1" max="5"
          prop:value=move || door_dialog.with(|d| d.draft().confidence.to_string())
          on:input=move |ev| {
            let confidence = event_target_value(&ev).parse().unwrap_or(0);
            door_dialog.update(|d| d.edit(|f| f.confidence = confidence));
          }
        />
        <select on:change=move |ev| {
          if let Some(outcome) = OutreachOutcome::parse(&event_target_value(&ev)) {
            door_dialog.update(|d| d.edit(|f| f.outcome = outcome));
          }
        }>
          {OutreachOutcome::ALL.into_iter().map(|o| view! {
            <option value=o.as_str() selected=move || door_dialog.with(|d| d.draft().outcome == o)>{o.label()}</option>
          }).collect_view()}
        </select>
        <table>
          <tbody>
            {let names = names.clone(); move || {
              let names = names.clone();
              pick_ids.get().into_iter().map(move |candidate_id| {
                let name = names
                  .candidates()
                  .into_iter()
                  .find(|c| c.id == candidate_id)
                  .map(|c| c.name)
                  .unwrap_or_else(|| candidate_id.clone());
                let target = candidate_id.clone();
                view! {
                  <tr>
                    <td>{name}</td>
                    <td>
                      <select on:change=move |ev| {
                        let level = event_target_value(&ev).parse::<SupportLevel>().ok();
                        door_dialog.update(|d| d.edit(|f| f.set_pick(&target, level)));
                      }>
                        <option value="">"Skip"</option>
                        {SupportLevel::ALL.into_iter().map(|level| {
                          let candidate_id = candidate_id.clone();
                          view! {
                            <option
                              value=level.as_str()
                              selected=move || door_dialog.with(|d| {
                                d.draft().picks.iter().any(|(id, picked)| *id == candidate_id && *picked == Some(level))
                              })
                            >
                              {level.label()}
                            </option>
                          }
                        }).collect_view()}
                      </select>
                    </td>
                  </tr>
                }
              }).collect_view()
            }}
          </tbody>
        </table>
      </DialogFrame>
    }
}
