use super::{session, submit_dialog, ConstituencyPicker, DialogFrame};
use crate::forms::VoteForm;
use campaign_core::aggregates::{TurnoutBy, TurnoutRow};
use campaign_core::dialog::{Dialog, DialogPhase};
use campaign_core::models::VotingRecord;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

const RECENT_VOTES: usize = 15;

#[component]
pub fn VotingTab() -> impl IntoView {
    let session = session();
    let filter = session.filter;
    let refresh = session.refresh;
    let by = create_rw_signal(TurnoutBy::Constituency);
    let rows = create_rw_signal(Vec::<TurnoutRow>::new());
    let records = create_rw_signal(Vec::<VotingRecord>::new());
    let dialog = create_rw_signal(Dialog::<VoteForm>::default());

    let loader = session.clone();
    create_effect(move |_| {
        refresh.track();
        let constituency = filter.with(|f| f.constituency.clone());
        let grouping = by.get();
        let loader = loader.clone();
        spawn_local(async move {
            let api = &loader.api;
            match api.turnout(constituency.as_deref(), grouping).await {
                Ok(r) => rows.set(r),
                Err(err) => loader.report(err),
            }
            match api.voting_records(constituency.as_deref()).await {
                Ok(mut r) => {
                    r.sort_by(|a, b| b.voted_at.cmp(&a.voted_at));
                    r.truncate(RECENT_VOTES);
                    records.set(r);
                }
                Err(err) => loader.report(err),
            }
        });
    });

    let submitter = session.clone();
    let save = move || {
        submit_dialog(&submitter, dialog, "Vote recorded", |api, form: VoteForm| async move {
            api.record_vote(&form.to_request()?).await.map(|_| ())
        });
    };

    let undoer = session.clone();
    let undo = move |record_id: String| {
        let session = undoer.clone();
        spawn_local(async move {
            match session.api.undo_vote(&record_id).await {
                Ok(()) => {
                    session.toasts.success("Vote removed");
                    session.bump();
                }
                Err(err) => session.report(err),
            }
        });
    };

    view! {
      <div class="row">
        <ConstituencyPicker/>
        <button
          class=move || if by.get() == TurnoutBy::Constituency { "active" } else { "" }
          on:click=move |_| by.set(TurnoutBy::Constituency)
        >"By constituency"</button>
        <button
          class=move || if by.get() == TurnoutBy::BallotBox { "active" } else { "" }
          on:click=move |_| by.set(TurnoutBy::BallotBox)
        >"By ballot box"</button>
        <button on:click=move |_| dialog.update(|d| d.open_new())>"Record vote"</button>
      </div>

      <div class="layout">
        <section class="panel">
          <h2>"Turnout"</h2>
          <table>
            <thead><tr><th></th><th>"Registered"</th><th>"Voted"</th><th>"Turnout"</th></tr></thead>
            <tbody>
              <For
                each=move || rows.get()
                key=|r| (r.key.clone(), r.registered, r.voted)
                children=move |r| view! {
                  <tr>
                    <td>{r.key.clone()}</td>
                    <td>{r.registered}</td>
                    <td>{r.voted}</td>
                    <td>{format!("{:.1}%", r.ratio() * 100.0)}</td>
                  </tr>
                }
              />
            </tbody>
          </table>
        </section>

        <section class="panel">
          <h2>"Latest votes"</h2>
          <ul>
            <For
              each=move || records.get()
              key=|r| r.id.clone()
              children=move |r| {
                let id = r.id.clone();
                let undo = undo.clone();
                view! {
                  <li class="step">
                    <span>{format!("{} at {}", r.constituent_id, r.ballot_box_id)}</span>
                    <span class="meta">{r.voted_at.with_timezone(&super::local_offset()).format("%H:%M").to_string()}</span>
                    <button on:click=move |_| undo(id.clone())>"Undo"</button>
                  </li>
                }
              }
            />
          </ul>
        </section>
      </div>

      <DialogFrame
        title="Record vote"
        open=Signal::derive(move || dialog.with(Dialog::is_open))
        busy=Signal::derive(move || dialog.with(|d| d.phase() == DialogPhase::Submitting))
        error=Signal::derive(move || dialog.with(|d| d.last_error().map(str::to_string)))
        on_submit=move |_| save()
        on_cancel=move |_| dialog.update(|d| { let _ = d.close(); })
      >
        <input
          placeholder="Constituent ID"
          prop:value=move || dialog.with(|d| d.draft().constituent_id.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            dialog.update(|d| d.edit(|f| f.constituent_id = value));
          }
        />
        <input
          placeholder="Ballot box"
          prop:value=move || dialog.with(|d| d.draft().ballot_box_id.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            dialog.update(|d| d.edit(|f| f.ballot_box_id = value));
          }
        />
        <input
          placeholder="Recorded by"
          prop:value=move || dialog.with(|d| d.draft().recorded_by.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            dialog.update(|d| d.edit(|f| f.recorded_by = value));
          }
        />
      </DialogFrame>
    }
}
