use super::{local_offset, session, submit_dialog, ConstituencyPicker, DialogFrame};
use crate::forms::TransportForm;
use campaign_api::hooks::TransportFilter;
use campaign_core::dialog::{Dialog, DialogPhase};
use campaign_core::models::{TransportRequest, TransportStatus};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn TransportTab() -> impl IntoView {
    let session = session();
    let filter = session.filter;
    let refresh = session.refresh;
    let status = create_rw_signal(None::<TransportStatus>);
    let requests = create_rw_signal(Vec::<TransportRequest>::new());
    let dialog = create_rw_signal(Dialog::<TransportForm>::default());

    let loader = session.clone();
    create_effect(move |_| {
        refresh.track();
        let query = TransportFilter {
            status: status.get(),
            constituency: filter.with(|f| f.constituency.clone()),
        };
        let loader = loader.clone();
        spawn_local(async move {
            match loader.api.transport(&query).await {
                Ok(mut rows) => {
                    rows.sort_by(|a, b| a.pickup_time.cmp(&b.pickup_time));
                    requests.set(rows);
                }
                Err(err) => loader.report(err),
            }
        });
    });

    let submitter = session.clone();
    let save = move || {
        let editing = dialog.with_untracked(|d| d.editing().map(str::to_string));
        submit_dialog(&submitter, dialog, "Transport saved", move |api, form: TransportForm| async move {
            let draft = form.to_draft(&local_offset())?;
            match editing {
                Some(id) => api.update_transport(&id, &draft).await.map(|_| ()),
                None => api.create_transport(&draft).await.map(|_| ()),
            }
        });
    };

    view! {
      <div class="row">
        <select on:change=move |ev| status.set(TransportStatus::parse(&event_target_value(&ev)))>
          <option value="">"All statuses"</option>
          {TransportStatus::ALL.into_iter().map(|s| view! {
            <option value=s.as_str()>{s.label()}</option>
          }).collect_view()}
        </select>
        <ConstituencyPicker/>
        <button on:click=move |_| dialog.update(|d| d.open_new())>"New request"</button>
      </div>

      <section class="panel">
        <h2>"Transport requests"</h2>
        <table>
          <thead>
            <tr><th>"Pickup"</th><th>"Constituent"</th><th>"Address"</th><th>"Driver"</th><th>"Status"</th><th></th></tr>
          </thead>
          <tbody>
            <For
              each=move || requests.get()
              key=|r| (r.id.clone(), r.status.as_str(), r.driver_name.clone())
              children=move |r| {
                let class = match r.status {
                  TransportStatus::Completed => "ok",
                  TransportStatus::Cancelled => "warn",
                  _ => "",
                };
                let form = TransportForm::editing(&r, &local_offset());
                let id = r.id.clone();
                view! {
                  <tr>
                    <td>{r.pickup_time.with_timezone(&local_offset()).format("%Y-%m-%d %H:%M").to_string()}</td>
                    <td>{r.constituent_id.clone()}</td>
                    <td>{r.pickup_address.clone()}</td>
                    <td>{r.driver_name.clone().unwrap_or_else(|| "-".into())}</td>
                    <td><b class=class>{r.status.label()}</b></td>
                    <td>
                      <button on:click=move |_| dialog.update(|d| d.open_edit(id.clone(), form.clone()))>"Edit"</button>
                    </td>
                  </tr>
                }
              }
            />
          </tbody>
        </table>
      </section>

      <DialogFrame
        title="Transport request"
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
          placeholder="Pickup address"
          prop:value=move || dialog.with(|d| d.draft().pickup_address.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            dialog.update(|d| d.edit(|f| f.pickup_address = value));
          }
        />
        <input
          type="datetime-local"
          prop:value=move || dialog.with(|d| d.draft().pickup_time.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            dialog.update(|d| d.edit(|f| f.pickup_time = value));
          }
        />
        <select on:change=move |ev| {
          if let Some(status) = TransportStatus::parse(&event_target_value(&ev)) {
            dialog.update(|d| d.edit(|f| f.status = status));
          }
        }>
          {TransportStatus::ALL.into_iter().map(|s| view! {
            <option value=s.as_str() selected=move || dialog.with(|d| d.draft().status == s)>{s.label()}</option>
          }).collect_view()}
        </select>
        <input
          placeholder="Driver"
          prop:value=move || dialog.with(|d| d.draft().driver_name.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            dialog.update(|d| d.edit(|f| f.driver_name = value));
          }
        />
        <input
          placeholder="Notes"
          prop:value=move || dialog.with(|d| d.draft().notes.clone())
          on:input=move |ev| {
            let value = event_target_value(&ev);
            dialog.update(|d| d.edit(|f| f.notes = value));
          }
        />
      </DialogFrame>
    }
}
