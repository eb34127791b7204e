use super::{session, ConstituencyPicker};
use crate::map_bridge::{show_layer, LayerKind};
use hex_registry::style::{party_fill_expression, party_palette, support_fill_expression};
use hex_registry::HexCell;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn MapTab() -> impl IntoView {
    let session = session();
    let filter = session.filter;
    let refresh = session.refresh;
    let parties = session.parties;
    let kind = create_rw_signal(LayerKind::Support);
    let cells = create_rw_signal(Vec::<HexCell>::new());
    let bridge_error = create_rw_signal(None::<String>);

    let loader = session.clone();
    create_effect(move |_| {
        refresh.track();
        let layer = kind.get();
        let (constituency, candidate) = filter.with(|f| (f.constituency.clone(), f.candidate.clone()));
        let loader = loader.clone();
        spawn_local(async move {
            let api = &loader.api;
            let loaded = match layer {
                LayerKind::Support => api
                    .support_hexmap(candidate.as_deref(), constituency.as_deref())
                    .await
                    .map(|map| (map, support_fill_expression())),
                LayerKind::Parties => api.party_hexmap(constituency.as_deref()).await.map(|map| {
                    let palette = party_palette(&parties.get_untracked());
                    (map, party_fill_expression(&palette))
                }),
            };
            match loaded {
                Ok((map, fill)) => {
                    cells.set(map.cells());
                    bridge_error.set(show_layer(layer, &map, &fill).err());
                }
                Err(err) => loader.report(err),
            }
        });
    });

    let picker = session.clone();
    let highlighted = move || filter.with(|f| f.party.clone());

    view! {
      <div class="row">
        <button
          class=move || if kind.get() == LayerKind::Support { "active" } else { "" }
          on:click=move |_| kind.set(LayerKind::Support)
        >"Support"</button>
        <button
          class=move || if kind.get() == LayerKind::Parties { "active" } else { "" }
          on:click=move |_| kind.set(LayerKind::Parties)
        >"Parties"</button>
        <ConstituencyPicker/>
        <Show when=move || kind.get() == LayerKind::Support fallback=|| ()>
          <select on:change=move |ev| {
            let value = event_target_value(&ev);
            filter.update(|f| f.candidate = (!value.is_empty()).then_some(value));
          }>
            <option value="">"All candidates"</option>
            {
              let picker = picker.clone();
              move || picker.candidates().into_iter().map(|c| {
                let id = c.id.clone();
                view! {
                  <option value=c.id.clone() selected=move || filter.with(|f| f.candidate.as_deref() == Some(id.as_str()))>
                    {c.name.clone()}
                  </option>
                }
              }).collect_view()
            }
          </select>
        </Show>
        <Show when=move || kind.get() == LayerKind::Parties fallback=|| ()>
          <select on:change=move |ev| {
            let value = event_target_value(&ev);
            filter.update(|f| f.party = (!value.is_empty()).then_some(value));
          }>
            <option value="">"Highlight party"</option>
            {move || parties.get().into_iter().map(|p| {
              let id = p.id.clone();
              view! {
                <option value=p.id.clone() selected=move || filter.with(|f| f.party.as_deref() == Some(id.as_str()))>
                  {p.name.clone()}
                </option>
              }
            }).collect_view()}
          </select>
        </Show>
      </div>

      <Show when=move || bridge_error.get().is_some() fallback=|| ()>
        <p class="meta">{move || format!("Map unavailable: {}", bridge_error.get().unwrap_or_default())}</p>
      </Show>

      <div id="hex-map"></div>

      <section class="panel">
        <h2>"Hex cells"</h2>
        <table>
          <thead><tr><th>"Cell"</th><th>"Voters"</th><th>"Leading"</th></tr></thead>
          <tbody>
            {move || {
              let layer = kind.get();
              let focus = highlighted();
              cells.get().into_iter().map(|cell| {
                let (leader, is_focus) = match layer {
                  LayerKind::Support => (
                    cell.dominant_level().map(|l| l.support_level.label().to_string()),
                    false,
                  ),
                  LayerKind::Parties => {
                    let top = cell.dominant_party();
                    (
                      top.map(|p| p.party_name.clone()),
                      top.is_some_and(|p| focus.as_deref() == Some(p.party_id.as_str())),
                    )
                  }
                };
                view! {
                  <tr class=if is_focus { "selected" } else { "" }>
                    <td>{cell.hex_id.clone()}</td>
                    <td>{cell.voter_count}</td>
                    <td>{leader.unwrap_or_else(|| "-".into())}</td>
                  </tr>
                }
              }).collect_view()
            }}
          </tbody>
        </table>
      </section>
    }
}
