use super::{local_offset, session, today, ConstituencyPicker};
use campaign_api::hooks::{ConstituentFilter, OutreachFilter};
use campaign_core::aggregates::{
    age_buckets, gender_split, party_support_score, top_level, AgeBucket, BucketCount, GenderSplit,
};
use campaign_core::heatmap::{contact_heatmap, ContactHeatmap, HEATMAP_DAYS};
use campaign_core::models::PartySupport;
use chrono::Duration;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

/// Upper bound on voters pulled for the demographic charts.
const DEMOGRAPHIC_SAMPLE: usize = 5_000;

/// "n of total" notice when the charts only cover part of the voters.
fn sample_note(shown: usize, total: usize) -> Option<String> {
    (shown < total).then(|| format!("Age and gender charts cover {shown} of {total} voters"))
}

fn bar_width(count: usize, max: usize) -> String {
    let pct = if max == 0 { 0.0 } else { count as f64 * 100.0 / max as f64 };
    format!("width:{pct:.1}%")
}

#[component]
pub fn DashboardTab() -> impl IntoView {
    let session = session();
    let filter = session.filter;
    let refresh = session.refresh;
    let ages = create_rw_signal(Vec::<BucketCount<AgeBucket>>::new());
    let genders = create_rw_signal(GenderSplit::default());
    let sampled = create_rw_signal(None::<String>);
    let heatmap = create_rw_signal(None::<ContactHeatmap>);
    let party_support = create_rw_signal(Vec::<PartySupport>::new());

    let loader = session.clone();
    create_effect(move |_| {
        refresh.track();
        let constituency = filter.with(|f| f.constituency.clone());
        let loader = loader.clone();
        spawn_local(async move {
            let api = &loader.api;
            let today = today();
            let voters = ConstituentFilter {
                constituency: constituency.clone(),
                search: None,
                offset: 0,
                limit: DEMOGRAPHIC_SAMPLE,
            };
            match api.constituents(&voters).await {
                Ok(page) => {
                    ages.set(age_buckets(&page.items, today));
                    genders.set(gender_split(&page.items));
                    sampled.set(sample_note(page.items.len(), page.total));
                }
                Err(err) => loader.report(err),
            }

            let recent = OutreachFilter {
                constituent_id: None,
                since: Some(today - Duration::days(HEATMAP_DAYS as i64 - 1)),
            };
            match api.outreach(&recent).await {
                Ok(logs) => heatmap.set(Some(contact_heatmap(&logs, today, &local_offset()))),
                Err(err) => loader.report(err),
            }

            match api.party_support(constituency.as_deref()).await {
                Ok(rows) => party_support.set(rows),
                Err(err) => loader.report(err),
            }
        });
    });

    view! {
      <div class="row"><ConstituencyPicker/></div>
      <Show when=move || sampled.get().is_some() fallback=|| ()>
        <p class="meta">
          {move || sampled.get().unwrap_or_default()}
        </p>
      </Show>
      <div class="layout">
        <section class="panel">
          <h2>"Age"</h2>
          <ul class="bars">
            {move || {
              let rows = ages.get();
              let max = rows.iter().map(|b| b.count).max().unwrap_or(0);
              rows.into_iter().map(|b| view! {
                <li>
                  <span class="label">{b.label.clone()}</span>
                  <span class="bar" style=bar_width(b.count, max)></span>
                  <span class="meta">{b.count}</span>
                </li>
              }).collect_view()
            }}
          </ul>

          <h2>"Gender"</h2>
          {move || {
            let g = genders.get();
            view! {
              <div class="row">
                <span>{format!("Female {}", g.female)}</span>
                <span>{format!("Male {}", g.male)}</span>
                <span class="meta">{format!("Unknown {}", g.unknown)}</span>
                <span class="meta">{format!("of {}", g.total())}</span>
              </div>
            }
          }}
        </section>

        <section class="panel">
          <h2>"Contacts, last 30 days"</h2>
          {move || heatmap.get().map(|h| {
            let cells = h.days.iter().map(|d| {
              let title = format!("{}: {}", d.date.format("%b %d"), d.count);
              let style = format!("opacity:{:.2}", 0.15 + 0.85 * h.intensity(d.count));
              view! { <span class="heat-cell" title=title style=style></span> }
            }).collect_view();
            let trend = if h.trend_pct >= 0 { format!("+{}%", h.trend_pct) } else { format!("{}%", h.trend_pct) };
            view! {
              <div class="heatmap">{cells}</div>
              <div class="row meta">
                <span>{format!("Total {}", h.total)}</span>
                <span>{format!("Avg/day {}", h.average)}</span>
                <span>{format!("Streak {} days", h.streak)}</span>
                <span>{format!("Trend {trend}")}</span>
              </div>
            }
          })}
        </section>

        <section class="panel">
          <h2>"Party support"</h2>
          <table>
            <thead><tr><th>"Party"</th><th>"Score"</th><th>"Top level"</th></tr></thead>
            <tbody>
              <For
                each=move || party_support.get()
                key=|p| p.party_id.clone()
                children=move |p| {
                  let score = party_support_score(&p.levels);
                  let top = top_level(&p.levels)
                    .filter(|l| l.voter_count > 0)
                    .map(|l| format!("{} ({})", l.support_level.label(), l.voter_count))
                    .unwrap_or_else(|| "-".into());
                  view! {
                    <tr>
                      <td>{p.party_name.clone()}</td>
                      <td>{format!("{score:+.2}")}</td>
                      <td>{top}</td>
                    </tr>
                  }
                }
              />
            </tbody>
          </table>
        </section>
      </div>
    }
}
