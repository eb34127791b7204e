use crate::components::constituents::ConstituentsTab;
use crate::components::dashboard::DashboardTab;
use crate::components::map::MapTab;
use crate::components::outreach::OutreachTab;
use crate::components::toasts::{ToastHost, Toasts};
use crate::components::transport::TransportTab;
use crate::components::voting::VotingTab;
use crate::components::Session;
use crate::url_state::{read_location, write_location, Tab};
use campaign_api::config::{API_URL_VAR, GROUP_ID_VAR};
use campaign_api::{ApiConfig, ApiError, CampaignApi};
use campaign_core::models::{Group, Party};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

/// Backend settings are baked in at build time; a wasm bundle has no
/// process environment.
fn load_config() -> Result<ApiConfig, ApiError> {
    ApiConfig::from_lookup(|key| match key {
        API_URL_VAR => option_env!("CAMPAIGN_API_URL").map(str::to_string),
        GROUP_ID_VAR => option_env!("CAMPAIGN_GROUP_ID").map(str::to_string),
        _ => None,
    })
}

#[component]
pub fn App() -> impl IntoView {
    match load_config() {
        Ok(config) => view! { <Shell config=config/> }.into_view(),
        Err(err) => {
            logging::error!("{err}");
            view! {
              <section class="panel fatal">
                <h2>"Dashboard is not configured"</h2>
                <pre class="error">{err.to_string()}</pre>
                <p class="meta">"Rebuild with CAMPAIGN_API_URL and CAMPAIGN_GROUP_ID set."</p>
              </section>
            }
            .into_view()
        }
    }
}

#[component]
fn Shell(config: ApiConfig) -> impl IntoView {
    let filter = create_rw_signal(read_location());
    let session = Session {
        api: CampaignApi::new(&config),
        filter,
        toasts: Toasts::new(),
        group: create_rw_signal(None::<Group>),
        parties: create_rw_signal(Vec::<Party>::new()),
        refresh: create_rw_signal(0),
    };
    provide_context(session.clone());

    create_effect(move |_| filter.with(write_location));

    let loader = session.clone();
    spawn_local(async move {
        match loader.api.group().await {
            Ok(group) => loader.group.set(Some(group)),
            Err(err) => loader.report(err),
        }
        match loader.api.parties().await {
            Ok(parties) => loader.parties.set(parties),
            Err(err) => loader.report(err),
        }
    });

    let group = session.group;
    let toasts = session.toasts;
    let current = move || filter.with(|f| f.tab);

    view! {
      <header class="row">
        <h1>{move || group.get().map(|g| g.name).unwrap_or_else(|| "Campaign".into())}</h1>
        <nav class="row">
          {Tab::ALL.into_iter().map(|tab| view! {
            <button
              class=move || if current() == tab { "tab active" } else { "tab" }
              on:click=move |_| filter.update(|f| f.tab = tab)
            >
              {tab.label()}
            </button>
          }).collect_view()}
        </nav>
      </header>

      <main>
        {move || match current() {
          Tab::Dashboard => view! { <DashboardTab/> }.into_view(),
          Tab::Constituents => view! { <ConstituentsTab/> }.into_view(),
          Tab::Outreach => view! { <OutreachTab/> }.into_view(),
          Tab::Transport => view! { <TransportTab/> }.into_view(),
          Tab::Voting => view! { <VotingTab/> }.into_view(),
          Tab::Map => view! { <MapTab/> }.into_view(),
        }}
      </main>

      <ToastHost toasts=toasts/>
    }
}
