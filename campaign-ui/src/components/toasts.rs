use campaign_core::notify::Toast;
use leptos::*;
use std::time::Duration;

const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<(u64, Toast)>>,
    next: StoredValue<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: create_rw_signal(Vec::new()),
            next: store_value(0),
        }
    }

    pub fn push(&self, toast: Toast) {
        let id = self.next.get_value();
        self.next.set_value(id + 1);
        let items = self.items;
        items.update(|v| v.push((id, toast)));
        set_timeout(
            move || items.update(|v| v.retain(|(i, _)| *i != id)),
            TOAST_TTL,
        );
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Toast::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        let toast = Toast::error(message);
        logging::warn!("{}", toast.message);
        self.push(toast);
    }
}

#[component]
pub fn ToastHost(toasts: Toasts) -> impl IntoView {
    view! {
      <div class="toasts">
        <For
          each=move || toasts.items.get()
          key=|(id, _)| *id
          children=move |(_, toast)| view! {
            <div class=toast.css_class()>{toast.message.clone()}</div>
          }
        />
      </div>
    }
}
