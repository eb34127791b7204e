use campaign_core::pagination::PageCursor;
use leptos::*;

#[component]
pub fn Pager(
    #[prop(into)] cursor: Signal<PageCursor>,
    #[prop(into)] shown: Signal<usize>,
    #[prop(into)] on_page: Callback<usize>,
) -> impl IntoView {
    view! {
      <div class="row pager">
        <button
          disabled=move || !cursor.get().has_prev()
          on:click=move |_| {
            if let Some(offset) = cursor.get_untracked().prev_offset() {
              on_page.call(offset);
            }
          }
        >
          "Previous"
        </button>
        <span class="meta">
          {move || {
            let c = cursor.get();
            format!("Page {} of {} ({})", c.page_number(), c.page_count(), c.range_label(shown.get()))
          }}
        </span>
        <button
          disabled=move || !cursor.get().has_next()
          on:click=move |_| {
            if let Some(offset) = cursor.get_untracked().next_offset() {
              on_page.call(offset);
            }
          }
        >
          "Next"
        </button>
      </div>
    }
}
