mod app;
mod components;
mod forms;
mod map_bridge;
mod url_state;

fn main() {
    leptos::mount_to_body(app::App);
}
