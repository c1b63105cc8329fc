use maud::{html, Markup};

pub fn not_found(path: &str) -> Markup {
    html! { p class="missing" { "nothing at " (path) } }
}
