use maud::{html, Markup};

use crate::view_models::HomeView;

pub fn page(view: &HomeView) -> Markup {
    html! {
        h1 { (view.title) }
        ul {
            @for slug in &view.slugs {
                li { a href={ "/notes/" (slug) } { (slug) } }
            }
        }
    }
}
