use maud::{html, Markup};

pub fn layout(view: &impl trellis::LayoutView, child: Markup) -> Markup {
    html! {
        html {
            head { title { (view.title()) } }
            body { (child) }
        }
    }
}
