//! View models rendered by the fixture templates

use trellis::LayoutView;

pub struct HomeView {
    pub title: String,
    pub slugs: Vec<String>,
}

impl LayoutView for HomeView {
    fn title(&self) -> String {
        self.title.clone()
    }
}

pub struct NoteView {
    pub title: String,
    pub body: String,
    pub highlight: Option<String>,
}

impl LayoutView for NoteView {
    fn title(&self) -> String {
        format!("{} | Notes", self.title)
    }
}
