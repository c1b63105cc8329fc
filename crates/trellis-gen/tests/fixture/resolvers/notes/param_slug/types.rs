use serde::{Deserialize, Serialize};

pub type PageView = crate::view_models::NoteView;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LiveState {
    pub highlight: String,
}
