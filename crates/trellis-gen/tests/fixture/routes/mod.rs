// @generated by trellis-gen. DO NOT EDIT.
//! Route registry for the templates under `../app`.

pub mod contracts;
pub mod registry;
pub mod resolvers;

#[path = "../app/layout.rs"]
pub mod r_layout_root;
#[path = "../app/not_found.rs"]
pub mod r_not_found_root;
#[path = "../app/notes/[slug]/page.rs"]
pub mod r_page_notes_param_slug;
#[path = "../app/page.rs"]
pub mod r_page_root;

pub mod rr_root;
pub mod rr_notes_param_slug;

pub use contracts::*;
pub use registry::{handlers, not_found_page};
pub use resolvers::GeneratedResolvers;
