//! Source emission
//!
//! Each submodule renders one generated file from the [`RoutePlan`]. Output
//! is plain `format!` templating; all ordering decisions were made when the
//! plan was built.

mod contracts;
mod modules;
mod registry;
mod resolvers;
mod stub;

use std::collections::BTreeMap;
use std::path::Path;

use crate::meta::{RouteMeta, RoutePlan};
use crate::naming::relative_path;

pub use stub::render_stub;

/// First line of every generated file
pub const GENERATED_MARKER: &str = "// @generated by trellis-gen. DO NOT EDIT.";

/// Paths and names the emitted code refers to
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    pub app_root: &'a Path,
    pub gen_root: &'a Path,
    pub app_context_type: &'a str,
}

impl EmitContext<'_> {
    /// `#[path]` value for a file mounted from the gen root
    pub(crate) fn mount_path(&self, target: &Path) -> String {
        relative_path(self.gen_root, target)
    }
}

/// Renders every generated file, keyed by file name within the gen root
pub fn render(plan: &RoutePlan, ctx: &EmitContext<'_>) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    files.insert("mod.rs".to_string(), modules::render_mod(plan, ctx));
    files.insert("contracts.rs".to_string(), contracts::render(plan, ctx));
    files.insert("registry.rs".to_string(), registry::render(plan));
    files.insert("resolvers.rs".to_string(), resolvers::render(plan));
    for route in &plan.routes {
        files.insert(route_module_file(route), modules::render_route_module(route, ctx));
    }
    files
}

pub(crate) fn route_module(route: &RouteMeta) -> String {
    format!("rr_{}", route.key)
}

fn route_module_file(route: &RouteMeta) -> String {
    format!("{}.rs", route_module(route))
}

pub(crate) fn resolve_page_method(route: &RouteMeta) -> String {
    format!("resolve_{}_page", route.key)
}

pub(crate) fn parse_live_state_method(route: &RouteMeta) -> String {
    format!("parse_{}_live_state", route.key)
}

pub(crate) fn resolve_live_method(route: &RouteMeta) -> String {
    format!("resolve_{}_live", route.key)
}

fn header(doc: &str) -> String {
    format!("{GENERATED_MARKER}\n//! {doc}\n\n")
}
