//! Fully resolved generation model
//!
//! Discovery and contract checks are folded into a [`RoutePlan`] before any
//! text is emitted. Every list in the plan has a fixed order, so emission is
//! a pure function of the plan.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use trellis_router::{live_pattern, RouteSegment, Specificity};

use crate::contract::{self, NotFoundArg, CONTRACT_FILE, RESOLVER_FILE};
use crate::discovery::{Manifest, RouteDefinition, SharedComponent};
use crate::error::{GenError, Result};
use crate::naming::{field_ident, resolver_rel_path, route_key, route_name};

/// One dynamic segment of a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMeta {
    /// Segment name as written: `postId`
    pub name: String,
    /// Struct field: `post_id`
    pub field: String,
}

impl ParamMeta {
    pub fn is_slug(&self) -> bool {
        self.name == "slug"
    }
}

/// Patch target of a live-capable route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveMeta {
    pub selector_id: String,
    pub bad_request_message: String,
}

/// A layout in a route's chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRef {
    pub id: String,
    pub key: String,
    pub module: String,
}

/// A page route after contract resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    pub id: String,
    pub segments: Vec<RouteSegment>,
    /// `notes_param_slug`
    pub key: String,
    /// `NotesParamSlug`
    pub name: String,
    /// `NotesParamSlugParams`
    pub params_type: String,
    pub params: Vec<ParamMeta>,
    pub pattern: String,
    pub live_pattern: String,
    /// Page template module
    pub module: String,
    pub source: PathBuf,
    /// `notes/param_slug`
    pub resolver_rel: String,
    pub contract_path: PathBuf,
    pub resolver_path: PathBuf,
    pub page_view_type: String,
    pub live: Option<LiveMeta>,
    /// Root first
    pub layouts: Vec<LayoutRef>,
}

impl RouteMeta {
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }
}

/// A not-found template and the path prefix it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundMeta {
    pub id: String,
    pub pattern: String,
    pub module: String,
    pub source: PathBuf,
    pub arg: NotFoundArg,
}

/// Layout template mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMeta {
    pub id: String,
    pub module: String,
    pub source: PathBuf,
}

/// Generated wrapper binding one route's view type to one layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutWrapperMeta {
    pub name: String,
    pub route_key: String,
    pub layout_module: String,
}

/// Everything the emitter needs
#[derive(Debug, Clone, Default)]
pub struct RoutePlan {
    /// Most specific first
    pub routes: Vec<RouteMeta>,
    /// Sorted by route id
    pub layouts: Vec<LayoutMeta>,
    /// Most specific first
    pub not_founds: Vec<NotFoundMeta>,
    pub components: Vec<SharedComponent>,
    /// Keyed by wrapper name
    pub wrappers: BTreeMap<String, LayoutWrapperMeta>,
}

impl RoutePlan {
    /// Routes in route id order, used for declarations
    pub fn routes_by_id(&self) -> Vec<&RouteMeta> {
        let mut routes: Vec<&RouteMeta> = self.routes.iter().collect();
        routes.sort_by(|a, b| a.id.cmp(&b.id));
        routes
    }
}

/// Inputs to plan resolution that do not come from discovery
#[derive(Debug, Clone)]
pub struct PlanSettings<'a> {
    pub resolver_root: &'a Path,
    pub view_model_namespace: &'a str,
    pub live_bad_request_message: &'a str,
}

/// Resolves contracts and checks templates for every discovered route
pub fn build_plan(manifest: &Manifest, settings: &PlanSettings<'_>) -> Result<RoutePlan> {
    let mut plan = RoutePlan {
        components: manifest.components.clone(),
        ..RoutePlan::default()
    };

    for layout in manifest.layouts.values() {
        contract::validate_layout(&layout.source)?;
        plan.layouts.push(LayoutMeta {
            id: layout.id.clone(),
            module: layout.module.clone(),
            source: layout.source.clone(),
        });
    }

    let mut not_founds: Vec<&RouteDefinition> = manifest.not_founds.values().collect();
    not_founds.sort_by(|a, b| {
        Specificity::of(&a.segments)
            .cmp(&Specificity::of(&b.segments))
            .then_with(|| a.id.cmp(&b.id))
    });
    for not_found in not_founds {
        let arg = contract::validate_not_found(&not_found.source)?;
        plan.not_founds.push(NotFoundMeta {
            id: not_found.id.clone(),
            pattern: not_found.pattern(),
            module: not_found.module.clone(),
            source: not_found.source.clone(),
            arg,
        });
    }

    let mut names: BTreeMap<String, String> = BTreeMap::new();
    for page in &manifest.pages {
        let route = resolve_route(manifest, page, settings)?;
        claim_route_name(&mut names, &route)?;
        for layout in &route.layouts {
            register_wrapper(&mut plan.wrappers, &route, layout)?;
        }
        plan.routes.push(route);
    }

    Ok(plan)
}

fn resolve_route(manifest: &Manifest, page: &RouteDefinition, settings: &PlanSettings<'_>) -> Result<RouteMeta> {
    let pattern = page.pattern();
    let name = route_name(&page.segments);
    let resolver_rel = resolver_rel_path(&page.segments);
    let resolver_dir = resolver_rel
        .split('/')
        .fold(settings.resolver_root.to_path_buf(), |dir, part| dir.join(part));
    let contract_path = resolver_dir.join(CONTRACT_FILE);

    contract::validate_page(&page.source)?;
    let resolved = contract::resolve_contract(&pattern, &contract_path, settings.view_model_namespace)?;

    let live = if resolved.has_live_state {
        let source = contract::read_source(&page.source)?;
        let selector_id =
            contract::find_live_selector(&source).ok_or_else(|| GenError::MissingLiveSelector {
                route: pattern.clone(),
                path: page.source.clone(),
            })?;
        Some(LiveMeta {
            selector_id,
            bad_request_message: settings.live_bad_request_message.to_string(),
        })
    } else {
        None
    };

    let layouts = manifest
        .layout_chain(page)
        .into_iter()
        .map(|layout| LayoutRef {
            id: layout.id.clone(),
            key: layout.key(),
            module: layout.module.clone(),
        })
        .collect();

    Ok(RouteMeta {
        id: page.id.clone(),
        key: route_key(&page.segments),
        params_type: format!("{}Params", name),
        params: route_params(&pattern, &page.segments)?,
        live_pattern: live_pattern(&page.segments),
        module: page.module.clone(),
        source: page.source.clone(),
        resolver_path: resolver_dir.join(RESOLVER_FILE),
        contract_path,
        resolver_rel,
        page_view_type: resolved.page_view,
        segments: page.segments.clone(),
        pattern,
        name,
        live,
        layouts,
    })
}

fn route_params(pattern: &str, segments: &[RouteSegment]) -> Result<Vec<ParamMeta>> {
    let mut params: Vec<ParamMeta> = Vec::new();
    for segment in segments {
        let RouteSegment::Dynamic(name) = segment else {
            continue;
        };
        let field = field_ident(name);
        if params.iter().any(|param| param.name == *name || param.field == field) {
            return Err(GenError::DuplicateParam {
                route: pattern.to_string(),
                name: name.clone(),
            });
        }
        params.push(ParamMeta {
            name: name.clone(),
            field,
        });
    }
    Ok(params)
}

/// Generated type names must map to exactly one route
fn claim_route_name(names: &mut BTreeMap<String, String>, route: &RouteMeta) -> Result<()> {
    match names.get(&route.name) {
        Some(first) => Err(GenError::ModuleConflict {
            module: route.params_type.clone(),
            first: first.clone(),
            second: route.pattern.clone(),
        }),
        None => {
            names.insert(route.name.clone(), route.pattern.clone());
            Ok(())
        }
    }
}

/// Wrapper names must map to exactly one (route, layout) pair
fn register_wrapper(
    wrappers: &mut BTreeMap<String, LayoutWrapperMeta>,
    route: &RouteMeta,
    layout: &LayoutRef,
) -> Result<()> {
    let wrapper = LayoutWrapperMeta {
        name: wrapper_name(&route.key, &layout.key),
        route_key: route.key.clone(),
        layout_module: layout.module.clone(),
    };
    match wrappers.get(&wrapper.name) {
        Some(existing) if *existing != wrapper => Err(GenError::LayoutWrapperConflict {
            name: wrapper.name,
            first: format!("{} in {}", existing.layout_module, existing.route_key),
            second: format!("{} in {}", wrapper.layout_module, wrapper.route_key),
        }),
        Some(_) => Ok(()),
        None => {
            wrappers.insert(wrapper.name.clone(), wrapper);
            Ok(())
        }
    }
}

pub fn wrapper_name(route_key: &str, layout_key: &str) -> String {
    format!("wrap_{}_with_{}_layout", route_key, layout_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_router::parse_route_dir;

    #[test]
    fn test_params_use_rust_field_names() {
        let segments = parse_route_dir("users/[userId]/posts/[type]").unwrap();
        let params = route_params("/users/[userId]/posts/[type]", &segments).unwrap();
        let fields: Vec<&str> = params.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, vec!["user_id", "r#type"]);
    }

    #[test]
    fn test_path_keyword_params_are_not_raw() {
        let segments = parse_route_dir("x/[self]/[Super]").unwrap();
        let params = route_params("/x/[self]/[Super]", &segments).unwrap();
        let fields: Vec<&str> = params.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, vec!["self_", "super_"]);
    }

    #[test]
    fn test_route_name_conflict() {
        let route = |dir: &str| {
            let segments = parse_route_dir(dir).unwrap();
            let name = route_name(&segments);
            RouteMeta {
                id: dir.to_string(),
                key: route_key(&segments),
                params_type: format!("{}Params", name),
                pattern: format!("/{}", dir),
                name,
                segments,
                params: Vec::new(),
                live_pattern: String::new(),
                module: String::new(),
                source: PathBuf::new(),
                resolver_rel: String::new(),
                contract_path: PathBuf::new(),
                resolver_path: PathBuf::new(),
                page_view_type: String::new(),
                live: None,
                layouts: Vec::new(),
            }
        };

        let mut names = BTreeMap::new();
        claim_route_name(&mut names, &route("aB")).unwrap();
        let err = claim_route_name(&mut names, &route("a-b")).unwrap_err();
        match err {
            GenError::ModuleConflict { module, first, second } => {
                assert_eq!(module, "ABParams");
                assert_eq!(first, "/aB");
                assert_eq!(second, "/a-b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_param() {
        let segments = parse_route_dir("a/[slug]/b/[slug]").unwrap();
        let err = route_params("/a/[slug]/b/[slug]", &segments).unwrap_err();
        assert!(matches!(err, GenError::DuplicateParam { name, .. } if name == "slug"));
    }

    #[test]
    fn test_fields_colliding_after_case_conversion() {
        let segments = parse_route_dir("a/[postId]/[post_id]").unwrap();
        assert!(route_params("/a/[postId]/[post_id]", &segments).is_err());
    }

    #[test]
    fn test_wrapper_name_conflict() {
        let mut wrappers = BTreeMap::new();
        let route = |key: &str| RouteMeta {
            id: String::new(),
            segments: Vec::new(),
            key: key.to_string(),
            name: String::new(),
            params_type: String::new(),
            params: Vec::new(),
            pattern: String::new(),
            live_pattern: String::new(),
            module: String::new(),
            source: PathBuf::new(),
            resolver_rel: String::new(),
            contract_path: PathBuf::new(),
            resolver_path: PathBuf::new(),
            page_view_type: String::new(),
            live: None,
            layouts: Vec::new(),
        };
        let layout = |key: &str| LayoutRef {
            id: String::new(),
            key: key.to_string(),
            module: format!("r_layout_{}", key),
        };

        register_wrapper(&mut wrappers, &route("x_with_y"), &layout("z")).unwrap();
        register_wrapper(&mut wrappers, &route("x_with_y"), &layout("z")).unwrap();
        let err = register_wrapper(&mut wrappers, &route("x"), &layout("y_with_z")).unwrap_err();
        assert!(matches!(err, GenError::LayoutWrapperConflict { .. }));
    }
}
