//! Module documentation generation for API clients.
//!
//! [`ModuleDocBuilder`] produces the module-level documentation of a
//! generated API module: an introduction, the authentication model, the
//! declared actions grouped by verb and a usage example.

use std::collections::BTreeMap;

use proc_macro2::TokenStream;
use quote::quote;
use restgen_define::{ActionType, ApiModel, Resource, Secured};

use crate::naming::client_type_name;
use crate::options::OutputVersion;

/// Builds module-level documentation for a generated API client.
///
/// ## Examples
///
/// ```
/// use restgen_define::ApiModel;
/// use restgen_gen::codegen::ModuleDocBuilder;
/// use restgen_gen::options::OutputVersion;
///
/// let api = ApiModel::new("Foo", "https://api.example.com");
/// let sections = ModuleDocBuilder::new(&api, OutputVersion::V1).sections();
/// assert!(sections[0].contains("Foo"));
/// ```
pub struct ModuleDocBuilder<'a> {
    api: &'a ApiModel,
    output_version: OutputVersion,
}

impl<'a> ModuleDocBuilder<'a> {
    pub fn new(api: &'a ApiModel, output_version: OutputVersion) -> Self {
        Self {
            api,
            output_version,
        }
    }

    /// Documentation sections, each rendered as one `#![doc]` attribute.
    pub fn sections(&self) -> Vec<String> {
        vec![
            self.intro_paragraph(),
            self.auth_section(),
            self.features_section(),
            self.example_section(),
        ]
    }

    /// Builds the documentation as inner doc attributes.
    pub fn build(&self) -> TokenStream {
        render_module_docs(&self.sections())
    }

    fn intro_paragraph(&self) -> String {
        let version = self
            .api
            .version
            .as_deref()
            .map(|v| format!(" (version {v})"))
            .unwrap_or_default();
        let shape = if self.output_version.supports_envelope() {
            "Methods return the decoded body wrapped with the response headers and raw response."
        } else {
            "Methods return the decoded body."
        };

        format!(
            " Generated client for the {}{} API.\n\n Default base URI: `{}`. {}",
            self.api.title, version, self.api.base_uri, shape
        )
    }

    fn auth_section(&self) -> String {
        let schemes = &self.api.security_schemes;
        let desc = if self.api.is_oauth2_secured(schemes) {
            "All actions are OAuth 2.0 secured and take an `authorization_token` argument."
        } else if any_resource(&self.api.resources, &|r: &Resource| {
            r.is_oauth2_secured(schemes)
        }) {
            "Actions on OAuth 2.0 secured resources take an `authorization_token` argument."
        } else {
            "No authentication required."
        };
        format!(" ## Authentication\n\n {desc}")
    }

    /// Groups actions by verb as `(path, description)` pairs.
    fn categorize_actions(&self) -> BTreeMap<String, Vec<(String, String)>> {
        let mut categories: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
        let mut stack: Vec<(String, &Resource)> = self
            .api
            .resources
            .iter()
            .rev()
            .map(|r| (r.relative_uri.clone(), r))
            .collect();

        while let Some((path, resource)) = stack.pop() {
            for action in &resource.actions {
                categories.entry(action.action_type.to_string()).or_default().push((
                    path.clone(),
                    action.description.clone().unwrap_or_default(),
                ));
            }
            for child in resource.resources.iter().rev() {
                stack.push((format!("{path}{}", child.relative_uri), child));
            }
        }
        categories
    }

    fn features_section(&self) -> String {
        let categories = self.categorize_actions();
        if categories.is_empty() {
            return " ## Features\n\n No actions defined.".to_string();
        }

        let mut lines = vec![" ## Features".to_string(), String::new()];
        for (verb, actions) in &categories {
            let note = if verb == &ActionType::Patch.to_string() {
                " (not supported, no methods generated)"
            } else {
                ""
            };
            lines.push(format!(" **{verb}**{note}:"));
            for (path, desc) in actions {
                if desc.is_empty() {
                    lines.push(format!(" - `{path}`"));
                } else {
                    lines.push(format!(" - `{path}` - {}", first_line(desc)));
                }
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }

    fn example_section(&self) -> String {
        format!(
            r#" ## Example

 ```ignore
 let client = {}::new({}::BASE_URI);
 ```"#,
            client_type_name(&self.api.title),
            client_type_name(&self.api.title)
        )
    }
}

/// Renders doc sections as inner doc attributes separated by blank lines.
pub fn render_module_docs(sections: &[String]) -> TokenStream {
    let docs = sections.iter().enumerate().map(|(idx, section)| {
        if idx == 0 {
            quote! { #![doc = #section] }
        } else {
            quote! {
                //!
                #![doc = #section]
            }
        }
    });
    quote! { #(#docs)* }
}

fn any_resource(resources: &[Resource], predicate: &dyn Fn(&Resource) -> bool) -> bool {
    resources
        .iter()
        .any(|r| predicate(r) || any_resource(&r.resources, predicate))
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim()
}
