//! loading a single `.tfcomponents.hcl` file into a [Config]
//!
//! Loading reports problems as [Diagnostics] instead of failing early. Only two problems are fatal and return no
//! [Config] at all: a file that cannot be read and a filename without the [CONFIG_FILE_SUFFIX]. Anything found
//! afterwards, including syntax errors, still produces a (possibly incomplete) [Config] so that callers can keep
//! collecting diagnostics from other files.
use crate::component::{Component, ComponentGroup};
use crate::declarations::{Decoder, Local, Output, Variable};
use crate::diagnostics::{Diagnostic, Diagnostics, Severity, SourceFile, SourceRange};
use crate::schema::{BlockHeaderSchema, BodySchema};
use crate::util::normalize_filename;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Every components configuration file must end with this
pub const CONFIG_FILE_SUFFIX: &str = ".tfcomponents.hcl";

/// The decoded contents of a single `.tfcomponents.hcl` file
///
/// Declarations have been through simple static validation but nothing has been evaluated yet. Every map is keyed
/// by the `name` of its values and keeps declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Cleaned path using forward slashes
    pub filename: String,

    pub components: IndexMap<String, Component>,
    pub groups: IndexMap<String, ComponentGroup>,

    pub input_variables: IndexMap<String, Variable>,
    pub local_values: IndexMap<String, Local>,
    pub output_values: IndexMap<String, Output>,
}

impl Config {
    fn new(filename: String) -> Self {
        Self {
            filename,
            components: Default::default(),
            groups: Default::default(),
            input_variables: Default::default(),
            local_values: Default::default(),
            output_values: Default::default(),
        }
    }

    /// Find a previous component or component group using `name`
    ///
    /// Components and component groups share one namespace.
    fn call_declared(&self, name: &str) -> Option<(&'static str, &SourceRange)> {
        if let Some(component) = self.components.get(name) {
            return Some(("component", &component.decl_range));
        }

        self.groups
            .get(name)
            .map(|group| ("component group", &group.decl_range))
    }
}

/// Top level block types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootBlock {
    Component,
    ComponentGroup,
    Variable,
    Locals,
    Output,
}

static ROOT_SCHEMA: BodySchema<RootBlock> = BodySchema {
    attributes: &[],
    blocks: &[
        BlockHeaderSchema {
            kind: RootBlock::Component,
            type_name: "component",
            label_names: &["name"],
        },
        BlockHeaderSchema {
            kind: RootBlock::ComponentGroup,
            type_name: "component_group",
            label_names: &["name"],
        },
        BlockHeaderSchema {
            kind: RootBlock::Variable,
            type_name: "variable",
            label_names: &["name"],
        },
        BlockHeaderSchema {
            kind: RootBlock::Locals,
            type_name: "locals",
            label_names: &[],
        },
        BlockHeaderSchema {
            kind: RootBlock::Output,
            type_name: "output",
            label_names: &["name"],
        },
    ],
};

/// Read and decode a configuration file
pub fn load_config_file(path: impl AsRef<Path>) -> (Option<Config>, Diagnostics) {
    let path = path.as_ref();
    let filename = path.to_string_lossy();

    let src = match std::fs::read(path) {
        Ok(src) => src,
        Err(err) => {
            tracing::debug!(%filename, %err, "unable to read configuration file");
            let diagnostics: Diagnostics = Diagnostic::sourceless(
                Severity::Error,
                "Can't open configuration file",
                format!("Error while loading {filename}: {err}."),
            )
            .into();
            return (None, diagnostics);
        }
    };

    load_config(&filename, &src)
}

/// Decode configuration from `src`, which was read from `filename`
pub fn load_config(filename: &str, src: &[u8]) -> (Option<Config>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();

    if !filename.ends_with(CONFIG_FILE_SUFFIX) {
        diagnostics.push(Diagnostic::sourceless(
            Severity::Error,
            "Invalid components configuration",
            format!(
                "Can't use {filename:?} as a component group file: filename must have the \
                 {CONFIG_FILE_SUFFIX} suffix."
            ),
        ));
        return (None, diagnostics);
    }

    let mut config = Config::new(normalize_filename(filename));
    tracing::info!(filename = %config.filename, "loading components configuration");

    let text = match std::str::from_utf8(src) {
        Ok(text) => text,
        Err(err) => {
            let valid = &src[..err.valid_up_to()];
            let valid = std::str::from_utf8(valid).unwrap_or_default();
            let source = SourceFile::new(filename, valid);
            diagnostics.push(Diagnostic::error(
                "Invalid character encoding",
                "All input files must be UTF-8 encoded. Ensure that UTF-8 encoding is selected in your editor.",
                source.range(valid.len()..valid.len()),
            ));
            return (Some(config), diagnostics);
        }
    };

    let source = SourceFile::new(filename, text);
    let body = match hcl_edit::parser::parse_body(text) {
        Ok(body) => body,
        Err(err) => {
            let offset = err.location().offset();
            diagnostics.push(Diagnostic::error(
                "Invalid configuration syntax",
                err.message().to_string(),
                source.range(offset..offset),
            ));
            return (Some(config), diagnostics);
        }
    };

    let whole_file = source.range(0..text.len());
    let content = ROOT_SCHEMA.content(&body, &source, &whole_file, &mut diagnostics);

    let mut decoder = Decoder::new(&source, &mut diagnostics);
    let mut output_names: HashMap<&str, SourceRange> = HashMap::new();
    for matched in content.blocks {
        let block = matched.block;

        match matched.kind {
            RootBlock::Component => {
                let name = matched.name();
                if !decoder.valid_name("component", name, block) {
                    continue;
                }

                let component = Component::new(name.to_string(), decoder.decl_range(block));
                if let Some((kind, existing)) = config.call_declared(name) {
                    decoder.diagnostics().push(duplicate_call(
                        "component",
                        kind,
                        name,
                        existing,
                        component.decl_range,
                    ));
                    continue;
                }

                tracing::debug!(name, "decoded component");
                config.components.insert(name.to_string(), component);
            }
            RootBlock::ComponentGroup => {
                let name = matched.name();
                if !decoder.valid_name("component group", name, block) {
                    continue;
                }

                let group = ComponentGroup::new(name.to_string(), decoder.decl_range(block));
                if let Some((kind, existing)) = config.call_declared(name) {
                    decoder.diagnostics().push(duplicate_call(
                        "component group",
                        kind,
                        name,
                        existing,
                        group.decl_range,
                    ));
                    continue;
                }

                tracing::debug!(name, "decoded component group");
                config.groups.insert(name.to_string(), group);
            }
            RootBlock::Variable => {
                let name = matched.name();
                if !decoder.valid_name("variable", name, block) {
                    continue;
                }

                let variable = decoder.variable(name, block);
                if let Some(existing) = config.input_variables.get(name) {
                    let diagnostic = duplicate(
                        "Duplicate variable declaration",
                        format!(
                            "A variable named {name:?} was already declared at {}. Variable names must be unique \
                             within a configuration file.",
                            existing.decl_range
                        ),
                        variable.decl_range,
                    );
                    decoder.diagnostics().push(diagnostic);
                    continue;
                }

                config.input_variables.insert(name.to_string(), variable);
            }
            RootBlock::Locals => {
                for local in decoder.locals(block) {
                    if let Some(existing) = config.local_values.get(&local.name) {
                        let diagnostic = duplicate(
                            "Duplicate local value definition",
                            format!(
                                "A local value named {:?} was already defined at {}. Local value names must be \
                                 unique across all \"locals\" blocks in a configuration file.",
                                local.name, existing.decl_range
                            ),
                            local.decl_range,
                        );
                        decoder.diagnostics().push(diagnostic);
                        continue;
                    }

                    tracing::debug!(name = %local.name, "decoded local value");
                    config.local_values.insert(local.name.clone(), local);
                }
            }
            RootBlock::Output => {
                let name = matched.name();
                if !decoder.valid_name("output", name, block) {
                    continue;
                }

                let output = decoder.output(name, block);
                let decl_range = decoder.decl_range(block);
                if let Some(existing) = output_names.get(name) {
                    let diagnostic = duplicate(
                        "Duplicate output definition",
                        format!(
                            "An output named {name:?} was already defined at {existing}. Output names must be \
                             unique within a configuration file."
                        ),
                        decl_range,
                    );
                    decoder.diagnostics().push(diagnostic);
                    continue;
                }

                // an output missing its value still claims the name
                output_names.insert(name, decl_range);
                if let Some(output) = output {
                    config.output_values.insert(name.to_string(), output);
                }
            }
        }
    }

    (Some(config), diagnostics)
}

/// Load every configuration file in `dir`, ordered by filename
///
/// Only regular files ending in [CONFIG_FILE_SUFFIX] are considered.
pub fn load_config_dir(dir: impl AsRef<Path>) -> (Vec<Config>, Diagnostics) {
    let dir = dir.as_ref();
    let mut diagnostics = Diagnostics::new();

    let mut paths = match config_file_paths(dir) {
        Ok(paths) => paths,
        Err(err) => {
            diagnostics.push(Diagnostic::sourceless(
                Severity::Error,
                "Can't read configuration directory",
                format!("Error while reading {}: {err}.", dir.display()),
            ));
            return (vec![], diagnostics);
        }
    };
    paths.sort();

    let mut configs = Vec::with_capacity(paths.len());
    for path in paths {
        let (config, file_diagnostics) = load_config_file(&path);
        diagnostics.extend(file_diagnostics);
        configs.extend(config);
    }

    (configs, diagnostics)
}

fn config_file_paths(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut paths = vec![];

    for dir_entry in std::fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_file() {
            continue;
        }

        let is_config_file = dir_entry
            .file_name()
            .to_string_lossy()
            .ends_with(CONFIG_FILE_SUFFIX);
        if is_config_file {
            paths.push(dir_entry.path());
        }
    }

    Ok(paths)
}

fn duplicate(summary: &str, detail: String, subject: SourceRange) -> Diagnostic {
    tracing::debug!(%subject, summary, "duplicate declaration");
    Diagnostic::error(summary, detail, subject)
}

fn duplicate_call(
    what: &str,
    existing_kind: &str,
    name: &str,
    existing: &SourceRange,
    subject: SourceRange,
) -> Diagnostic {
    duplicate(
        &format!("Duplicate {what} declaration"),
        format!(
            "A {existing_kind} named {name:?} was already declared at {existing}. Component and component group \
             names must be unique within a configuration file."
        ),
        subject,
    )
}
