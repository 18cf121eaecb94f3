//! static body schemas and content extraction
//!
//! A [BodySchema] names the attributes and block types a body may contain. [BodySchema::content] walks a parsed
//! [Body] and sorts its structures into what the schema expects, reporting everything else as diagnostics:
//!
//! - attributes the schema does not know about (`Unsupported argument`)
//! - attributes set more than once (`Duplicate argument`)
//! - required attributes that are missing (`Missing required argument`)
//! - block types the schema does not know about (`Unsupported block type`)
//! - blocks with too few or too many labels
//!
//! Blocks that fail any of these checks are not returned, so callers only ever see blocks whose type and label
//! count match a schema entry. Each entry carries a `kind` value chosen by the caller, usually a fieldless enum,
//! which lets callers dispatch with an exhaustive `match`.
use crate::diagnostics::{Diagnostic, Diagnostics, SourceFile, SourceRange};
use hcl_edit::structure::{Attribute, Block, Body, Structure};
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockHeaderSchema<K> {
    pub kind: K,
    pub type_name: &'static str,
    pub label_names: &'static [&'static str],
}

#[derive(Debug)]
pub struct BodySchema<K: 'static> {
    pub attributes: &'static [AttributeSchema],
    pub blocks: &'static [BlockHeaderSchema<K>],
}

/// The parts of a body matched by a [BodySchema]
#[derive(Debug)]
pub struct BodyContent<'b, K> {
    /// Attributes by name, in source order
    pub attributes: IndexMap<&'static str, &'b Attribute>,
    /// Blocks in source order
    pub blocks: Vec<MatchedBlock<'b, K>>,
}

#[derive(Debug)]
pub struct MatchedBlock<'b, K> {
    pub kind: K,
    pub labels: Vec<&'b str>,
    pub block: &'b Block,
}

impl<'b, K: std::fmt::Debug> MatchedBlock<'b, K> {
    /// First label of a block whose schema declares at least one label
    pub fn name(&self) -> &'b str {
        match self.labels.as_slice() {
            [name, ..] => *name,
            [] => unreachable!("{:?} block was matched without its name label", self.kind),
        }
    }
}

impl<K: Copy> BodySchema<K> {
    /// Extract the content of `body` according to this schema
    ///
    /// `missing_item_range` is used as the subject of diagnostics for required attributes that are absent.
    pub fn content<'b>(
        &self,
        body: &'b Body,
        source: &SourceFile,
        missing_item_range: &SourceRange,
        diagnostics: &mut Diagnostics,
    ) -> BodyContent<'b, K> {
        let mut content = BodyContent {
            attributes: IndexMap::new(),
            blocks: Vec::new(),
        };

        for structure in body.iter() {
            match structure {
                Structure::Attribute(attribute) => {
                    let name = attribute.key.value().as_str();
                    let Some(schema) = self.attributes.iter().find(|schema| schema.name == name)
                    else {
                        diagnostics.push(Diagnostic::error(
                            "Unsupported argument",
                            format!("An argument named {name:?} is not expected here."),
                            source.range_of(&attribute.key),
                        ));
                        continue;
                    };

                    if let Some(existing) = content.attributes.get(schema.name) {
                        diagnostics.push(duplicate_argument(source, existing, attribute));
                        continue;
                    }

                    content.attributes.insert(schema.name, attribute);
                }
                Structure::Block(block) => {
                    let type_name = block.ident.value().as_str();
                    let Some(schema) = self
                        .blocks
                        .iter()
                        .find(|schema| schema.type_name == type_name)
                    else {
                        diagnostics.push(Diagnostic::error(
                            "Unsupported block type",
                            format!("Blocks of type {type_name:?} are not expected here."),
                            source.range_of(&block.ident),
                        ));
                        continue;
                    };

                    if let Some(diagnostic) = check_labels(schema, block, source) {
                        diagnostics.push(diagnostic);
                        continue;
                    }

                    content.blocks.push(MatchedBlock {
                        kind: schema.kind,
                        labels: block.labels.iter().map(|label| label.as_str()).collect(),
                        block,
                    });
                }
            }
        }

        for schema in self.attributes.iter().filter(|schema| schema.required) {
            if !content.attributes.contains_key(schema.name) {
                diagnostics.push(Diagnostic::error(
                    "Missing required argument",
                    format!(
                        "The argument {:?} is required, but no definition was found.",
                        schema.name
                    ),
                    missing_item_range.clone(),
                ));
            }
        }

        content
    }
}

/// Extract a body that may only contain attributes with arbitrary names
pub fn just_attributes<'b>(
    body: &'b Body,
    source: &SourceFile,
    diagnostics: &mut Diagnostics,
) -> IndexMap<&'b str, &'b Attribute> {
    let mut attributes: IndexMap<&'b str, &'b Attribute> = IndexMap::new();

    for structure in body.iter() {
        match structure {
            Structure::Attribute(attribute) => {
                let name = attribute.key.value().as_str();
                if let Some(existing) = attributes.get(name) {
                    diagnostics.push(duplicate_argument(source, existing, attribute));
                    continue;
                }
                attributes.insert(name, attribute);
            }
            Structure::Block(block) => diagnostics.push(Diagnostic::error(
                "Unexpected block",
                format!(
                    "Blocks are not allowed here, but found a {:?} block.",
                    block.ident.value().as_str()
                ),
                source.range_of(&block.ident),
            )),
        }
    }

    attributes
}

fn duplicate_argument(source: &SourceFile, existing: &Attribute, new: &Attribute) -> Diagnostic {
    Diagnostic::error(
        "Duplicate argument",
        format!(
            "The argument {:?} was already set at {}. Each argument may be set only once.",
            new.key.value().as_str(),
            source.range_of(&existing.key),
        ),
        source.range_of(&new.key),
    )
}

fn check_labels<K>(
    schema: &BlockHeaderSchema<K>,
    block: &Block,
    source: &SourceFile,
) -> Option<Diagnostic> {
    let expected = schema.label_names;
    let found = block.labels.len();
    let type_name = schema.type_name;

    if found < expected.len() {
        let missing = expected[found];
        let summary = if expected.len() == 1 {
            format!("Missing name for {type_name}")
        } else {
            format!("Missing {missing} for {type_name}")
        };

        return Some(Diagnostic::error(
            summary,
            format!(
                "All {type_name} blocks must have {} labels ({}).",
                expected.len(),
                expected.join(", ")
            ),
            source.range_of(&block.ident),
        ));
    }

    if found > expected.len() {
        let detail = if expected.is_empty() {
            format!("No labels are expected for {type_name} blocks.")
        } else {
            format!(
                "Only {} labels ({}) are expected for {type_name} blocks.",
                expected.len(),
                expected.join(", ")
            )
        };

        return Some(Diagnostic::error(
            format!("Extraneous label for {type_name}"),
            detail,
            source.range_of(block),
        ));
    }

    None
}
