//! `variable`, `locals` and `output` declarations
//!
//! Expressions are kept as written. Nothing here evaluates them, and neither are the conditions of `validation`
//! and `precondition` blocks checked. Those are only decoded into [CheckRule]s.
use crate::diagnostics::{Diagnostic, Diagnostics, SourceFile, SourceRange};
use crate::schema::{just_attributes, AttributeSchema, BlockHeaderSchema, BodySchema};
use crate::util::{serialize_expression, serialize_optional_expression};
use hcl_edit::expr::Expression;
use hcl_edit::structure::{Attribute, Block};
use hcl_edit::template::{Element, Template};
use serde::Serialize;

/// An input variable declared by a `variable "<name>" {}` block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type", serialize_with = "serialize_optional_expression")]
    pub type_constraint: Option<hcl::Expression>,
    #[serde(serialize_with = "serialize_optional_expression")]
    pub default: Option<hcl::Expression>,
    pub sensitive: bool,
    pub nullable: bool,
    pub validations: Vec<CheckRule>,
    pub decl_range: SourceRange,
}

/// A single attribute of a `locals` block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Local {
    pub name: String,
    #[serde(serialize_with = "serialize_expression")]
    pub expr: hcl::Expression,
    pub decl_range: SourceRange,
}

/// An output value declared by an `output "<name>" {}` block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    pub name: String,
    #[serde(serialize_with = "serialize_expression")]
    pub value: hcl::Expression,
    pub description: Option<String>,
    pub sensitive: bool,
    pub preconditions: Vec<CheckRule>,
    pub decl_range: SourceRange,
}

/// A declared condition with the message to show when it does not hold
///
/// Used for `validation` blocks in variables and `precondition` blocks in outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckRule {
    #[serde(serialize_with = "serialize_expression")]
    pub condition: hcl::Expression,
    #[serde(serialize_with = "serialize_expression")]
    pub error_message: hcl::Expression,
    pub decl_range: SourceRange,
}

#[derive(Debug, Clone, Copy)]
enum VariableBlock {
    Validation,
}

static VARIABLE_SCHEMA: BodySchema<VariableBlock> = BodySchema {
    attributes: &[
        AttributeSchema {
            name: "description",
            required: false,
        },
        AttributeSchema {
            name: "type",
            required: false,
        },
        AttributeSchema {
            name: "default",
            required: false,
        },
        AttributeSchema {
            name: "sensitive",
            required: false,
        },
        AttributeSchema {
            name: "nullable",
            required: false,
        },
    ],
    blocks: &[BlockHeaderSchema {
        kind: VariableBlock::Validation,
        type_name: "validation",
        label_names: &[],
    }],
};

#[derive(Debug, Clone, Copy)]
enum OutputBlock {
    Precondition,
}

static OUTPUT_SCHEMA: BodySchema<OutputBlock> = BodySchema {
    attributes: &[
        AttributeSchema {
            name: "value",
            required: true,
        },
        AttributeSchema {
            name: "description",
            required: false,
        },
        AttributeSchema {
            name: "sensitive",
            required: false,
        },
    ],
    blocks: &[BlockHeaderSchema {
        kind: OutputBlock::Precondition,
        type_name: "precondition",
        label_names: &[],
    }],
};

static CHECK_RULE_SCHEMA: BodySchema<()> = BodySchema {
    attributes: &[
        AttributeSchema {
            name: "condition",
            required: true,
        },
        AttributeSchema {
            name: "error_message",
            required: true,
        },
    ],
    blocks: &[],
};

/// Decodes blocks of a single file, appending every problem to `diagnostics`
#[derive(derive_new::new)]
pub(crate) struct Decoder<'s, 'd> {
    source: &'s SourceFile<'s>,
    diagnostics: &'d mut Diagnostics,
}

impl<'s, 'd> Decoder<'s, 'd> {
    pub fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut *self.diagnostics
    }

    pub fn decl_range(&self, block: &Block) -> SourceRange {
        self.source.range_of(block)
    }

    /// Check that a block label can be used as a name
    pub fn valid_name(&mut self, what: &str, name: &str, block: &Block) -> bool {
        if hcl::Identifier::new(name).is_ok() {
            return true;
        }

        self.diagnostics.push(Diagnostic::error(
            format!("Invalid {what} name"),
            "A name must start with a letter or underscore and may contain only letters, digits, \
             underscores, and dashes.",
            self.source.range_of(block),
        ));
        false
    }

    pub fn variable(&mut self, name: &str, block: &Block) -> Variable {
        let decl_range = self.decl_range(block);
        let content = VARIABLE_SCHEMA.content(
            &block.body,
            self.source,
            &decl_range,
            self.diagnostics,
        );

        let mut validations = vec![];
        for matched in &content.blocks {
            match matched.kind {
                VariableBlock::Validation => {
                    if let Some(rule) = self.check_rule(matched.block) {
                        validations.push(rule);
                    }
                }
            }
        }

        let attribute = |name: &str| content.attributes.get(name).copied();

        let variable = Variable {
            name: name.to_string(),
            description: attribute("description").and_then(|attr| self.description(attr)),
            type_constraint: attribute("type").map(expression),
            default: attribute("default").map(expression),
            sensitive: attribute("sensitive")
                .and_then(|attr| self.bool_literal(attr, "Invalid sensitive value"))
                .unwrap_or(false),
            nullable: attribute("nullable")
                .and_then(|attr| self.bool_literal(attr, "Invalid nullable value"))
                .unwrap_or(true),
            validations,
            decl_range,
        };

        tracing::debug!(name = %variable.name, "decoded variable");
        variable
    }

    /// Decode an `output` block
    ///
    /// Returns `None` when the required `value` argument is missing.
    pub fn output(&mut self, name: &str, block: &Block) -> Option<Output> {
        let decl_range = self.decl_range(block);
        let content =
            OUTPUT_SCHEMA.content(&block.body, self.source, &decl_range, self.diagnostics);

        let mut preconditions = vec![];
        for matched in &content.blocks {
            match matched.kind {
                OutputBlock::Precondition => {
                    if let Some(rule) = self.check_rule(matched.block) {
                        preconditions.push(rule);
                    }
                }
            }
        }

        let attribute = |name: &str| content.attributes.get(name).copied();

        let output = Output {
            name: name.to_string(),
            value: expression(attribute("value")?),
            description: attribute("description").and_then(|attr| self.description(attr)),
            sensitive: attribute("sensitive")
                .and_then(|attr| self.bool_literal(attr, "Invalid sensitive value"))
                .unwrap_or(false),
            preconditions,
            decl_range,
        };

        tracing::debug!(name = %output.name, "decoded output");
        Some(output)
    }

    /// Every attribute of a `locals` block, in source order
    pub fn locals(&mut self, block: &Block) -> Vec<Local> {
        just_attributes(&block.body, self.source, self.diagnostics)
            .into_iter()
            .map(|(name, attribute)| Local {
                name: name.to_string(),
                expr: expression(attribute),
                decl_range: self.source.range_of(attribute),
            })
            .collect()
    }

    fn check_rule(&mut self, block: &Block) -> Option<CheckRule> {
        let decl_range = self.decl_range(block);
        let content =
            CHECK_RULE_SCHEMA.content(&block.body, self.source, &decl_range, self.diagnostics);

        Some(CheckRule {
            condition: expression(content.attributes.get("condition")?),
            error_message: expression(content.attributes.get("error_message")?),
            decl_range,
        })
    }

    /// A quoted string or a heredoc, both without interpolations or directives
    fn description(&mut self, attribute: &Attribute) -> Option<String> {
        let description = match &attribute.value {
            Expression::String(description) => Some(description.value().clone()),
            Expression::HeredocTemplate(heredoc) => literal_template(&heredoc.template),
            _ => None,
        };

        if description.is_none() {
            self.diagnostics.push(Diagnostic::error(
                "Invalid description",
                "The description must be a string literal.",
                self.source.range_of(&attribute.value),
            ));
        }
        description
    }

    fn bool_literal(&mut self, attribute: &Attribute, summary: &str) -> Option<bool> {
        match expression(attribute) {
            hcl::Expression::Bool(value) => Some(value),
            _ => {
                self.diagnostics.push(Diagnostic::error(
                    summary,
                    format!(
                        "The {:?} argument must be either true or false.",
                        attribute.key.value().as_str()
                    ),
                    self.source.range_of(&attribute.value),
                ));
                None
            }
        }
    }
}

fn expression(attribute: &Attribute) -> hcl::Expression {
    attribute.value.clone().into()
}

fn literal_template(template: &Template) -> Option<String> {
    template
        .iter()
        .map(|element| match element {
            Element::Literal(literal) => Some(literal.value().as_str()),
            _ => None,
        })
        .collect()
}
