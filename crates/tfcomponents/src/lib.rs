//! # tfcomponents - component group configuration
//!
//! Loads `.tfcomponents.hcl` files: the static description of components and (nested) component groups, plus the
//! input variables, local values and output values around them.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `tfcomponents` works internally.
//!
//! ### HCL Terms
//!
//! In hcl terms...
//! - a file gets parsed as a `body`
//! - ...which is just a list of `structures`
//! - ...where there are two kinds:
//!   - `attribute`: a "key = value" pair
//!   - or `block`:
//!     - 1 `identifier` (the block type)
//!     - followed by 0 or more `labels`
//!     - and a `body` enclosed in `{` and `}`
//!
//! This is a valid configuration file:
//! ```hcl
//! variable "region" {
//!   type    = string
//!   default = "eu-west-1"
//! }
//!
//! locals {
//!   prefix = "prod"
//! }
//!
//! component "database" {}
//!
//! component_group "network" {}
//!
//! output "region" {
//!   value = var.region
//!
//!   precondition {
//!     condition     = var.region != ""
//!     error_message = "A region is required."
//!   }
//! }
//! ```
//!
//! ### Loading files
//!
//! see [config::load_config_file] and [config::load_config]
//!
//! The filename has to end with `.tfcomponents.hcl`, otherwise loading stops right away. The file is then parsed as
//! a [hcl_edit::structure::Body]. The root body is matched against a fixed [schema::BodySchema] which knows five
//! block types: `component`, `component_group`, `variable`, `locals` and `output`. Anything else is reported and
//! skipped.
//!
//! Each remaining block is decoded into its declaration type and stored in the [config::Config] under its name.
//! Components and component groups share one namespace. When a name is used twice the first declaration is kept
//! and the second one is reported.
//!
//! ### Diagnostics
//!
//! Loading does not return `Result`. Every problem becomes a [diagnostics::Diagnostic] and loading continues as far
//! as it can, so that a single run reports as many problems as possible. Only an unreadable file or a wrong filename
//! return no [config::Config] at all.
//!
//! ### Addresses and the components tree
//!
//! [component::Component::call_addr] and [component::ComponentGroup::call_addr] produce name-only addresses
//! ([addrs]). A [components_tree::Tree] arranges component group calls into a hierarchy where every node knows its
//! parent, the root and the path of calls leading to it.
//!
//! Expressions are never evaluated here. They are kept as [hcl::Expression] for later stages.
//!
pub mod addrs;
pub mod component;
pub mod components_tree;
pub mod config;
pub mod declarations;
pub mod diagnostics;
pub mod schema;
mod util;

pub use config::{load_config, load_config_dir, load_config_file, Config, CONFIG_FILE_SUFFIX};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
