//! aiprompts - Validate and index a corpus of AI assistant prompts and rules
//!
//! The corpus is a directory of entry folders, each holding an `aiprompt.json`
//! descriptor and the markdown files it references. `validate` checks the
//! layout and metadata; `build` flattens everything into one JSON index.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod frontmatter;
pub mod index;
pub mod validator;
