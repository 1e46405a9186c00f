//! Embedded templates and the file operations a generated project is made of
//!
//! - `operation`: filesystem changes produced by rendering
//! - `processor`: applies those changes, honouring dry runs

pub mod operation;
pub mod processor;

use crate::{
    error::{Error, Result},
    renderer::{MiniJinjaRenderer, TemplateRenderer},
};

pub const SERVER_TEMPLATE: &str = "server.py.j2";
pub const TEST_TEMPLATE: &str = "test_server.py.j2";
pub const README_TEMPLATE: &str = "README.md.j2";
pub const ENV_EXAMPLE_TEMPLATE: &str = "env.example.j2";

macro_rules! embedded {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!("../../templates/", $name)))),*]
    };
}

/// Every template shipped with the binary, keyed by registered name.
pub const TEMPLATES: &[(&str, &str)] = embedded![
    "server.py.j2",
    "test_server.py.j2",
    "README.md.j2",
    "env.example.j2",
    "filesystem/init.py.j2",
    "filesystem/helpers.py.j2",
    "filesystem/tools/read_file.py.j2",
    "filesystem/tools/write_file.py.j2",
    "filesystem/tools/list_directory.py.j2",
    "filesystem/tools/search_files.py.j2",
    "filesystem/tools/get_file_info.py.j2",
    "filesystem/resources/list.py.j2",
    "filesystem/resources/read.py.j2",
    "api/init.py.j2",
    "api/helpers.py.j2",
    "api/tools/request.py.j2",
    "database/init.py.j2",
    "database/helpers.py.j2",
    "database/tools/execute_query.py.j2",
    "database/tools/list_tables.py.j2",
    "database/tools/describe_table.py.j2",
    "database/resources/list.py.j2",
    "database/resources/read.py.j2",
];

/// Builds a renderer with every embedded template registered.
pub fn get_template_engine() -> Result<MiniJinjaRenderer> {
    let mut engine = MiniJinjaRenderer::new();
    for (name, template) in TEMPLATES {
        engine
            .add_template(name, template)
            .map_err(|source| Error::Template { name: name.to_string(), source })?;
    }
    Ok(engine)
}
