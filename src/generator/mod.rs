//! Turns a project configuration into a directory of files.

pub mod files;
pub mod manifest;

use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::{
    backends::{AnyBackend, BackendRegistry, ServerOptions},
    config::{BackendType, ProjectConfig},
    constants::layout,
    error::{Error, Result},
    renderer::MiniJinjaRenderer,
    syntax::check_python,
    template::{
        get_template_engine, operation::FileOperation, processor::FileProcessor,
        ENV_EXAMPLE_TEMPLATE, README_TEMPLATE, TEST_TEMPLATE,
    },
    validation::validate_project_name,
};

/// Generates one project under `<output_dir>/<project_name>`.
pub struct ProjectGenerator<'a> {
    registry: &'a BackendRegistry,
    engine: MiniJinjaRenderer,
    project_name: String,
    backend_type: BackendType,
    output_dir: PathBuf,
    verbose: bool,
    dry_run: bool,
    config: Option<ProjectConfig>,
}

impl<'a> ProjectGenerator<'a> {
    /// Validates the project name and backend tag; nothing is rendered yet.
    pub fn new(
        registry: &'a BackendRegistry,
        project_name: impl Into<String>,
        backend_type: &str,
        output_dir: impl Into<PathBuf>,
        verbose: bool,
    ) -> Result<Self> {
        let project_name = project_name.into();
        if !validate_project_name(&project_name) {
            return Err(Error::InvalidProjectName { name: project_name });
        }
        let backend_type = registry.resolve(backend_type)?;

        Ok(Self {
            registry,
            engine: get_template_engine()?,
            project_name,
            backend_type,
            output_dir: output_dir.into(),
            verbose,
            dry_run: false,
            config: None,
        })
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Attaches the configuration to generate from.
    ///
    /// Its backend type and project name must match the ones the generator
    /// was created for.
    pub fn set_config(&mut self, config: ProjectConfig) -> Result<()> {
        if config.backend_type != self.backend_type
            || config.backend_config.backend_type() != self.backend_type
        {
            return Err(Error::BackendMismatch {
                expected: self.backend_type.to_string(),
                found: config.backend_config.backend_type().to_string(),
            });
        }
        for name in [config.project_name.as_str(), config.backend_config.project_name()] {
            if name != self.project_name {
                return Err(Error::ProjectNameMismatch {
                    expected: self.project_name.clone(),
                    found: name.to_string(),
                });
            }
        }
        self.config = Some(config);
        Ok(())
    }

    /// The attached configuration, or defaults for the generator's backend.
    pub fn config(&self) -> ProjectConfig {
        self.config
            .clone()
            .unwrap_or_else(|| ProjectConfig::default_for(&self.project_name, self.backend_type))
    }

    pub fn backend_type(&self) -> BackendType {
        self.backend_type
    }

    pub fn project_root(&self) -> PathBuf {
        self.output_dir.join(&self.project_name)
    }

    /// Constructs the backend for the current configuration.
    pub fn backend(&self) -> Result<AnyBackend> {
        self.registry.create(self.config().backend_config)
    }

    /// Renders every file of the project without touching the disk.
    ///
    /// Python sources are checked for structural validity; a failure is
    /// reported as [`Error::Syntax`] naming the file.
    pub fn render(&self) -> Result<Vec<FileOperation>> {
        let config = self.config();
        let backend = self.registry.create(config.backend_config.clone())?;
        let root = self.project_root();
        debug!("Rendering '{}' with the {} backend", config.project_name, self.backend_type);

        let context = backend.template_context(&self.engine, &ServerOptions::for_project(&config))?;
        let server = backend.render_server(&self.engine, &context)?;
        let tests = backend.render_part(&self.engine, TEST_TEMPLATE, &context)?;
        let readme = backend.render_part(&self.engine, README_TEMPLATE, &context)?;
        let env_example = backend.render_part(&self.engine, ENV_EXAMPLE_TEMPLATE, &context)?;
        let requirements = manifest::build_manifest(
            &config.settings,
            &backend.dependencies(),
            config.backend_config.dependencies(),
        );

        check_generated_python(layout::SERVER_FILE, &server)?;
        check_generated_python(layout::TEST_FILE, &tests)?;

        Ok(vec![
            FileOperation::create_directory(&root),
            FileOperation::create_directory(root.join(layout::CONFIG_DIR)),
            FileOperation::create_directory(root.join(layout::TESTS_DIR)),
            FileOperation::write(root.join(layout::SERVER_FILE), server),
            FileOperation::write(root.join(layout::MANIFEST_FILE), requirements),
            FileOperation::write(root.join(layout::README_FILE), readme),
            FileOperation::write(root.join(layout::ENV_EXAMPLE_FILE), env_example),
            FileOperation::write(
                root.join(layout::CONFIG_FILE),
                files::config_yaml(&config, backend.parameters())?,
            ),
            FileOperation::write(
                root.join(layout::DESKTOP_CONFIG_FILE),
                files::desktop_config(&config, &root)?,
            ),
            FileOperation::write(root.join(layout::TESTS_INIT_FILE), ""),
            FileOperation::write(root.join(layout::TEST_FILE), tests),
        ])
    }

    /// Renders and writes the project, replacing files from earlier runs.
    ///
    /// Returns the project root.
    pub fn generate(&self) -> Result<PathBuf> {
        let operations = self.render()?;
        FileProcessor::new(self.dry_run).apply_all(&operations)?;

        let root = self.project_root();
        if self.dry_run {
            info!("Dry run finished, nothing was written to '{}'", root.display());
        } else {
            info!("Generated project '{}' in '{}'", self.project_name, root.display());
            if self.verbose {
                for file in generated_files(&root)? {
                    info!("  {}", file.display());
                }
            }
        }
        Ok(root)
    }
}

fn check_generated_python(file: &str, source: &str) -> Result<()> {
    check_python(source).map_err(|issue| Error::Syntax {
        file: file.to_string(),
        line: issue.line,
        message: issue.message,
    })
}

/// Files under `root`, relative to it, in a stable order.
pub fn generated_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Other(anyhow::anyhow!(e)))?;
        if entry.file_type().is_file() {
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }
    }
    Ok(files)
}
