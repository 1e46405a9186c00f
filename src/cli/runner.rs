use crate::{
    backends::{BackendRegistry, ServerOptions},
    cli::{Cli, Commands, CreateArgs, RenderArgs, RenderPart},
    config::{BackendConfig, ProjectConfig, ProjectFile, ProjectFileV1},
    error::{Error, Result},
    generator::{generated_files, ProjectGenerator},
    template::{get_template_engine, TEST_TEMPLATE},
};
use indexmap::IndexMap;
use log::debug;
use std::path::PathBuf;

/// Main CLI runner that dispatches subcommands against a backend registry
pub struct Runner {
    registry: BackendRegistry,
    verbose: bool,
}

impl Runner {
    pub fn new(registry: BackendRegistry, verbose: u8) -> Self {
        Self { registry, verbose: verbose > 0 }
    }

    pub fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Create(args) => self.create(args).map(|_| ()),
            Commands::List => self.list(),
            Commands::Render(args) => self.render(args),
        }
    }

    /// Generates a project, merging the project file with command line flags.
    /// Flags win over the file.
    pub fn create(&self, args: CreateArgs) -> Result<PathBuf> {
        let file = match &args.config {
            Some(path) => ProjectFile::load(path)?.into_v1(),
            None => ProjectFileV1::default(),
        };

        let project_name =
            args.name.or(file.project_name).ok_or(Error::MissingProjectName)?;
        let backend_tag = args.backend.or(file.backend_type).ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "No backend selected. Pass --backend or set backend_type in the project file. \
                 Available backends: {}.",
                self.registry.available()
            ))
        })?;
        let backend_type = self.registry.resolve(&backend_tag)?;
        let description = args
            .description
            .or(file.description)
            .unwrap_or_else(|| format!("MCP server exposing a {backend_type} backend"));

        let mut parameters = file.parameters;
        parameters.extend(args.params);

        let mut settings = file.settings;
        if let Some(transport) = args.transport {
            settings.transport = transport;
        }
        if let Some(host) = args.host {
            settings.host = host;
        }
        if let Some(port) = args.port {
            settings.port = port;
        }
        if let Some(log_level) = args.log_level {
            settings.log_level = log_level;
        }

        let backend_config = BackendConfig::new(backend_type, &project_name, &description)
            .with_dependencies(file.dependencies.into_iter().chain(args.dependencies))
            .with_parameters(parameters);
        let config = ProjectConfig::new(&project_name, &description, backend_config)
            .with_settings(settings);
        debug!("Project configuration: {config:?}");

        let mut generator = ProjectGenerator::new(
            &self.registry,
            &project_name,
            &backend_tag,
            &args.output_dir,
            self.verbose,
        )?
        .with_dry_run(args.dry_run);
        generator.set_config(config)?;
        let root = generator.generate()?;

        if args.dry_run {
            println!("Dry run complete. No files were written to {}.", root.display());
        } else {
            println!("Created MCP server project in {}.", root.display());
            for file in generated_files(&root)? {
                println!("  {}", file.display());
            }
        }
        Ok(root)
    }

    fn list(&self) -> Result<()> {
        for entry in self.registry.entries() {
            let backend = self
                .registry
                .create(BackendConfig::new(entry.backend_type, "example", entry.description))?;
            println!("{}: {}", entry.backend_type, entry.description);
            println!("  dependencies: {}", backend.dependencies().join(", "));
            let tools: Vec<_> = backend.tools().iter().map(|tool| tool.name).collect();
            println!("  tools: {}", tools.join(", "));

            let schema = backend.parameter_schema();
            if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
                println!("  parameters:");
                for (name, property) in properties {
                    let description =
                        property.get("description").and_then(|d| d.as_str()).unwrap_or_default();
                    match property.get("default") {
                        Some(default) => println!("    {name}: {description} (default: {default})"),
                        None => println!("    {name}: {description}"),
                    }
                }
            }
        }
        Ok(())
    }

    fn render(&self, args: RenderArgs) -> Result<()> {
        let backend_type = self.registry.resolve(&args.backend)?;
        let parameters: IndexMap<_, _> = args.params.into_iter().collect();
        let config = BackendConfig::new(
            backend_type,
            format!("{backend_type}-server"),
            format!("MCP server exposing a {backend_type} backend"),
        )
        .with_parameters(parameters);
        let backend = self.registry.create(config)?;
        let engine = get_template_engine()?;

        let code = match args.part {
            RenderPart::Server => backend.generate_server_code(&engine)?,
            RenderPart::Init => backend.get_init_code(&engine)?,
            RenderPart::Tests => {
                let options = ServerOptions::for_backend(backend.config());
                let context = backend.template_context(&engine, &options)?;
                backend.render_part(&engine, TEST_TEMPLATE, &context)?
            }
        };
        println!("{}", code.trim_end());
        Ok(())
    }
}

/// Main entry point for CLI execution
pub fn run(cli: Cli) -> Result<()> {
    let runner = Runner::new(BackendRegistry::builtin(), cli.verbose);
    runner.run(cli.command)
}
