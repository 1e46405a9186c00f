//! Constants used throughout modelctx

/// Name of the field every generated tool uses for its parameter schema.
pub const SCHEMA_FIELD: &str = "input_schema";

/// Name of the server object exported by the generated `server.py`.
pub const SERVER_SYMBOL: &str = "server";

/// Module name of the generated server entry point.
pub const SERVER_MODULE: &str = "server";

/// Maximum accepted project name length
pub const MAX_PROJECT_NAME_LEN: usize = 50;

/// Protocol runtime dependencies every generated project needs
pub const BASELINE_DEPENDENCIES: &[&str] = &["mcp>=1.0.0", "python-dotenv>=1.0.0"];

/// Dependencies needed by the generated test suite
pub const TEST_DEPENDENCIES: &[&str] = &["pytest>=7.0.0", "pytest-asyncio>=0.21.0"];

/// Extra dependencies for the SSE transport
pub const SSE_DEPENDENCIES: &[&str] = &["starlette>=0.27.0", "uvicorn>=0.23.0"];

/// Project file extensions accepted by `--config`
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Layout of the generated project, relative to its root
pub mod layout {
    pub const SERVER_FILE: &str = "server.py";
    pub const MANIFEST_FILE: &str = "requirements.txt";
    pub const README_FILE: &str = "README.md";
    pub const ENV_EXAMPLE_FILE: &str = ".env.example";
    pub const CONFIG_DIR: &str = "config";
    pub const CONFIG_FILE: &str = "config/config.yaml";
    pub const DESKTOP_CONFIG_FILE: &str = "config/claude_desktop_config.json";
    pub const TESTS_DIR: &str = "tests";
    pub const TESTS_INIT_FILE: &str = "tests/__init__.py";
    pub const TEST_FILE: &str = "tests/test_server.py";
}

/// Settings defaults
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 8000;
    pub const LOG_LEVEL: &str = "INFO";
}

/// Exit codes
pub mod exit_codes {
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
