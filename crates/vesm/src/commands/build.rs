//! Build command - Compile script setup files

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::{Args, ValueEnum};
use glob::Pattern;
use ignore::Walk;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};
use vesm_atelier_setup::{compile_script_setup_full, transform_es_module, ScriptSetupOptions};

use crate::config::VesmConfig;
use crate::error::BuildError;

/// Default input pattern in setup mode.
pub const DEFAULT_PATTERN: &str = "./**/*.setup.js";

/// Default output directory.
pub const DEFAULT_OUTPUT: &str = "./dist";

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Output compiled JavaScript
    #[default]
    Js,
    /// Output JSON with code and metadata
    Json,
    /// Only show statistics (no output)
    Stats,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Mode {
    /// Compile `<script setup>` code into a component module
    #[default]
    Setup,
    /// Rewrite a plain ES module script into CommonJS
    Module,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Glob pattern(s) to match script files (default: ./**/*.setup.js)
    #[arg(default_value = DEFAULT_PATTERN)]
    pub patterns: Vec<String>,

    /// Output directory (default: ./dist, or `build.output` from vesm.config.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "js")]
    pub format: OutputFormat,

    /// Compilation mode
    #[arg(long, value_enum, default_value = "setup")]
    pub mode: Mode,

    /// Component name (default: file name up to the first dot)
    #[arg(long)]
    pub name: Option<String>,

    /// Number of threads (default: number of CPUs)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Continue on errors
    #[arg(long)]
    pub continue_on_error: bool,
}

impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            patterns: vec![DEFAULT_PATTERN.to_string()],
            output: None,
            format: OutputFormat::default(),
            mode: Mode::default(),
            name: None,
            threads: None,
            continue_on_error: false,
        }
    }
}

#[derive(Debug, Default)]
struct CompileStats {
    success: AtomicUsize,
    failed: AtomicUsize,
    total_bytes: AtomicUsize,
    output_bytes: AtomicUsize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompileOutput {
    filename: String,
    name: String,
    code: String,
    bindings: Vec<String>,
    #[serde(rename = "async")]
    is_async: bool,
    error: Option<String>,
}

pub fn run(args: BuildArgs, config: &VesmConfig) -> Result<(), BuildError> {
    let start = Instant::now();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let files = collect_files(&args.patterns)?;
    if files.is_empty() {
        return Err(BuildError::NoFiles(args.patterns.clone()));
    }
    if args.format != OutputFormat::Stats {
        check_output_collisions(&files)?;
    }
    info!(
        files = files.len(),
        threads = rayon::current_num_threads(),
        "compiling"
    );

    let mut base_options = ScriptSetupOptions::default();
    if let Some(module) = &config.build.framework_module {
        base_options.framework_module = module.clone();
    }
    if let Some(loader) = &config.build.component_loader {
        base_options.component_loader = loader.clone();
    }

    let stats = CompileStats::default();
    let results: Vec<(PathBuf, Result<CompileOutput, BuildError>)> = files
        .par_iter()
        .map(|path| {
            let source_size = fs::metadata(path).map(|m| m.len() as usize).unwrap_or(0);
            stats.total_bytes.fetch_add(source_size, Ordering::Relaxed);

            let result = compile_file(path, &args, &base_options);
            match &result {
                Ok(output) => {
                    stats.success.fetch_add(1, Ordering::Relaxed);
                    stats
                        .output_bytes
                        .fetch_add(output.code.len(), Ordering::Relaxed);
                }
                Err(err) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    eprintln!("{}", err);
                }
            }
            (path.clone(), result)
        })
        .collect();

    let failed = stats.failed.load(Ordering::Relaxed);
    if failed > 0 && !args.continue_on_error {
        let first = results.into_iter().find_map(|(_, result)| result.err());
        return Err(first.unwrap_or(BuildError::Failed(failed)));
    }

    if args.format != OutputFormat::Stats {
        let output_dir = args
            .output
            .clone()
            .or_else(|| config.build.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        write_outputs(&output_dir, args.format, results)?;
    }

    let total_elapsed = start.elapsed();
    let success = stats.success.load(Ordering::Relaxed);
    debug!(
        input_bytes = stats.total_bytes.load(Ordering::Relaxed),
        output_bytes = stats.output_bytes.load(Ordering::Relaxed),
        "build finished"
    );

    if failed > 0 {
        eprintln!(
            "✗ {} file(s) failed, {} compiled in {:.4}s",
            failed,
            success,
            total_elapsed.as_secs_f64()
        );
        return Err(BuildError::Failed(failed));
    }

    let file_word = if success == 1 { "file" } else { "files" };
    eprintln!(
        "✓ {} {} compiled in {:.4}s",
        success,
        file_word,
        total_elapsed.as_secs_f64()
    );
    Ok(())
}

fn write_outputs(
    output_dir: &Path,
    format: OutputFormat,
    results: Vec<(PathBuf, Result<CompileOutput, BuildError>)>,
) -> Result<(), BuildError> {
    fs::create_dir_all(output_dir).map_err(|source| BuildError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    for (path, result) in results {
        let stem = file_stem(&path);
        let (ext, content) = match (format, result) {
            (OutputFormat::Js, Ok(output)) => ("js", output.code),
            (OutputFormat::Json, Ok(output)) => (
                "json",
                serde_json::to_string_pretty(&output).unwrap_or_default(),
            ),
            (OutputFormat::Json, Err(err)) => {
                let output = CompileOutput {
                    filename: file_name(&path),
                    name: stem.clone(),
                    code: String::new(),
                    bindings: Vec::new(),
                    is_async: false,
                    error: Some(err.to_string()),
                };
                ("json", serde_json::to_string_pretty(&output).unwrap_or_default())
            }
            _ => continue,
        };

        let out_path = output_dir.join(format!("{stem}.{ext}"));
        fs::write(&out_path, content).map_err(|source| BuildError::Write {
            path: out_path.clone(),
            source,
        })?;
        debug!(path = %out_path.display(), "wrote output");
    }
    Ok(())
}

/// Outputs are named by stem, so two inputs sharing a stem would overwrite
/// each other.
fn check_output_collisions(files: &[PathBuf]) -> Result<(), BuildError> {
    let mut seen: HashMap<String, &PathBuf> = HashMap::with_capacity(files.len());
    for path in files {
        let stem = file_stem(path);
        if let Some(first) = seen.get(&stem) {
            return Err(BuildError::OutputCollision {
                stem,
                first: (*first).clone(),
                second: path.clone(),
            });
        }
        seen.insert(stem, path);
    }
    Ok(())
}

fn compile_file(
    path: &Path,
    args: &BuildArgs,
    base_options: &ScriptSetupOptions,
) -> Result<CompileOutput, BuildError> {
    let source = fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let name = args.name.clone().unwrap_or_else(|| file_stem(path));
    let options = ScriptSetupOptions {
        component_name: name.clone(),
        ..base_options.clone()
    };

    let output = match args.mode {
        Mode::Setup => {
            let result = compile_script_setup_full(&source, &options).map_err(|source| {
                BuildError::Compile {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            CompileOutput {
                filename: file_name(path),
                name,
                code: result.code,
                bindings: result.bindings.iter().map(str::to_string).collect(),
                is_async: result.is_async,
                error: None,
            }
        }
        Mode::Module => CompileOutput {
            filename: file_name(path),
            name,
            code: transform_es_module(&source, &options),
            bindings: Vec::new(),
            is_async: false,
            error: None,
        },
    };
    Ok(output)
}

/// File name up to its first dot: `Counter.setup.js` gives `Counter`.
fn file_stem(path: &Path) -> String {
    let name = file_name(path);
    match name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("anonymous")
        .to_string()
}

fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();

    for pattern in patterns {
        let (root, glob_pattern) = parse_pattern(pattern);
        let matcher = Pattern::new(&glob_pattern)?;

        for entry in Walk::new(&root).flatten() {
            let path = entry.path();
            if path.is_file() && matcher.matches_path(path) {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Split a pattern into the directory to walk and the glob to match.
///
/// Walked paths keep the root as their prefix, so a glob rooted at the
/// working directory is given a leading `./`.
fn parse_pattern(pattern: &str) -> (String, String) {
    let has_wildcard = pattern.contains(['*', '?', '[']);

    let root = if let Some(pos) = pattern.find(['*', '?', '[']) {
        match pattern[..pos].rfind('/') {
            Some(0) => "/".to_string(),
            Some(last_slash) => pattern[..last_slash].to_string(),
            None => ".".to_string(),
        }
    } else {
        let path = Path::new(pattern);
        if path.is_dir() {
            let root = pattern.trim_end_matches('/');
            return (root.to_string(), format!("{}/**/*.js", Pattern::escape(root)));
        }
        match path.parent().map(|p| p.to_string_lossy().into_owned()) {
            Some(parent) if !parent.is_empty() => parent,
            _ => ".".to_string(),
        }
    };

    let glob_pattern = if has_wildcard {
        pattern.to_string()
    } else {
        Pattern::escape(pattern)
    };
    let glob_pattern = if root == "." && !glob_pattern.starts_with("./") {
        format!("./{glob_pattern}")
    } else {
        glob_pattern
    };
    (root, glob_pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_dir() -> TempDir {
        tempfile::Builder::new().prefix("vesm-build").tempdir().unwrap()
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("src/Counter.setup.js")), "Counter");
        assert_eq!(file_stem(Path::new("Plain.js")), "Plain");
        assert_eq!(file_stem(Path::new(".hidden")), ".hidden");
    }

    #[test]
    fn test_parse_pattern() {
        assert_eq!(
            parse_pattern("./**/*.setup.js"),
            (".".to_string(), "./**/*.setup.js".to_string())
        );
        assert_eq!(
            parse_pattern("src/components/*.js"),
            ("src/components".to_string(), "src/components/*.js".to_string())
        );
        assert_eq!(parse_pattern("*.js"), (".".to_string(), "./*.js".to_string()));
        assert_eq!(
            parse_pattern("missing/App.setup.js"),
            ("missing".to_string(), "missing/App.setup.js".to_string())
        );
    }

    fn build_args(dir: &Path, format: OutputFormat) -> BuildArgs {
        BuildArgs {
            patterns: vec![format!("{}/**/*.setup.js", dir.display())],
            output: Some(dir.join("dist")),
            format,
            ..BuildArgs::default()
        }
    }

    #[test]
    fn test_build_writes_js() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("Counter.setup.js"),
            "const count = ref(0)
const data = await load()",
        )
        .unwrap();

        run(build_args(dir.path(), OutputFormat::Js), &VesmConfig::default()).unwrap();

        let code = fs::read_to_string(dir.path().join("dist/Counter.js")).unwrap();
        assert!(code.starts_with("module.exports = {\n  name: \"Counter\",\n"));
        assert!(code.contains("  setup: async function(__props__, __ctx__) {\n"));
    }

    #[test]
    fn test_build_json_with_errors() {
        let dir = temp_dir();
        fs::write(dir.path().join("Ok.setup.js"), "const a = 1").unwrap();
        fs::write(dir.path().join("Model.setup.js"), "const v = defineModel()").unwrap();

        let mut args = build_args(dir.path(), OutputFormat::Json);
        args.continue_on_error = true;
        let err = run(args, &VesmConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::Failed(1)));

        let ok: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("dist/Ok.json")).unwrap())
                .unwrap();
        assert_eq!(ok["name"], "Ok");
        assert_eq!(ok["bindings"], serde_json::json!(["a"]));
        assert_eq!(ok["async"], false);
        assert!(ok["error"].is_null());

        let failed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("dist/Model.json")).unwrap())
                .unwrap();
        assert!(failed["error"]
            .as_str()
            .unwrap()
            .contains("Unsupported macro: defineModel"));
    }

    #[test]
    fn test_build_stops_on_first_error() {
        let dir = temp_dir();
        fs::write(dir.path().join("Slots.setup.js"), "defineSlots()").unwrap();

        let err = run(build_args(dir.path(), OutputFormat::Js), &VesmConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::Compile { .. }));
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_build_module_mode() {
        let dir = temp_dir();
        fs::write(dir.path().join("util.setup.js"), "export default 42").unwrap();

        let mut args = build_args(dir.path(), OutputFormat::Js);
        args.mode = Mode::Module;
        run(args, &VesmConfig::default()).unwrap();

        let code = fs::read_to_string(dir.path().join("dist/util.js")).unwrap();
        assert_eq!(code, "module.exports = 42");
    }

    #[test]
    fn test_same_stem_in_two_directories_is_rejected() {
        let dir = temp_dir();
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("Card.setup.js"), "const a = 1").unwrap();
        }

        let err = run(build_args(dir.path(), OutputFormat::Js), &VesmConfig::default()).unwrap_err();
        match err {
            BuildError::OutputCollision { stem, first, second } => {
                assert_eq!(stem, "Card");
                assert!(first.ends_with("a/Card.setup.js"));
                assert!(second.ends_with("b/Card.setup.js"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_same_stem_is_fine_for_stats() {
        let dir = temp_dir();
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("Card.setup.js"), "const a = 1").unwrap();
        }

        run(build_args(dir.path(), OutputFormat::Stats), &VesmConfig::default()).unwrap();
    }

    #[test]
    fn test_no_files() {
        let dir = temp_dir();
        let err = run(build_args(dir.path(), OutputFormat::Stats), &VesmConfig::default())
            .unwrap_err();
        assert!(matches!(err, BuildError::NoFiles(_)));
    }
}
