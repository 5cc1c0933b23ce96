//! Convert command: transpile every view, classify references, write dbt metadata,
//! and inject `ref()`/`source()` placeholders.

use anyhow::{Context, Result};
use sc_core::{
    categorize_refs, derive_model_name, write_model_refs, write_sources, CanonicalNames, Config,
    ConversionResult, CoreError, DuplicatePolicy, ModelName, OutputLayout,
};
use sc_jinja::inject_dbt_macros;
use sc_sql::{extract_table_refs_from_sql, transpiler_for, SqlParser, Transpiler};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::Cli;

/// Converts T-SQL files into models on disk
pub struct Converter {
    parser: SqlParser,
    transpiler: Box<dyn Transpiler>,
    layout: OutputLayout,
    duplicates: DuplicatePolicy,
}

impl Converter {
    /// Build a converter for the dialects and layout in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            parser: SqlParser::from_dialect_name(&config.read_dialect)?,
            transpiler: transpiler_for(&config.read_dialect, &config.write_dialect)?,
            layout: config.layout,
            duplicates: config.duplicate_models,
        })
    }

    /// Convert one file into `output_dir`.
    ///
    /// Reference extraction never fails the file; a transpile failure does.
    pub fn convert_file(&self, input: &Path, output_dir: &Path) -> Result<ConversionResult> {
        let model_name = model_name_for(input)?;
        log::info!("Converting {}", input.display());

        let sql = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        let table_refs = extract_table_refs_from_sql(&self.parser, &sql);
        let converted = self
            .transpiler
            .transpile(&sql)
            .with_context(|| format!("Failed to transpile {}", input.display()))?;

        let output_path = self.layout.model_path(output_dir, model_name.as_str());
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&output_path, converted)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        log::info!("Wrote converted SQL to {}", output_path.display());

        Ok(ConversionResult::new(model_name, output_path, table_refs))
    }

    /// Convert every `.sql` file under `input_dir`.
    ///
    /// A file that fails is logged and skipped. Two files whose model names
    /// differ only in case either keep the later file (with a warning) or
    /// abort the batch, depending on the duplicate policy. A replaced model's
    /// output file is removed before the later file is converted.
    pub fn convert_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<Vec<ConversionResult>> {
        let files = discover_sql_files(input_dir);
        if files.is_empty() {
            log::warn!("No SQL files found in {}", input_dir.display());
            return Ok(Vec::new());
        }

        let mut results: Vec<ConversionResult> = Vec::with_capacity(files.len());
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();

        for input in &files {
            let key = match model_name_for(input) {
                Ok(name) => name.lowercased(),
                Err(e) => {
                    log::error!("Failed to convert {}: {}", input.display(), e);
                    continue;
                }
            };

            if let Some(first) = claimed.get(&key) {
                match self.duplicates {
                    DuplicatePolicy::Error => {
                        return Err(CoreError::DuplicateModel {
                            name: key,
                            first: first.display().to_string(),
                            second: input.display().to_string(),
                        }
                        .into());
                    }
                    DuplicatePolicy::Warn => {
                        log::warn!(
                            "Model '{}' from {} replaces the one from {}",
                            key,
                            input.display(),
                            first.display()
                        );
                        discard_model(&mut results, &key)?;
                    }
                }
            }

            match self.convert_file(input, output_dir) {
                Ok(result) => {
                    claimed.insert(key, input.clone());
                    results.push(result);
                }
                Err(e) => log::error!("Failed to convert {}: {:#}", input.display(), e),
            }
        }

        Ok(results)
    }
}

/// Drop an earlier model that a later file replaces, along with its output
/// file, so no unprocessed model is left behind in the output directory.
fn discard_model(results: &mut Vec<ConversionResult>, key: &str) -> Result<()> {
    let Some(index) = results.iter().position(|r| r.model_name.lowercased() == key) else {
        return Ok(());
    };
    let replaced = results.remove(index);
    match std::fs::remove_file(&replaced.output_path) {
        Ok(()) => {
            log::debug!("Removed {}", replaced.output_path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| {
            format!("Failed to remove {}", replaced.output_path.display())
        }),
    }
}

/// `.sql` files under `dir`, any extension case, sorted by path
pub fn discover_sql_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn model_name_for(path: &Path) -> Result<ModelName> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    ModelName::try_new(derive_model_name(stem)).ok_or_else(|| {
        CoreError::InvalidModelName {
            path: path.display().to_string(),
        }
        .into()
    })
}

/// Execute the convert command
pub fn execute(cli: &Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref(), &cli.input_dir)
        .context("Failed to load configuration")?;
    let converter = Converter::from_config(&config)?;

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;

    let results = converter.convert_directory(&cli.input_dir, &cli.output)?;
    if results.is_empty() {
        log::warn!("No files were converted; skipping metadata");
        return Ok(());
    }

    let categorized = categorize_refs(&results);
    let canonical = CanonicalNames::build(&categorized);

    write_sources(&categorized, &canonical, &config.sources_path(&cli.output))?;
    write_model_refs(&categorized, &config.model_refs_path(&cli.output))?;

    let summary = inject_dbt_macros(&categorized)?;
    log::debug!(
        "Injected {} ref and {} source placeholders into {} files ({} missing)",
        summary.ref_substitutions,
        summary.source_substitutions,
        summary.files_rewritten,
        summary.files_missing
    );

    let ref_count: usize = categorized.iter().map(|c| c.refs.len()).sum();
    let source_count: usize = categorized.iter().map(|c| c.sources.len()).sum();
    log::info!(
        "Conversion complete. {} files processed. {} model refs, {} source refs found.",
        results.len(),
        ref_count,
        source_count
    );

    Ok(())
}

#[cfg(test)]
#[path = "convert_test.rs"]
mod tests;
