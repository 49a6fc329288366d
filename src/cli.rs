//! Minimal CLI: JSON → tree → (render | wire), wire → render
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde_json::Value;
use simplelog::LevelFilter;

use data_tree::DataStructureNode;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// load JSON/NDJSON documents as data trees and print their debug rendering or wire form
#[derive(Parser, Debug)]
#[command(name = "data-tree", version)]
pub struct CommandLineInterface {
    /// more logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the indented debug rendering of each document
    Render(RenderOut),
    /// write each document's lossless wire form, one per line
    Encode(EncodeOut),
    /// read wire-form lines back and print their debug rendering
    Decode(DecodeIn),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct RenderOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct EncodeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .ndjson file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct DecodeIn {
    /// wire-form files, one encoded tree per line; literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Every selected document, in input order.
    fn load_documents(&self) -> Result<Vec<Value>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let per_file = source_paths
            .par_iter()
            .map(|path| read_documents(path, self.ndjson))
            .collect::<Result<Vec<_>>>()?;

        let mut out = Vec::new();
        for (source_path, documents) in source_paths.iter().zip(per_file) {
            log::info!("{}: {} document(s)", source_path.display(), documents.len());
            for document in documents {
                let Some(document) = self.select(document, source_path)? else {
                    continue;
                };
                match self.jq_expr.as_ref() {
                    None => out.push(document),
                    Some(jq_expr) => {
                        let results = crate::jq_exec::run_jaq(jq_expr, &document).with_context(|| {
                            format!("failed to apply jq expression to {}", source_path.display())
                        })?;
                        out.extend(results);
                    }
                }
            }
        }
        Ok(out)
    }

    fn select(&self, document: Value, source_path: &Path) -> Result<Option<Value>> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Ok(Some(document));
        };
        match document.pointer(pointer) {
            Some(selected) => Ok(Some(selected.clone())),
            None => {
                log::warn!("{}: JSON pointer {pointer} selects nothing", source_path.display());
                Ok(None)
            }
        }
    }

    fn load_trees(&self) -> Result<Vec<DataStructureNode>> {
        let trees = self
            .load_documents()?
            .iter()
            .map(data_tree::json::from_json)
            .collect::<Vec<_>>();
        log::debug!("built {} tree(s)", trees.len());
        Ok(trees)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Render(target) => {
                let trees = target.input_settings.load_trees()?;
                let rendered = render_all(&trees);
                emit(target.out.as_deref(), &rendered)
            }
            Command::Encode(target) => {
                let trees = target.input_settings.load_trees()?;
                let mut lines = String::new();
                for tree in &trees {
                    lines.push_str(&data_tree::wire::to_string(tree)?);
                    lines.push('\n');
                }
                emit(target.out.as_deref(), &lines)
            }
            Command::Decode(target) => {
                let mut trees = Vec::new();
                for source_path in resolve_file_path_patterns(&target.input)? {
                    let source = std::fs::read_to_string(&source_path)
                        .with_context(|| format!("failed to read {}", source_path.display()))?;
                    for (number, line) in source.lines().enumerate() {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let tree = data_tree::wire::from_str_with_path(line).with_context(|| {
                            format!("failed to decode {}:{}", source_path.display(), number + 1)
                        })?;
                        trees.push(tree);
                    }
                }
                log::debug!("decoded {} tree(s)", trees.len());
                emit(target.out.as_deref(), &render_all(&trees))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_documents(source_path: &Path, ndjson: bool) -> Result<Vec<Value>> {
    let source = std::fs::read_to_string(source_path)
        .with_context(|| format!("failed to read source file {}", source_path.display()))?;
    if !ndjson {
        let value = serde_json::from_str::<Value>(&source)
            .with_context(|| format!("failed to parse JSON source file {}", source_path.display()))?;
        return Ok(vec![value]);
    }
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str::<Value>(line).with_context(|| {
                format!("failed to parse NDJSON line {}:{}", source_path.display(), number + 1)
            })
        })
        .collect()
}

fn render_all(trees: &[DataStructureNode]) -> String {
    let mut out = String::new();
    for tree in trees {
        out.push_str(&tree.render(0));
        out.push('\n');
    }
    out
}

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).map_err(|e| anyhow!("invalid glob pattern {pattern}: {e}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
