//! CLI: JSON samples → type declarations (or the raw inferred graph).
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use json2type::{codegen, Config, DeclarationKind, NamingConvention, NestedTypeStyle};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer types from JSON/NDJSON samples and emit C#, TypeScript, Python or Rust declarations
#[derive(Parser, Debug)]
#[command(name = "json2type", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and emit type declarations for a target language
    Convert(ConvertOut),
    /// infer and print the unnamed type graph as JSON
    Graph(GraphOut),
    /// list target languages and their aliases
    Languages,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is a sample
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths, quoted glob patterns or '-' for stdin.
    /// Reads stdin when omitted and stdin is piped.
    #[arg(long, short, num_args = 1..)]
    input: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OptionalAs {
    /// `T?` / `T | null` / `Option<T>`
    Nullable,
    /// omittable member where the target has one (`key?: T`, serde `default`)
    Omitted,
}

#[derive(clap::Parser, Debug)]
struct ConvertOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// target language (csharp, typescript, python, rust or an alias)
    #[arg(long)]
    lang: Option<String>,

    /// name of the top-level type
    #[arg(long)]
    root_name: Option<String>,

    #[arg(long, value_enum)]
    naming: Option<NamingConvention>,

    #[arg(long, value_enum)]
    nested: Option<NestedTypeStyle>,

    #[arg(long, value_enum)]
    optional_as: Option<OptionalAs>,

    /// C# declaration keyword
    #[arg(long, value_enum)]
    declaration: Option<DeclarationKind>,

    /// structurally identical objects share one declaration
    #[arg(long, default_value_t = false)]
    share_identical_types: bool,

    /// exit non-zero if any key had to be renamed
    #[arg(long, default_value_t = false)]
    deny_warnings: bool,
}

#[derive(clap::Parser, Debug)]
struct GraphOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    fn label(&self) -> String {
        match self {
            Source::Stdin => "<stdin>".to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            Source::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
                Ok(buf)
            }
            Source::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read source file {}", path.display())),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn sources(&self) -> Result<Vec<Source>> {
        if self.input.is_empty() {
            if std::io::stdin().is_terminal() {
                bail!("no input given: pass --input <path> or pipe JSON on stdin");
            }
            return Ok(vec![Source::Stdin]);
        }
        resolve_file_path_patterns(&self.input)
    }

    /// Every sample, in input order. Files are read and parsed in parallel.
    fn load(&self) -> Result<Vec<Value>> {
        let sources = self.sources()?;
        let parsed = sources
            .par_iter()
            .map(|source| {
                let text = source.read()?;
                parse_documents(&text, self.ndjson, &source.label())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut samples = Vec::new();
        for (source, docs) in sources.iter().zip(parsed) {
            for doc in docs {
                self.process(doc, source, &mut samples)?;
            }
        }
        tracing::debug!(sources = sources.len(), samples = samples.len(), "loaded input");
        if samples.is_empty() {
            bail!("no JSON documents found in input");
        }
        Ok(samples)
    }

    fn process(&self, doc: Value, source: &Source, samples: &mut Vec<Value>) -> Result<()> {
        let doc = match self.json_pointer.as_deref() {
            None => doc,
            Some(pointer) => match doc.pointer(pointer) {
                Some(node) => node.clone(),
                None => bail!("json pointer {pointer} selects nothing in {}", source.label()),
            },
        };
        match self.jq_expr.as_deref() {
            None => samples.push(doc),
            Some(jq_expr) => {
                let outputs = crate::jq_exec::run_jaq(jq_expr, &doc).with_context(|| {
                    format!("failed to apply jq expression to {}", source.label())
                })?;
                samples.extend(outputs);
            }
        }
        Ok(())
    }
}

impl ConvertOut {
    fn config(&self) -> Result<Config> {
        let mut config = match self.config.as_ref() {
            None => Config::default(),
            Some(path) => {
                let src = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Config::from_json_str(&src)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
        };
        if let Some(lang) = &self.lang {
            config.target_language = lang.clone();
        }
        if let Some(root_name) = &self.root_name {
            config.root_name = root_name.clone();
        }
        if let Some(naming) = self.naming {
            config.naming_convention = naming;
        }
        if let Some(nested) = self.nested {
            config.nested_type_style = nested;
        }
        if let Some(optional_as) = self.optional_as {
            config.emit_optional_as_nullable = optional_as == OptionalAs::Nullable;
        }
        if let Some(declaration) = self.declaration {
            config.declaration_kind = declaration;
        }
        if self.share_identical_types {
            config.share_identical_types = true;
        }
        Ok(config)
    }

    fn run(&self) -> Result<()> {
        let config = self.config()?;
        json2type::check_config(&config)?;

        let samples = self.input_settings.load()?;
        let conversion = json2type::convert_all(samples.iter(), &config)?;
        for warning in &conversion.warnings {
            eprintln!("{} {warning}", "warning:".yellow().bold());
        }
        if self.deny_warnings && !conversion.warnings.is_empty() {
            bail!("{} naming warning(s) and --deny-warnings is set", conversion.warnings.len());
        }
        write_output(self.out.as_deref(), &conversion.output)
    }
}

impl GraphOut {
    fn run(&self) -> Result<()> {
        let samples = self.input_settings.load()?;
        let graph = json2type::inference::infer_from_values(samples.iter());
        let mut src = serde_json::to_string_pretty(&graph)?;
        src.push('\n');
        write_output(self.out.as_deref(), &src)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Convert(target) => target.run(),
            Command::Graph(target) => target.run(),
            Command::Languages => {
                for backend in codegen::backends() {
                    println!("{:<12}{}", backend.name(), backend.aliases().join(", "));
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_documents(text: &str, ndjson: bool, label: &str) -> Result<Vec<Value>> {
    if !ndjson {
        let doc = serde_json::from_str(text).with_context(|| format!("failed to parse JSON in {label}"))?;
        return Ok(vec![doc]);
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(ix, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("failed to parse JSON on line {} of {label}", ix + 1))
        })
        .collect()
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    let Some(out) = out else {
        print!("{text}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<Source>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if pattern == "-" {
            out.push(Source::Stdin);
        } else if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(Source::File(entry?));
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(Source::File(PathBuf::from(pattern)));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert_args(args: &[&str]) -> ConvertOut {
        let cli = CommandLineInterface::try_parse_from(
            ["json2type", "convert"].iter().chain(args).copied(),
        )
        .unwrap();
        match cli.cmd {
            Command::Convert(target) => target,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let target = convert_args(&[
            "-i", "a.json", "--lang", "ts", "--naming", "snake", "--nested", "inline",
            "--optional-as", "omitted", "--root-name", "Payload",
        ]);
        let config = target.config().unwrap();
        assert_eq!(config.target_language, "ts");
        assert_eq!(config.naming_convention, NamingConvention::SnakeCase);
        assert_eq!(config.nested_type_style, NestedTypeStyle::Inline);
        assert!(!config.emit_optional_as_nullable);
        assert_eq!(config.root_name, "Payload");
        assert_eq!(config.declaration_kind, DeclarationKind::Class);
    }

    #[test]
    fn ndjson_skips_blank_lines() {
        let docs = parse_documents("{\"a\": 1}\n\n{\"a\": 2}\n", true, "t").unwrap();
        assert_eq!(docs, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[test]
    fn ndjson_errors_name_the_line() {
        let err = parse_documents("{}\n{oops\n", true, "t.ndjson").unwrap_err();
        assert_eq!(err.to_string(), "failed to parse JSON on line 2 of t.ndjson");
    }

    #[test]
    fn dash_means_stdin() {
        let sources = resolve_file_path_patterns(["-", "x.json"]).unwrap();
        assert_eq!(sources, vec![Source::Stdin, Source::File(PathBuf::from("x.json"))]);
    }

    #[test]
    fn json_pointer_selects_the_sample() {
        let settings = InputSettings {
            ndjson: false,
            json_pointer: Some("/data/0".to_string()),
            jq_expr: None,
            input: Vec::new(),
        };
        let mut samples = Vec::new();
        let doc = json!({"data": [{"a": 1}]});
        settings.process(doc, &Source::Stdin, &mut samples).unwrap();
        assert_eq!(samples, vec![json!({"a": 1})]);
        assert!(settings.process(json!({}), &Source::Stdin, &mut samples).is_err());
    }
}
