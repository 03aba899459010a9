//! Golden-file runner: renders `fixtures/<name>.json` for every
//! `fixtures/<name>.<lang>.expected` next to it and compares the text.
//! An optional `fixtures/<name>.config.json` supplies the rest of the config.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;

use json2type::Config;

static EXPECTED_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>[^.]+)\.(?P<lang>[^.]+)\.expected$").expect("static regex"));

#[derive(Parser, Debug)]
struct Args {
    /// fixture directory
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures"))]
    dir: PathBuf,

    /// overwrite expected files with the current output
    #[arg(long, default_value_t = false)]
    bless: bool,

    /// only run fixtures whose name contains this
    filter: Option<String>,
}

#[derive(Debug)]
struct Case {
    name: String,
    lang: String,
    expected: PathBuf,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mut failures = 0;
    let cases = collect_cases(&args.dir)?;
    let selected = select(&cases, args.filter.as_deref());
    for case in &selected {
        let label = format!("{} [{}]", case.name, case.lang);
        let actual = render_case(&args.dir, case).with_context(|| format!("fixture {label}"))?;
        let expected = std::fs::read_to_string(&case.expected)
            .with_context(|| format!("failed to read {}", case.expected.display()))?;
        if actual == expected {
            println!("{} {label}", "ok".green());
        } else if args.bless {
            std::fs::write(&case.expected, &actual)?;
            println!("{} {label}", "blessed".yellow());
        } else {
            failures += 1;
            println!("{} {label}", "FAIL".red().bold());
            print_first_difference(&expected, &actual);
        }
    }
    println!("{} fixtures, {failures} failed", selected.len());
    Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn collect_cases(dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(caps) = EXPECTED_FILE.captures(file_name) else {
            continue;
        };
        cases.push(Case {
            name: caps["name"].to_string(),
            lang: caps["lang"].to_string(),
            expected: path.clone(),
        });
    }
    cases.sort_by(|a, b| a.expected.cmp(&b.expected));
    Ok(cases)
}

fn select<'a>(cases: &'a [Case], filter: Option<&str>) -> Vec<&'a Case> {
    cases
        .iter()
        .filter(|case| filter.is_none_or(|f| case.name.contains(f)))
        .collect()
}

fn render_case(dir: &Path, case: &Case) -> Result<String> {
    let sample_path = dir.join(format!("{}.json", case.name));
    let source = std::fs::read_to_string(&sample_path)
        .with_context(|| format!("failed to read {}", sample_path.display()))?;
    let sample: serde_json::Value = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse {}", sample_path.display()))?;

    let config_path = dir.join(format!("{}.config.json", case.name));
    let config = if config_path.exists() {
        Config::from_json_str(&std::fs::read_to_string(&config_path)?)?
    } else {
        Config::default()
    };
    let config = config.target_language(case.lang.clone());

    let conversion = json2type::convert(&sample, &config)?;
    for warning in &conversion.warnings {
        println!("  {} {warning}", "warning:".yellow());
    }
    Ok(conversion.output)
}

fn print_first_difference(expected: &str, actual: &str) {
    let mut exp = expected.lines();
    let mut act = actual.lines();
    for line_no in 1.. {
        match (exp.next(), act.next()) {
            (None, None) => break,
            (e, a) if e == a => continue,
            (e, a) => {
                println!("  line {line_no}:");
                println!("  {} {}", "-".red(), e.unwrap_or("<end of file>"));
                println!("  {} {}", "+".green(), a.unwrap_or("<end of file>"));
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, lang: &str) -> Case {
        Case {
            name: name.to_string(),
            lang: lang.to_string(),
            expected: PathBuf::from(format!("{name}.{lang}.expected")),
        }
    }

    #[test]
    fn filter_selects_by_fixture_name() {
        let cases = [case("catalog", "python"), case("catalog", "rust"), case("feed", "typescript")];
        assert_eq!(select(&cases, None).len(), 3);
        let names: Vec<_> = select(&cases, Some("cat")).iter().map(|c| c.lang.as_str()).collect();
        assert_eq!(names, ["python", "rust"]);
        assert!(select(&cases, Some("nope")).is_empty());
    }

    #[test]
    fn expected_file_names_carry_name_and_language() {
        let caps = EXPECTED_FILE.captures("orders.csharp.expected").unwrap();
        assert_eq!(&caps["name"], "orders");
        assert_eq!(&caps["lang"], "csharp");
        assert!(EXPECTED_FILE.captures("orders.config.json").is_none());
    }
}
