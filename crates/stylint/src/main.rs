//! stylint - A fast stylistic JavaScript/JSX linter with auto-fix support.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use stylint_config::{ConfigError, ConfigLoader, MergedConfig, OverlayConfig};
use stylint_diagnostics::{Applicability, Edit, Fix};
use stylint_js_cst::{CstNode, TreeWalker};
use stylint_js_parser::JsParser;
use stylint_linter::{CheckContext, LintResult, Rule, RuleRegistry, SuppressionContext};
use stylint_text_size::Ranged;
use walkdir::WalkDir;

/// Fix passes are re-run until the source converges.
const MAX_FIX_PASSES: usize = 10;

const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

#[derive(Parser)]
#[command(name = "stylint")]
#[command(about = "A fast stylistic JavaScript/JSX linter with auto-fix support", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files for violations
    Check {
        /// Paths to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Path to the rules file (.stylintrc.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Fix violations in files
    Fix {
        /// Paths to fix
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Path to the rules file (.stylintrc.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show diff without applying fixes
        #[arg(long)]
        diff: bool,

        /// Apply unsafe fixes
        #[arg(long)]
        r#unsafe: bool,
    },
}

/// A rule instance paired with its fix eligibility from the overlay.
struct ConfiguredInstance {
    rule: Box<dyn Rule>,
    should_fix: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { paths, config } => run_check(&paths, config.as_deref()),
        Commands::Fix {
            paths,
            config,
            diff,
            r#unsafe: allow_unsafe,
        } => run_fix(&paths, config.as_deref(), diff, allow_unsafe),
    }
}

/// Run the check command.
fn run_check(paths: &[PathBuf], config_path: Option<&Path>) -> Result<()> {
    let (instances, _) = load_rules(config_path)?;

    if instances.is_empty() {
        eprintln!("{}", "Warning: No rules configured".yellow());
    } else {
        let rule_names: Vec<_> = instances.iter().map(|i| i.rule.name()).collect();
        eprintln!(
            "Checking with {} rule(s): {}",
            rule_names.len(),
            rule_names.join(", ")
        );
    }

    let files = collect_js_files(paths);
    let reports: Vec<Result<FileReport>> = files
        .par_iter()
        .map(|path| check_file(path, &instances))
        .collect();

    let mut total_violations = 0;
    let mut total_fixable = 0;

    for report in reports {
        let report = report?;
        for line in &report.lines {
            println!("{line}");
        }
        total_violations += report.violations;
        total_fixable += report.fixable;
    }

    if total_violations > 0 {
        println!(
            "\nFound {} violations ({} fixable)",
            total_violations.to_string().red(),
            total_fixable.to_string().yellow()
        );
        std::process::exit(1);
    }
    println!("{}", "No violations found".green());

    Ok(())
}

/// Run the fix command.
fn run_fix(
    paths: &[PathBuf],
    config_path: Option<&Path>,
    diff_only: bool,
    allow_unsafe: bool,
) -> Result<()> {
    let (instances, merged_config) = load_rules(config_path)?;

    if instances.is_empty() {
        eprintln!("{}", "Warning: No rules configured".yellow());
        return Ok(());
    }

    let rule_names: Vec<_> = instances.iter().map(|i| i.rule.name()).collect();
    eprintln!(
        "Fixing with {} rule(s): {}",
        rule_names.len(),
        rule_names.join(", ")
    );

    let unsafe_fixes = allow_unsafe
        || merged_config
            .as_ref()
            .is_some_and(|config| config.unsafe_fixes);
    let applicability = if unsafe_fixes {
        Applicability::Unsafe
    } else {
        Applicability::Safe
    };

    let mut total_fixed = 0;
    let mut total_unfixable = 0;
    let mut files_changed = 0;

    for path in collect_js_files(paths) {
        let (fixed, unfixable, changed) =
            fix_file(&path, &instances, applicability, diff_only)?;
        total_fixed += fixed;
        total_unfixable += unfixable;
        if changed {
            files_changed += 1;
        }
    }

    if diff_only {
        println!(
            "\n{} fix(es) available in {} file(s)",
            total_fixed.to_string().green(),
            files_changed
        );
    } else if total_fixed > 0 {
        println!(
            "\n{} fix(es) applied in {} file(s)",
            total_fixed.to_string().green(),
            files_changed
        );
    } else {
        println!("{}", "No fixes to apply".green());
    }

    if total_unfixable > 0 {
        eprintln!(
            "{} violation(s) could not be fixed automatically",
            total_unfixable.to_string().yellow()
        );
    }

    Ok(())
}

/// Per-file check output, rendered up front so files can run in parallel.
struct FileReport {
    lines: Vec<String>,
    violations: usize,
    fixable: usize,
}

fn check_file(path: &PathBuf, instances: &[ConfiguredInstance]) -> Result<FileReport> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut report = FileReport {
        lines: Vec::new(),
        violations: 0,
        fixable: 0,
    };

    let Some(result) = lint_source(&source, instances, |_| true) else {
        eprintln!("{}: Failed to parse", path.display());
        return Ok(report);
    };

    let ctx = CheckContext::new(&source);
    report.fixable = result.fixable().count();
    for entry in &result.diagnostics {
        report.violations += 1;

        let loc = ctx
            .source_code()
            .line_column(entry.diagnostic.range.start());
        report.lines.push(format!(
            "{}:{}:{}: {} {}",
            path.display(),
            loc.line.get(),
            loc.column.get(),
            format!("[{}]", entry.rule).blue(),
            entry.diagnostic.kind.body
        ));
    }

    Ok(report)
}

/// Fix violations in a single file, re-linting until the output converges.
fn fix_file(
    path: &PathBuf,
    instances: &[ConfiguredInstance],
    applicability: Applicability,
    diff_only: bool,
) -> Result<(usize, usize, bool)> {
    let original = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut source = original.clone();
    let mut total_applied = 0;
    let mut unfixable = 0;

    for pass in 0..MAX_FIX_PASSES {
        let Some(result) = lint_source(&source, instances, |i| i.should_fix) else {
            if pass == 0 {
                eprintln!("{}: Failed to parse", path.display());
                return Ok((0, 0, false));
            }
            break;
        };

        let mut fixes: Vec<&Fix> = Vec::new();
        for entry in &result.diagnostics {
            match &entry.diagnostic.fix {
                Some(fix) if fix.applies(applicability) => fixes.push(fix),
                _ => {
                    if pass == 0 {
                        unfixable += 1;
                    }
                }
            }
        }

        let (edits, applied) = select_fixes(fixes);
        if edits.is_empty() {
            break;
        }

        source = apply_edits(&source, &edits);
        total_applied += applied;
    }

    let changed = source != original;
    if !changed {
        return Ok((0, unfixable, false));
    }

    if diff_only {
        print_diff(path, &original, &source);
    } else {
        std::fs::write(path, &source)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("{}: {} fix(es) applied", path.display(), total_applied);
    }

    Ok((total_applied, unfixable, true))
}

/// Parse and lint one source text, returning unsuppressed diagnostics in
/// source order. Returns None when the parser fails outright.
fn lint_source(
    source: &str,
    instances: &[ConfiguredInstance],
    include: impl Fn(&ConfiguredInstance) -> bool,
) -> Option<LintResult> {
    let mut parser = JsParser::new();
    let parsed = parser.parse(source)?;

    let ctx = CheckContext::new(source);
    let suppression_ctx = SuppressionContext::from_source(source);
    let root = CstNode::new(parsed.tree.root_node(), source);

    let mut result = LintResult::new();
    for node in TreeWalker::new(root.inner(), source) {
        for instance in instances.iter().filter(|i| include(i)) {
            let kinds = instance.rule.relevant_kinds();
            if !kinds.is_empty() && !kinds.contains(&node.kind()) {
                continue;
            }
            for diagnostic in instance.rule.check(&ctx, &node) {
                if !suppression_ctx.is_suppressed(instance.rule.name(), diagnostic.range.start()) {
                    result.push(instance.rule.name(), diagnostic);
                }
            }
        }
    }

    result.sort();
    Some(result)
}

/// Pick a non-conflicting subset of fixes and flatten their edits.
///
/// A fix is taken or skipped whole; dropping one edit of a multi-edit fix
/// (a swap, say) would corrupt the output. Skipped fixes surface again on
/// the next pass. Returned edits are sorted descending by start.
fn select_fixes(mut fixes: Vec<&Fix>) -> (Vec<Edit>, usize) {
    fixes.sort_by_key(|f| std::cmp::Reverse(f.min_start()));

    let mut accepted: Vec<Edit> = Vec::new();
    let mut applied = 0;
    for fix in fixes {
        let conflicts = fix
            .edits()
            .iter()
            .any(|edit| accepted.iter().any(|existing| edits_overlap(edit, existing)));
        if !conflicts {
            accepted.extend(fix.edits().iter().cloned());
            applied += 1;
        }
    }

    accepted.sort_by_key(|e| std::cmp::Reverse(e.start()));
    (accepted, applied)
}

fn edits_overlap(a: &Edit, b: &Edit) -> bool {
    a.start() < b.end() && b.start() < a.end()
}

/// Apply edits to source text. Edits must be sorted descending by start.
fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut result = source.to_string();
    for edit in edits {
        let start = usize::from(edit.start());
        let end = usize::from(edit.end());
        result.replace_range(start..end, edit.content().unwrap_or(""));
    }
    result
}

/// Print a unified diff between original and fixed source.
///
/// Hunks carry no context lines; changed runs are reported individually.
fn print_diff(path: &Path, original: &str, fixed: &str) {
    use std::fmt::Write;

    let original_lines: Vec<&str> = original.lines().collect();
    let fixed_lines: Vec<&str> = fixed.lines().collect();

    let mut output = String::new();
    writeln!(output, "--- a/{}", path.display()).unwrap();
    writeln!(output, "+++ b/{}", path.display()).unwrap();

    let mut i = 0;
    let mut j = 0;
    while i < original_lines.len() || j < fixed_lines.len() {
        if original_lines.get(i) == fixed_lines.get(j) {
            i += 1;
            j += 1;
            continue;
        }

        // A changed run ends where both sides realign on an equal line.
        let (run_i, run_j) = find_realignment(&original_lines[i..], &fixed_lines[j..]);
        writeln!(output, "@@ -{},{} +{},{} @@", i + 1, run_i, j + 1, run_j).unwrap();
        for line in &original_lines[i..i + run_i] {
            writeln!(output, "{}{}", "-".red(), line).unwrap();
        }
        for line in &fixed_lines[j..j + run_j] {
            writeln!(output, "{}{}", "+".green(), line).unwrap();
        }
        i += run_i;
        j += run_j;
    }

    print!("{output}");
}

/// Shortest pair of prefixes after which both line slices share a line.
fn find_realignment(original: &[&str], fixed: &[&str]) -> (usize, usize) {
    for total in 1..=(original.len() + fixed.len()) {
        for take_orig in 0..=total.min(original.len()) {
            let take_fixed = total - take_orig;
            if take_fixed > fixed.len() {
                continue;
            }
            match (original.get(take_orig), fixed.get(take_fixed)) {
                (Some(o), Some(f)) if o == f => return (take_orig, take_fixed),
                (None, None) => return (take_orig, take_fixed),
                _ => {}
            }
        }
    }
    (original.len(), fixed.len())
}

/// Load rules from configuration or use defaults.
fn load_rules(
    config_path: Option<&Path>,
) -> Result<(Vec<ConfiguredInstance>, Option<MergedConfig>)> {
    let registry = RuleRegistry::builtin();

    let merged_config = match load_config(config_path) {
        Ok(config) => Some(config),
        Err(ConfigError::NoConfig) => None,
        Err(err) => return Err(err.into()),
    };

    let instances: Vec<ConfiguredInstance> = match &merged_config {
        Some(config) => config
            .enabled_rules()
            .filter_map(|configured| {
                let rule = registry.create_rule(&configured.name, &configured.options);
                if rule.is_none() {
                    eprintln!(
                        "{}: Unknown rule '{}', skipping",
                        "Warning".yellow(),
                        configured.name
                    );
                }
                rule.map(|rule| ConfiguredInstance {
                    rule,
                    should_fix: configured.should_fix(),
                })
            })
            .collect(),
        None => {
            eprintln!(
                "{}",
                "No .stylintrc.json found, using default indent rule".yellow()
            );
            vec![ConfiguredInstance {
                rule: Box::new(stylint_linter::rules::Indent::default()),
                should_fix: true,
            }]
        }
    };

    Ok((instances, merged_config))
}

/// Load merged configuration from files.
fn load_config(config_path: Option<&Path>) -> Result<MergedConfig, ConfigError> {
    let overlay_path = find_overlay_path();
    let overlay = overlay_path
        .as_deref()
        .and_then(|path| OverlayConfig::from_file(path).ok());
    if overlay.is_some() {
        if let Some(path) = &overlay_path {
            eprintln!("Loaded stylint.toml from: {}", path.display());
        }
    }

    let mut loader = ConfigLoader::new();
    if let Some(path) = &overlay_path {
        loader = loader.overlay(path);
    }
    loader = match config_path {
        Some(path) => loader.rc(path),
        None => loader.find_rc(overlay.as_ref()),
    };

    loader.load()
}

/// Find stylint.toml in common locations.
fn find_overlay_path() -> Option<PathBuf> {
    let candidates = ["stylint.toml", ".stylint.toml", "config/stylint.toml"];
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

fn collect_js_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() && has_js_extension(path) {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && has_js_extension(e.path()))
            {
                files.push(entry.path().to_path_buf());
            }
        }
    }
    files
}

fn has_js_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| JS_EXTENSIONS.contains(&ext))
}
