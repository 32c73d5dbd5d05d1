use arbor_core::{load_credential_graph, load_vine_graph};
use arbor_discover::cache::CourseCache;
use arbor_discover::catalog::CatalogCourse;
use arbor_discover::estimate::estimate_duration_weeks;
use arbor_discover::matching::{LadderStrategy, MatchRule, MatchStrategy};
use arbor_discover::prereq::{suggest_prereqs, OpenAiCompatibleModel, PrereqSuggestion};
use arbor_discover::scrape::{CatalogSource, ScrapeReport, Scraper};
use arbor_layout::engine::LayeredEngine;
use arbor_layout::viewport::Viewport;
use arbor_render::credential::{layout_credential_diagram, CredentialLayoutOptions};
use arbor_render::svg::{
    render_credential_svg, render_placeholder_svg, render_vine_svg, SvgRenderOptions,
};
use arbor_render::vine::{layout_vine_diagram, VineLayoutOptions};
use arbor_render::Interaction;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(arbor_core::Error),
    Render(arbor_render::Error),
    Discover(arbor_discover::Error),
    Json(serde_json::Error),
    NoCourses,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Discover(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoCourses => {
                write!(f, "no cached courses; run `arbor-cli fetch` first")
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<arbor_core::Error> for CliError {
    fn from(value: arbor_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<arbor_render::Error> for CliError {
    fn from(value: arbor_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<arbor_discover::Error> for CliError {
    fn from(value: arbor_discover::Error) -> Self {
        Self::Discover(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Fetch,
    Estimate,
    Match,
    Suggest,
}

#[derive(Debug, Clone, Copy, Default)]
enum DiagramKind {
    #[default]
    Vine,
    Credentials,
}

impl FromStr for DiagramKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vine" | "vines" => Ok(Self::Vine),
            "credentials" | "credential" => Ok(Self::Credentials),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    diagram: DiagramKind,
    pretty: bool,
    refresh: bool,
    limit: Option<usize>,
    viewport_width: f64,
    viewport_height: f64,
    cache_dir: String,
    source: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "arbor-cli\n\
\n\
USAGE:\n\
  arbor-cli [render] [--diagram vine|credentials] [--viewport-width <w>] [--viewport-height <h>] [--out <path>] [<data-path>]\n\
  arbor-cli fetch [--source khan-academy|mit-ocw] [--refresh] [--cache-dir <dir>]\n\
  arbor-cli estimate [--limit <n>] [--pretty] [<credentials-path>]\n\
  arbor-cli match [--source <name>] [--cache-dir <dir>] [--limit <n>] [--pretty] [<credentials-path>]\n\
  arbor-cli suggest [--source <name>] [--cache-dir <dir>] [--limit <n>] [--out <path>]\n\
\n\
NOTES:\n\
  - Data paths default to vines.json / credentials.json, resolved through the\n\
    standard data-directory fallbacks.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - fetch caches each source under --cache-dir (default .arbor-cache);\n\
    --refresh ignores an existing cache.\n\
  - suggest writes JSON suggestions to --out (default arbor-suggestions.json).\n\
    Set ARBOR_MODEL_URL / ARBOR_MODEL_KEY / ARBOR_MODEL to enable the\n\
    model-backed rung; otherwise only explicit and rule suggestions run.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        viewport_width: 800.0,
        viewport_height: 600.0,
        cache_dir: ".arbor-cache".to_string(),
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "fetch" => args.command = Command::Fetch,
            "estimate" => args.command = Command::Estimate,
            "match" => args.command = Command::Match,
            "suggest" => args.command = Command::Suggest,
            "--pretty" => args.pretty = true,
            "--refresh" => args.refresh = true,
            "--diagram" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram = kind
                    .parse::<DiagramKind>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width = w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height = h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--limit" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.limit = Some(n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--cache-dir" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.cache_dir = dir.clone();
            }
            "--source" => {
                let Some(source) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.source = Some(source.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn selected_sources(source: Option<&str>) -> Result<Vec<CatalogSource>, CliError> {
    match source {
        None => Ok(CatalogSource::ALL.to_vec()),
        Some(name) => CatalogSource::from_name(name)
            .map(|s| vec![s])
            .ok_or(CliError::Usage(usage())),
    }
}

/// All cached courses for the selected sources, in source order.
fn cached_courses(
    cache: &CourseCache,
    sources: &[CatalogSource],
) -> Result<Vec<CatalogCourse>, CliError> {
    let mut courses = Vec::new();
    for source in sources {
        if let Some(file) = cache.load(source.name()).map_err(CliError::Discover)? {
            courses.extend(file.courses);
        }
    }
    if courses.is_empty() {
        return Err(CliError::NoCourses);
    }
    Ok(courses)
}

fn render_command(args: &Args) -> Result<(), CliError> {
    let options = SvgRenderOptions::default();
    let interaction = Interaction::new();

    let svg = match args.diagram {
        DiagramKind::Vine => {
            let path = args.input.as_deref().unwrap_or("vines.json");
            let graph = load_vine_graph(path)?;
            let layout = layout_vine_diagram(
                &graph,
                &VineLayoutOptions {
                    viewport_width: args.viewport_width,
                    viewport_height: args.viewport_height,
                    ..Default::default()
                },
            )?;
            let mut viewport = Viewport::new(args.viewport_width, args.viewport_height);
            viewport.zoom_to_fit(layout.bounds);
            render_vine_svg(&layout, Some(&viewport), &interaction, &options)
        }
        DiagramKind::Credentials => {
            let path = args.input.as_deref().unwrap_or("credentials.json");
            let graph = load_credential_graph(path)?;
            let layout = layout_credential_diagram(
                &graph,
                &LayeredEngine,
                &CredentialLayoutOptions::with_viewport(args.viewport_width, args.viewport_height),
            )?;
            match layout {
                Some(layout) => {
                    let mut viewport = Viewport::new(args.viewport_width, args.viewport_height);
                    viewport.zoom_to_fit(layout.bounds);
                    render_credential_svg(&layout, Some(&viewport), &interaction, &options)
                }
                None => render_placeholder_svg(
                    "layout unavailable",
                    args.viewport_width,
                    args.viewport_height,
                ),
            }
        }
    };

    write_text(&svg, args.out.as_deref())
}

#[derive(Serialize)]
struct FetchRow {
    source: &'static str,
    courses: usize,
    skipped: usize,
    multidisciplinary: usize,
    from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Turns one fetch result into a report row, caching successes. A failed
/// source is reported in place, never fatal to the run.
fn fetch_result_row(
    cache: &CourseCache,
    source: CatalogSource,
    result: arbor_discover::Result<(Vec<CatalogCourse>, ScrapeReport)>,
) -> Result<FetchRow, CliError> {
    match result {
        Ok((courses, report)) => {
            cache
                .store(source.name(), &courses)
                .map_err(CliError::Discover)?;
            Ok(FetchRow {
                source: source.name(),
                courses: report.fetched,
                skipped: report.skipped,
                multidisciplinary: report.multidisciplinary,
                from_cache: false,
                error: None,
            })
        }
        Err(err) => Ok(FetchRow {
            source: source.name(),
            courses: 0,
            skipped: 0,
            multidisciplinary: 0,
            from_cache: false,
            error: Some(err.to_string()),
        }),
    }
}

async fn fetch_command(args: &Args) -> Result<(), CliError> {
    let cache = CourseCache::new(&args.cache_dir);
    let mut rows = Vec::new();
    let mut to_fetch = Vec::new();

    for source in selected_sources(args.source.as_deref())? {
        if !args.refresh {
            if let Some(file) = cache.load(source.name()).map_err(CliError::Discover)? {
                rows.push(FetchRow {
                    source: source.name(),
                    courses: file.courses.len(),
                    skipped: 0,
                    multidisciplinary: file
                        .courses
                        .iter()
                        .filter(|c| c.multidisciplinary)
                        .count(),
                    from_cache: true,
                    error: None,
                });
                continue;
            }
        }
        to_fetch.push(source);
    }

    let scraper = Scraper::new();
    for (source, result) in scraper.fetch_many(&to_fetch).await {
        rows.push(fetch_result_row(&cache, source, result)?);
    }

    write_json(&rows, args.pretty)
}

#[derive(Serialize)]
struct EstimateRow<'a> {
    id: &'a str,
    title: &'a str,
    current_weeks: u32,
    estimated_weeks: u32,
}

fn estimate_command(args: &Args) -> Result<(), CliError> {
    let path = args.input.as_deref().unwrap_or("credentials.json");
    let graph = load_credential_graph(path)?;

    let mut rows: Vec<EstimateRow<'_>> = graph
        .credentials()
        .iter()
        .map(|c| EstimateRow {
            id: &c.id,
            title: &c.title,
            current_weeks: c.duration_weeks,
            estimated_weeks: estimate_duration_weeks(c.cadence, c.level, &c.category, &c.title),
        })
        .collect();
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    write_json(&rows, args.pretty)
}

fn rule_name(rule: MatchRule) -> &'static str {
    match rule {
        MatchRule::ExactTitle => "exact_title",
        MatchRule::WordOverlap => "word_overlap",
        MatchRule::CategoryLevel => "category_level",
    }
}

#[derive(Serialize)]
struct MatchRow<'a> {
    course_id: &'a str,
    course_title: &'a str,
    credential_id: Option<String>,
    confidence: Option<f64>,
    rule: Option<&'static str>,
}

fn match_command(args: &Args) -> Result<(), CliError> {
    let path = args.input.as_deref().unwrap_or("credentials.json");
    let graph = load_credential_graph(path)?;
    let cache = CourseCache::new(&args.cache_dir);
    let mut courses = cached_courses(&cache, &selected_sources(args.source.as_deref())?)?;
    if let Some(limit) = args.limit {
        courses.truncate(limit);
    }

    let rows: Vec<MatchRow<'_>> = courses
        .iter()
        .map(|course| match LadderStrategy.matches(course, graph.credentials()) {
            Some(outcome) => MatchRow {
                course_id: &course.course_id,
                course_title: &course.title,
                credential_id: Some(outcome.credential_id),
                confidence: Some(outcome.confidence),
                rule: Some(rule_name(outcome.rule)),
            },
            None => MatchRow {
                course_id: &course.course_id,
                course_title: &course.title,
                credential_id: None,
                confidence: None,
                rule: None,
            },
        })
        .collect();

    write_json(&rows, args.pretty)
}

fn model_from_env() -> Option<OpenAiCompatibleModel> {
    let base_url = std::env::var("ARBOR_MODEL_URL").ok()?;
    let api_key = std::env::var("ARBOR_MODEL_KEY").ok()?;
    let model = std::env::var("ARBOR_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
    Some(OpenAiCompatibleModel::new(base_url, api_key, model))
}

async fn suggest_command(args: &Args) -> Result<(), CliError> {
    let cache = CourseCache::new(&args.cache_dir);
    let mut courses = cached_courses(&cache, &selected_sources(args.source.as_deref())?)?;
    if let Some(limit) = args.limit {
        courses.truncate(limit);
    }

    let model = model_from_env();
    let mut suggestions: Vec<PrereqSuggestion> = Vec::new();
    for course in &courses {
        suggestions.extend(suggest_prereqs(course, model.as_ref()).await);
    }

    let out = args.out.as_deref().unwrap_or("arbor-suggestions.json");
    let text = serde_json::to_string_pretty(&suggestions)?;
    std::fs::write(out, text)?;
    eprintln!(
        "{} suggestions for {} courses written to {out}",
        suggestions.len(),
        courses.len()
    );
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Render => render_command(&args),
        Command::Estimate => estimate_command(&args),
        Command::Match => match_command(&args),
        Command::Fetch => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(fetch_command(&args))
        }
        Command::Suggest => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(suggest_command(&args))
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_source_becomes_a_row_instead_of_aborting() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CourseCache::new(dir.path());

        let ok = fetch_result_row(
            &cache,
            CatalogSource::KhanAcademy,
            Ok((
                vec![CatalogCourse::new("m1", "Counting", "https://x/m1")],
                ScrapeReport {
                    fetched: 1,
                    skipped: 0,
                    multidisciplinary: 0,
                },
            )),
        )
        .unwrap();
        assert_eq!(ok.courses, 1);
        assert!(ok.error.is_none());
        // The success landed in the cache.
        assert!(cache.load("khan-academy").unwrap().is_some());

        let failed = fetch_result_row(
            &cache,
            CatalogSource::MitOcw,
            Err(arbor_discover::Error::EmptyReply),
        )
        .unwrap();
        assert_eq!(failed.source, "mit-ocw");
        assert_eq!(failed.courses, 0);
        assert!(failed.error.is_some());
    }
}
