//! Batch scanning of URL lists.
//!
//! Reads one URL per line (blank lines and `#` comments are skipped),
//! analyzes each with a shared scorer, and renders the report.
//!
//! Output formats: JSON (full report), CSV (one row per URL), summary (text table).

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ensemble::EnsembleScorer;
use crate::noise::NoiseSource;
use crate::scores::ModelScores;
use crate::verdict::Verdict;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Output format for a batch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    Json,
    Csv,
    #[default]
    Summary,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "summary" => Ok(Self::Summary),
            other => Err(format!("unknown format '{other}' (expected json, csv or summary)")),
        }
    }
}

/// Configuration for a batch scan.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// File with one URL per line.
    pub input: PathBuf,
    pub format: ReportFormat,
    /// Output file path (None = stdout).
    pub output: Option<PathBuf>,
    /// Only report these verdicts (empty = show all).
    pub filter: Vec<Verdict>,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of scanning a single URL.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub url: String,
    pub verdict: Verdict,
    pub confidence: f64,
    pub scores: ModelScores,
    pub reasoning: String,
    pub timestamp: String,
}

/// Aggregated batch report.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub total_scanned: usize,
    pub verdict_counts: VerdictCounts,
    pub results: Vec<ScanResult>,
    pub config_hash: String,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct VerdictCounts {
    pub safe: usize,
    pub suspicious: usize,
    pub dangerous: usize,
}

impl VerdictCounts {
    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Safe => self.safe += 1,
            Verdict::Suspicious => self.suspicious += 1,
            Verdict::Dangerous => self.dangerous += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Batch scan pipeline
// ---------------------------------------------------------------------------

/// Run the batch scan pipeline and write the rendered report.
///
/// Returns the full (unfiltered) report.
pub fn run_batch_scan<N: NoiseSource>(
    config: &BatchConfig,
    scorer: &mut EnsembleScorer<N>,
) -> Result<BatchReport> {
    let content = std::fs::read_to_string(&config.input)
        .wrap_err_with(|| format!("Failed to read URL list {:?}", config.input))?;
    let urls = parse_url_list(&content);
    if urls.is_empty() {
        warn!(path = %config.input.display(), "URL list has no entries");
    } else {
        info!(count = urls.len(), path = %config.input.display(), "Loaded URL list");
    }

    let report = scan_urls(&urls, scorer)?;
    let output_text = render_report(&report, config.format, &config.filter)?;

    if let Some(path) = &config.output {
        write_output(path, &output_text)?;
        info!(path = %path.display(), "Report written");
    } else {
        print!("{}", output_text);
    }

    Ok(report)
}

/// Analyze every URL in `urls`.
pub fn scan_urls<N: NoiseSource>(
    urls: &[&str],
    scorer: &mut EnsembleScorer<N>,
) -> Result<BatchReport> {
    let start = Instant::now();
    let config_hash = crate::config_hash(scorer.config());
    let mut results = Vec::with_capacity(urls.len());
    let mut verdict_counts = VerdictCounts::default();

    for url in urls {
        let analysis = scorer.analyze(url)?;
        debug!(
            url = %analysis.url,
            verdict = %analysis.result.verdict,
            confidence = analysis.result.confidence,
            "Classified"
        );
        verdict_counts.record(analysis.result.verdict);
        results.push(ScanResult {
            url: analysis.url,
            verdict: analysis.result.verdict,
            confidence: analysis.result.confidence,
            scores: analysis.result.scores,
            reasoning: analysis.reasoning,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    Ok(BatchReport {
        total_scanned: results.len(),
        verdict_counts,
        results,
        config_hash,
        duration_secs: start.elapsed().as_secs_f64(),
    })
}

/// Split a URL list into entries, skipping blank lines and `#` comments.
pub fn parse_url_list(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Render `report` in `format`, keeping only results whose verdict is in `filter`.
pub fn render_report(
    report: &BatchReport,
    format: ReportFormat,
    filter: &[Verdict],
) -> Result<String> {
    let filtered: Vec<&ScanResult> = report
        .results
        .iter()
        .filter(|r| filter.is_empty() || filter.contains(&r.verdict))
        .collect();

    Ok(match format {
        ReportFormat::Json => format_json(report, &filtered)?,
        ReportFormat::Csv => format_csv(&filtered)?,
        ReportFormat::Summary => format_summary(report, &filtered),
    })
}

// ---------------------------------------------------------------------------
// Output formatters
// ---------------------------------------------------------------------------

fn format_json(report: &BatchReport, filtered: &[&ScanResult]) -> Result<String> {
    let output = serde_json::json!({
        "total_scanned": report.total_scanned,
        "verdict_counts": report.verdict_counts,
        "config_hash": report.config_hash,
        "duration_secs": report.duration_secs,
        "results": filtered,
    });
    let mut text = serde_json::to_string_pretty(&output)?;
    text.push('\n');
    Ok(text)
}

fn format_csv(results: &[&ScanResult]) -> Result<String> {
    let mut buf = Vec::new();
    writeln!(buf, "url,verdict,confidence,xgboost,logistic,gaussian")?;
    for r in results {
        writeln!(
            buf,
            "{},{},{:.4},{:.4},{:.4},{:.4}",
            csv_escape(&r.url),
            r.verdict.as_str(),
            r.confidence,
            r.scores.xgboost,
            r.scores.logistic,
            r.scores.gaussian,
        )?;
    }
    String::from_utf8(buf).wrap_err("CSV encoding error")
}

fn format_summary(report: &BatchReport, results: &[&ScanResult]) -> String {
    let mut out = String::new();
    out.push_str("URL Batch Scan Report\n");
    out.push_str("=====================\n");
    out.push_str(&format!("Scanned:    {}\n", report.total_scanned));
    out.push_str(&format!("Safe:       {}\n", report.verdict_counts.safe));
    out.push_str(&format!("Suspicious: {}\n", report.verdict_counts.suspicious));
    out.push_str(&format!("Dangerous:  {}\n", report.verdict_counts.dangerous));
    out.push_str(&format!("Duration:   {:.2}s\n\n", report.duration_secs));

    out.push_str(&format!("{:<12} {:>10}  URL\n", "VERDICT", "CONFIDENCE"));
    for r in results {
        out.push_str(&format!(
            "{:<12} {:>9.1}%  {}\n",
            r.verdict.as_str().to_uppercase(),
            r.confidence * 100.0,
            r.url
        ));
    }
    out.push_str(&format!("\nConfig Hash: {}\n", report.config_hash));
    out
}

/// Quote a CSV field if it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).wrap_err_with(|| format!("Failed to write output to {:?}", path))
}
