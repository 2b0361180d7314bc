use codebook::annotate::references::ReferenceRecognizer;
use codebook::annotate::terms::Glossary;
use codebook::parser::{parse_content, ParseOptions, RenderContext};
use codebook::store::TableRegistry;
use codebook::types::Dialect;
use std::time::Instant;

fn count_lines(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

fn main() {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .expect("Usage: bench_parser <text_file> [tables.json]");
    let content = std::fs::read_to_string(&path).expect("Failed to read content file");
    let tables = match std::env::args().nth(2) {
        Some(tables_path) => TableRegistry::load_from_file(tables_path).expect("Failed to load tables"),
        None => TableRegistry::default(),
    };

    let glossary = Glossary::builtin();
    let references = ReferenceRecognizer::new("9");
    let context = RenderContext {
        tables: &tables,
        glossary: &glossary,
        references: &references,
    };
    let options = ParseOptions {
        dialect: Dialect::detect(&content),
        ..ParseOptions::default()
    };

    let iterations = 5;

    // Baseline: split and trim only
    let _ = count_lines(&content);
    let mut baseline_durations = Vec::new();
    for i in 0..iterations {
        let start = Instant::now();
        let line_count = count_lines(&content);
        let elapsed = start.elapsed();
        baseline_durations.push(elapsed);
        println!(
            "Baseline {}: {:.3}ms ({} lines)",
            i + 1,
            elapsed.as_secs_f64() * 1000.0,
            line_count,
        );
    }
    let baseline_avg =
        baseline_durations.iter().map(|d| d.as_secs_f64()).sum::<f64>() / iterations as f64;

    let _ = parse_content(&content, &options, &context);
    let mut durations = Vec::new();
    for i in 0..iterations {
        let start = Instant::now();
        let blocks = parse_content(&content, &options, &context);
        let elapsed = start.elapsed();
        durations.push(elapsed);
        println!(
            "Iteration {}: {:.3}ms ({} blocks, {:?} dialect)",
            i + 1,
            elapsed.as_secs_f64() * 1000.0,
            blocks.len(),
            options.dialect,
        );
    }

    let avg = durations.iter().map(|d| d.as_secs_f64()).sum::<f64>() / iterations as f64;
    let min = durations.iter().map(|d| d.as_secs_f64()).fold(f64::INFINITY, f64::min);
    println!("\nParser avg: {:.3}ms, min: {:.3}ms", avg * 1000.0, min * 1000.0);
    if baseline_avg > 0.0 {
        println!("Overhead vs baseline: {:.1}x", avg / baseline_avg);
    }
}
