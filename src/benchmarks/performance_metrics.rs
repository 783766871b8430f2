//! Performance summaries over a finished sweep.

use super::benchmark_types::{Dataset, SweepReport};

/// Median timing of every record sharing a dataset and label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSummary {
    pub dataset: Dataset,
    pub label: String,
    pub median_secs: f64,
    pub samples: usize,
    pub suspect: usize,
}

/// Median of a sample set; `None` when empty.
pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Groups the records of `dataset` by label, in first-seen order.
pub fn summarize_dataset(report: &SweepReport, dataset: Dataset) -> Vec<LabelSummary> {
    let mut groups: Vec<(String, Vec<f64>, usize)> = Vec::new();
    for record in report.records_for(dataset) {
        let secs = record.elapsed().as_secs_f64();
        let suspect = usize::from(record.suspect);
        match groups.iter_mut().find(|(label, _, _)| *label == record.label) {
            Some((_, samples, flagged)) => {
                samples.push(secs);
                *flagged += suspect;
            }
            None => groups.push((record.label.clone(), vec![secs], suspect)),
        }
    }

    groups
        .into_iter()
        .filter_map(|(label, samples, suspect)| {
            median(&samples).map(|median_secs| LabelSummary {
                dataset,
                label,
                median_secs,
                samples: samples.len(),
                suspect,
            })
        })
        .collect()
}

/// Median filter-first time minus median data-first time per thread count.
///
/// Positive values mean the data-first loop order was faster.
pub fn loop_order_comparison(report: &SweepReport) -> Vec<(String, f64)> {
    let data_first = summarize_dataset(report, Dataset::ParallelData);
    summarize_dataset(report, Dataset::ParallelFilter)
        .into_iter()
        .filter_map(|filter_first| {
            data_first
                .iter()
                .find(|d| d.label == filter_first.label)
                .map(|d| (filter_first.label.clone(), filter_first.median_secs - d.median_secs))
        })
        .collect()
}

/// Prints detailed performance analysis
pub fn print_performance_analysis(report: &SweepReport) {
    if report.records.is_empty() {
        return;
    }

    println!("\n{}", "=".repeat(80));
    println!("Detailed Results (median seconds)");
    println!("{}", "=".repeat(80));

    for dataset in Dataset::ALL {
        let summaries = summarize_dataset(report, dataset);
        if summaries.is_empty() {
            continue;
        }
        println!("\n{} ({})", dataset, dataset.label_column());
        for summary in &summaries {
            let flag = if summary.suspect > 0 {
                format!("  [{} suspect]", summary.suspect)
            } else {
                String::new()
            };
            println!(
                "   {:>14}: {:>10.6} s over {} run(s){}",
                summary.label, summary.median_secs, summary.samples, flag
            );
        }
    }

    let comparison = loop_order_comparison(report);
    if !comparison.is_empty() {
        println!("\n{}", "=".repeat(80));
        println!("Parallel Comparison: filter first time - data first time");
        println!("{}", "=".repeat(80));
        for (threads, difference) in &comparison {
            println!("   threads {:>4}: {:+.6} s", threads, difference);
        }
    }

    println!("\n{}", "=".repeat(80));
    if report.is_clean() {
        println!("All checked outputs matched the serial baseline");
    } else {
        println!(
            "{} output(s) did not match the serial baseline",
            report.mismatches.len()
        );
        for mismatch in &report.mismatches {
            println!(
                "   {} [{}] filter length {}: {}",
                mismatch.dataset, mismatch.label, mismatch.filter_len, mismatch.outcome
            );
        }
    }
    println!("{}", "=".repeat(80));
}
