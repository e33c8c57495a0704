use crate::accel::{create_extractor, BackendKind, WindowExtractor};
use crate::aggregate::{aggregate, FrequencyTable};
use crate::config::RunConfig;
use crate::error::{Result, WinFreqError};
use crate::io::fasta::read_sequence;
use crate::io::report::{peak_rss_kb, write_report, RunSummary};
use crate::io::table::write_table;
use crate::partition::{plan, window_count, DispatchShape};
use crate::window::Sequence;
use std::time::Instant;
use tracing::info;

/// Table produced by one extraction, with the shape it was dispatched with
#[derive(Debug)]
pub struct CountOutcome {
    pub table: FrequencyTable,
    pub shape: DispatchShape,
    pub backend: String,
}

/// Extract and fold every window of `sequence`
///
/// Consumes the extractor; its device resources are released as soon as the
/// window buffer is on the host, before aggregation starts.
pub fn count_windows(
    sequence: &Sequence,
    window_len: i64,
    core_hint: usize,
    extractor: Box<dyn WindowExtractor>,
) -> Result<CountOutcome> {
    let shape = plan(sequence.len(), window_len, core_hint, extractor.max_group_size())?;
    let backend = extractor.name();
    info!(
        "Dispatching {} windows of length {} on {}: group size {}, {} groups",
        shape.total_work_items,
        shape.window_len,
        backend,
        shape.group_size,
        shape.group_count()
    );

    let buffer = extractor.extract(sequence, &shape)?;
    drop(extractor);

    let table = aggregate(buffer);
    if table.total() != shape.total_work_items as u64 {
        return Err(WinFreqError::Extraction(format!(
            "folded {} windows, expected {}",
            table.total(),
            shape.total_work_items
        )));
    }

    Ok(CountOutcome { table, shape, backend })
}

/// Run the full pipeline: read, extract, aggregate, write
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let start = Instant::now();

    let sequence = read_sequence(&config.input)?;
    window_count(sequence.len(), config.window_len)?;

    let kernel_source = match config.backend {
        BackendKind::Cpu => Default::default(),
        _ => config.kernel_source()?,
    };
    let extractor = create_extractor(config.backend, config.core_hint, &kernel_source)?;
    let outcome = count_windows(&sequence, config.window_len, config.core_hint, extractor)?;

    // Output is opened only once the table is complete
    write_table(&config.output, &outcome.table)?;

    let elapsed = start.elapsed();
    info!(
        "Counted {} windows ({} distinct) in {:.2}s",
        outcome.shape.total_work_items,
        outcome.table.len(),
        elapsed.as_secs_f64()
    );

    let summary = RunSummary {
        input: config.input.clone(),
        output: config.output.clone(),
        sequence_len: sequence.len(),
        window_len: outcome.shape.window_len,
        total_windows: outcome.shape.total_work_items,
        distinct_windows: outcome.table.len(),
        group_size: outcome.shape.group_size,
        padded_global_size: outcome.shape.padded_global_size,
        backend: outcome.backend,
        core_hint: config.core_hint,
        elapsed_secs: elapsed.as_secs_f64(),
        peak_rss_kb: peak_rss_kb(),
    };
    if let Some(report) = &config.report {
        write_report(report, &summary)?;
        info!("Run summary written to {}", report.display());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::CpuExtractor;

    fn count(seq: &str, k: i64) -> Result<CountOutcome> {
        let extractor = Box::new(CpuExtractor::with_threads(2).unwrap());
        count_windows(&Sequence::from(seq), k, 2, extractor)
    }

    #[test]
    fn test_count_aaaa() {
        let outcome = count("AAAA", 2).unwrap();
        assert_eq!(outcome.table.sorted_rows(), vec![(&b"AA"[..], 3)]);
    }

    #[test]
    fn test_count_acgt_single() {
        let outcome = count("ACGT", 1).unwrap();
        let keys: Vec<&[u8]> = outcome.table.sorted_rows().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&b"A"[..], &b"C"[..], &b"G"[..], &b"T"[..]]);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        for k in [1, 2, 5] {
            assert!(matches!(
                count("", k),
                Err(WinFreqError::InvalidWindowLength { .. })
            ));
        }
    }

    #[test]
    fn test_sum_of_counts() {
        let seq = "MKVLAAGIVGLLLAQSPAMA".repeat(7);
        for k in 1..=10 {
            let outcome = count(&seq, k).unwrap();
            assert_eq!(outcome.table.total() as usize, seq.len() - k as usize + 1);
        }
    }
}
