use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fs;

use winfreq::accel::{BackendKind, CpuExtractor};
use winfreq::pipeline::count_windows;
use winfreq::{RunConfig, Sequence};

fn random_sequence(rng: &mut StdRng, len: usize, alphabet: &[u8]) -> Vec<u8> {
    (0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect()
}

#[test]
fn test_counts_sum_and_key_length() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let len = rng.gen_range(1..300usize);
        let k = rng.gen_range(1..=len.min(12));
        let hint = rng.gen_range(1..9usize);
        let seq = Sequence::new(random_sequence(&mut rng, len, b"ACGT"));

        let extractor = Box::new(CpuExtractor::with_threads(hint).unwrap());
        let outcome = count_windows(&seq, k as i64, hint, extractor).unwrap();

        assert_eq!(outcome.shape.total_work_items, len - k + 1);
        assert_eq!(outcome.table.total() as usize, len - k + 1);
        let rows = outcome.table.sorted_rows();
        assert!(rows.iter().all(|(key, count)| key.len() == k && *count >= 1));
        assert!(rows.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

#[test]
fn test_matches_naive_count() {
    let mut rng = StdRng::seed_from_u64(42);
    let bytes = random_sequence(&mut rng, 500, b"ACDEFGHIKLMNPQRSTVWY");
    let seq = Sequence::new(bytes.clone());

    let extractor = Box::new(CpuExtractor::with_threads(4).unwrap());
    let outcome = count_windows(&seq, 2, 4, extractor).unwrap();

    let mut naive: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    for w in bytes.windows(2) {
        *naive.entry(w.to_vec()).or_insert(0) += 1;
    }
    let rows: Vec<(Vec<u8>, u64)> = outcome
        .table
        .sorted_rows()
        .into_iter()
        .map(|(k, v)| (k.to_vec(), v))
        .collect();
    assert_eq!(rows, naive.into_iter().collect::<Vec<_>>());
}

#[test]
fn test_output_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(3);
    let body = String::from_utf8(random_sequence(&mut rng, 2000, b"ACGT")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("seq.fasta");
    fs::write(&input, format!(">random\n{}\n", body)).unwrap();

    let mut outputs = Vec::new();
    for (i, cores) in [1usize, 3, 8].into_iter().enumerate() {
        let output = dir.path().join(format!("out_{}.csv", i));
        let config = RunConfig::new(&input, &output)
            .with_window_len(4)
            .with_core_hint(cores)
            .with_backend(BackendKind::Cpu);
        winfreq::pipeline::run(&config).unwrap();
        outputs.push(fs::read(&output).unwrap());
    }
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}
