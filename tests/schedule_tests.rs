use seq2seq_buckets::{BucketError, BucketSchedule, seeded_rng};

#[test]
fn sampling_matches_bucket_proportions() {
    let schedule = BucketSchedule::new(&[1_000, 3_000, 6_000]).expect("schedule");
    let mut rng = seeded_rng(42);

    let draws = 100_000;
    let mut counts = [0usize; 3];
    for _ in 0..draws {
        counts[schedule.sample(&mut rng)] += 1;
    }

    for (count, expected) in counts.iter().zip([0.1, 0.3, 0.6]) {
        let observed = *count as f64 / draws as f64;
        assert!(
            (observed - expected).abs() < 0.01,
            "observed {observed}, expected {expected}"
        );
    }
}

#[test]
fn a_fixed_seed_reproduces_the_pick_sequence() {
    let schedule = BucketSchedule::new(&[3, 7]).expect("schedule");

    let mut first_rng = seeded_rng(0);
    let first: Vec<usize> = (0..5).map(|_| schedule.sample(&mut first_rng)).collect();

    let mut second_rng = seeded_rng(0);
    let second: Vec<usize> = (0..5).map(|_| schedule.sample(&mut second_rng)).collect();

    assert_eq!(first, second);
}

#[test]
fn empty_buckets_are_never_sampled() {
    let schedule = BucketSchedule::new(&[0, 5, 0]).expect("schedule");
    let mut rng = seeded_rng(7);

    for _ in 0..1_000 {
        assert_eq!(schedule.sample(&mut rng), 1);
    }
}

#[test]
fn a_zero_total_is_rejected() {
    assert_eq!(
        BucketSchedule::new(&[0, 0]).unwrap_err(),
        BucketError::EmptyCorpus { buckets: 2 }
    );
}
