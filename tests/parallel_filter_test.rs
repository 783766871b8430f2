use filter_bench::data_gen::{generate_filter, generate_input, reset, zeroed_buffer};
use filter_bench::{FilterConfig, KernelVariant, Schedule, UnrollFactor, apply_filter, check};

fn baseline(input: &[u32], filter: &[u32]) -> Vec<u32> {
    let mut output = vec![0u32; input.len()];
    apply_filter(KernelVariant::SerialDataFirst, input, filter, &mut output)
        .expect("Serial baseline should succeed");
    output
}

fn run(variant: KernelVariant, input: &[u32], filter: &[u32], config: &FilterConfig) -> Vec<u32> {
    let mut output = vec![0u32; input.len()];
    variant
        .run(input, filter, &mut output, config)
        .expect("Kernel should succeed");
    output
}

fn all_schedules() -> Vec<Schedule> {
    vec![
        Schedule::Static,
        Schedule::Dynamic(1),
        Schedule::Guided(1),
        Schedule::StaticChunk(32),
        Schedule::StaticChunk(64),
        Schedule::Dynamic(100),
    ]
}

#[test]
fn test_small_scenario_every_variant() {
    let input = generate_input(16).expect("Input generation should succeed");
    let filter = generate_filter(4).expect("Filter generation should succeed");

    let mut expected = vec![0u32; 16];
    expected[..4].copy_from_slice(&[0, 1, 2, 3]);

    for variant in KernelVariant::ALL {
        for threads in [1, 2, 4, 16] {
            for unroll in [1, 2, 3, 4, 8] {
                let config = FilterConfig::new()
                    .with_threads(threads)
                    .with_unroll(UnrollFactor::new(unroll).unwrap());
                let output = run(variant, &input, &filter, &config);
                assert_eq!(
                    output, expected,
                    "{} with {} threads, unroll {}",
                    variant, threads, unroll
                );
            }
        }
    }
}

#[test]
fn test_empty_filter_gives_all_zeros() {
    let input = generate_input(8).expect("Input generation should succeed");
    let filter: Vec<u32> = Vec::new();

    for variant in KernelVariant::ALL {
        let config = FilterConfig::new().with_threads(4);
        let output = run(variant, &input, &filter, &config);
        assert_eq!(output, vec![0u32; 8], "{}", variant);
    }
}

#[test]
fn test_empty_data() {
    let input: Vec<u32> = Vec::new();
    let filter = generate_filter(16).expect("Filter generation should succeed");

    for variant in KernelVariant::ALL {
        let output = run(variant, &input, &filter, &FilterConfig::new().with_threads(3));
        assert!(output.is_empty());
    }
}

#[test]
fn test_loop_order_invariance() {
    let input = generate_input(10_000).expect("Input generation should succeed");
    let filter = generate_filter(300).expect("Filter generation should succeed");

    let data_first = baseline(&input, &filter);
    let filter_first = run(
        KernelVariant::SerialFilterFirst,
        &input,
        &filter,
        &FilterConfig::new(),
    );
    assert!(check(&data_first, &filter_first).is_match());
    assert!(data_first.iter().any(|&v| v != 0));
}

#[test]
fn test_parallel_matches_serial_for_every_thread_count() {
    let input = generate_input(20_000).expect("Input generation should succeed");
    let filter = generate_filter(512).expect("Filter generation should succeed");
    let expected = baseline(&input, &filter);

    for threads in [1, 2, 3, 4, 8, 16] {
        let config = FilterConfig::new().with_threads(threads);
        for variant in [KernelVariant::ParallelFilterFirst, KernelVariant::ParallelDataFirst] {
            let output = run(variant, &input, &filter, &config);
            let outcome = check(&expected, &output);
            assert!(outcome.is_match(), "{} with {} threads: {}", variant, threads, outcome);
        }
    }
}

#[test]
fn test_unrolling_invariance_including_remainders() {
    // 10_007 data elements and 509 filter entries are not divisible by any unroll factor above 1.
    let input = generate_input(10_007).expect("Input generation should succeed");
    let filter = generate_filter(509).expect("Filter generation should succeed");
    let expected = baseline(&input, &filter);

    for unroll in [1, 2, 3, 4, 5, 8, 16, 32, 33] {
        let config = FilterConfig::new()
            .with_threads(4)
            .with_unroll(UnrollFactor::new(unroll).unwrap());
        for variant in KernelVariant::ALL {
            let output = run(variant, &input, &filter, &config);
            assert!(
                check(&expected, &output).is_match(),
                "{} with unroll {}",
                variant,
                unroll
            );
        }
    }
}

#[test]
fn test_schedule_invariance() {
    let input = generate_input(12_345).expect("Input generation should succeed");
    let filter = generate_filter(700).expect("Filter generation should succeed");
    let expected = baseline(&input, &filter);

    for schedule in all_schedules() {
        let config = FilterConfig::new().with_threads(8).with_schedule(schedule);
        for variant in [KernelVariant::ParallelDataFirst, KernelVariant::ParallelFilterFirst] {
            let output = run(variant, &input, &filter, &config);
            assert!(
                check(&expected, &output).is_match(),
                "{} with schedule {}",
                variant,
                schedule
            );
        }
    }
}

#[test]
fn test_repeated_runs_with_reset_are_identical() {
    let input = generate_input(5_000).expect("Input generation should succeed");
    let filter = generate_filter(100).expect("Filter generation should succeed");
    let mut output = zeroed_buffer(input.len()).expect("Output allocation should succeed");
    let config = FilterConfig::new().with_threads(4).with_schedule(Schedule::Dynamic(1));

    for variant in KernelVariant::ALL {
        variant
            .run(&input, &filter, &mut output, &config)
            .expect("First run should succeed");
        let first = output.clone();

        reset(&mut output);
        variant
            .run(&input, &filter, &mut output, &config)
            .expect("Second run should succeed");
        assert_eq!(first, output, "{}", variant);
        reset(&mut output);
    }
}

#[test]
fn test_kernels_do_not_mutate_inputs() {
    let input = generate_input(3_000).expect("Input generation should succeed");
    let filter = generate_filter(64).expect("Filter generation should succeed");
    let (input_copy, filter_copy) = (input.clone(), filter.clone());

    for variant in KernelVariant::ALL {
        run(variant, &input, &filter, &FilterConfig::new().with_threads(4));
    }
    assert_eq!(input, input_copy);
    assert_eq!(filter, filter_copy);
}

#[test]
fn test_many_threads() {
    let input = generate_input(100).expect("Input generation should succeed");
    let filter = generate_filter(10).expect("Filter generation should succeed");
    let expected = baseline(&input, &filter);

    let config = FilterConfig::new().with_threads(200);
    for variant in [KernelVariant::ParallelFilterFirst, KernelVariant::ParallelDataFirst] {
        assert_eq!(run(variant, &input, &filter, &config), expected);
    }
}

#[test]
fn test_default_threads() {
    let config = FilterConfig::new();
    assert!(config.get_threads() >= 1);

    let input = generate_input(1_000).expect("Input generation should succeed");
    let filter = generate_filter(50).expect("Filter generation should succeed");
    assert_eq!(
        run(KernelVariant::ParallelDataFirst, &input, &filter, &config),
        baseline(&input, &filter)
    );
}

#[test]
fn test_duplicate_filter_values() {
    let input: Vec<u32> = (0..64).map(|i| i % 8).collect();
    let filter = vec![3, 3, 5, 3, 5];
    let expected: Vec<u32> = input
        .iter()
        .map(|&v| if v == 3 || v == 5 { v } else { 0 })
        .collect();

    let config = FilterConfig::new().with_threads(5).with_schedule(Schedule::StaticChunk(1));
    for variant in KernelVariant::ALL {
        assert_eq!(run(variant, &input, &filter, &config), expected, "{}", variant);
    }
}
