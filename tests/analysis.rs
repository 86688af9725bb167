use sat_phase::bench::analysis::{AnalysisConfig, run};
use sat_phase::bench::report::{FinalVerdict, WIDE_HEADER, summarize};
use sat_phase::bench::report::Outcome;
use sat_phase::sat::generator::{SuiteConfig, write_mixed_suite, write_phase_transition_suite};
use sat_phase::sat::solver::{Limits, SolverType};
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sat-phase-it-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn generated_suite_round_trips_through_analysis() {
    let dir = scratch("suite");
    let config = SuiteConfig {
        num_vars: 4,
        ratios: vec![2.0, 6.0],
        instances_per_ratio: 3,
        seed: 8,
    };
    write_phase_transition_suite(&dir.join("random"), &config).unwrap();
    write_mixed_suite(&dir.join("mixed"), 2, 2, 8).unwrap();

    let out = scratch("suite-out");
    std::fs::create_dir_all(&out).unwrap();
    let mut analysis = AnalysisConfig::new(&dir);
    analysis.output_csv = Some(out.join("results.csv"));
    analysis.long_csv = Some(out.join("results_long.csv"));
    analysis.limits = Limits {
        timeout: None,
        max_clauses: Some(500),
    };
    let result = run(&analysis).unwrap();

    let wide = std::fs::read_to_string(out.join("results.csv")).unwrap();
    let long = std::fs::read_to_string(out.join("results_long.csv")).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();
    std::fs::remove_dir_all(&out).unwrap();

    assert_eq!(result.reports.len(), 10);
    assert!(result.skipped.is_empty());
    assert_eq!(result.disagreements().count(), 0);
    // DP and DPLL always finish here, so every file gets a verdict.
    for report in &result.reports {
        assert!(matches!(report.final_verdict, FinalVerdict::Agreed(_)));
        assert!(matches!(
            report.outcome(SolverType::Dpll),
            Some(Outcome::Finished(_))
        ));
    }

    // Files are visited in name order, directories included.
    assert!(result.reports[0].relative_path.starts_with("mixed"));
    assert_eq!(result.reports[2].filename(), "unsat_1.cnf");

    let mut lines = wide.lines();
    assert_eq!(lines.next(), Some(WIDE_HEADER.join(",").as_str()));
    assert_eq!(lines.count(), 10);
    assert_eq!(long.lines().count(), 1 + 10 * 3);

    let rows = summarize(&result.reports);
    let ratios: Vec<f64> = rows.iter().map(|r| r.ratio).collect();
    assert!(ratios.contains(&2.0));
    assert!(ratios.contains(&6.0));
}
