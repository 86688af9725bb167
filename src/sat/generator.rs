//! Random instance generation for phase-transition experiments.

use crate::error::{Error, Result};
use crate::sat::clause::Clause;
use crate::sat::dimacs::write_file;
use crate::sat::literal::{Literal, Variable};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Ratios sampled by default, bracketing the 3-SAT threshold near 4.26.
pub const DEFAULT_RATIOS: [f64; 7] = [3.0, 3.5, 4.0, 4.2, 4.3, 4.5, 5.0];

/// One clause of `width` distinct variables drawn from `1..=num_vars`, each
/// negated with probability one half.
///
/// # Panics
///
/// If `width > num_vars`.
pub fn random_clause(rng: &mut fastrand::Rng, num_vars: usize, width: usize) -> Clause {
    assert!(width <= num_vars, "clause width {width} exceeds {num_vars} variables");
    let mut vars: Vec<usize> = (1..=num_vars).collect();
    rng.shuffle(&mut vars);
    Clause::new(vars.into_iter().take(width).map(|v| {
        let v = Variable::try_from(v).expect("variable index fits in u32");
        Literal::new(v, rng.bool())
    }))
}

/// Uniform random k-CNF with `num_clauses` clauses over `num_vars` variables.
pub fn random_k_cnf(
    rng: &mut fastrand::Rng,
    num_vars: usize,
    num_clauses: usize,
    k: usize,
) -> Vec<Clause> {
    (0..num_clauses)
        .map(|_| random_clause(rng, num_vars, k))
        .collect()
}

/// Small mixed-width instance: every clause has between 1 and 3 literals.
pub fn random_mixed_cnf(rng: &mut fastrand::Rng, num_vars: usize, num_clauses: usize) -> Vec<Clause> {
    let max_width = num_vars.min(3);
    (0..num_clauses)
        .map(|_| {
            let width = rng.usize(1..=max_width);
            random_clause(rng, num_vars, width)
        })
        .collect()
}

/// The smallest unsatisfiable formula, `x1 ∧ ¬x1`.
pub fn contradiction() -> (usize, Vec<Clause>) {
    let x = Literal::new(1, true);
    (1, vec![Clause::new([x]), Clause::new([-x])])
}

/// Number of clauses for a target ratio, truncated like `int(n * r)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn clauses_for_ratio(num_vars: usize, ratio: f64) -> usize {
    (num_vars as f64 * ratio) as usize
}

/// Parameters of a phase-transition suite.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteConfig {
    pub num_vars: usize,
    pub ratios: Vec<f64>,
    pub instances_per_ratio: usize,
    pub seed: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            num_vars: 20,
            ratios: DEFAULT_RATIOS.to_vec(),
            instances_per_ratio: 5,
            seed: 0,
        }
    }
}

/// Writes `n{vars}_r{ratio}_i{k}.cnf` random 3-CNF files into `dir`.
///
/// # Errors
///
/// `Error::Config` for fewer than three variables; I/O errors from creating
/// the directory or writing files.
pub fn write_phase_transition_suite(dir: &Path, config: &SuiteConfig) -> Result<Vec<PathBuf>> {
    if config.num_vars < 3 {
        return Err(Error::Config(format!(
            "3-CNF needs at least 3 variables, got {}",
            config.num_vars
        )));
    }
    std::fs::create_dir_all(dir)?;
    let mut rng = fastrand::Rng::with_seed(config.seed);
    let mut written = Vec::new();

    for &ratio in &config.ratios {
        let num_clauses = clauses_for_ratio(config.num_vars, ratio);
        for i in 1..=config.instances_per_ratio {
            let clauses = random_k_cnf(&mut rng, config.num_vars, num_clauses, 3);
            let path = dir.join(format!("n{}_r{ratio:.1}_i{i}.cnf", config.num_vars));
            let comment = format!("Random 3-CNF with ratio={ratio:.1}");
            write_file(&path, config.num_vars, &clauses, Some(&comment))?;
            debug!(path = %path.display(), clauses = num_clauses, "wrote instance");
            written.push(path);
        }
    }

    info!(count = written.len(), dir = %dir.display(), "generated phase-transition suite");
    Ok(written)
}

/// Writes `sat_{k}.cnf` small mixed-width instances and `unsat_{k}.cnf` contradictions.
///
/// # Errors
///
/// Propagates I/O errors.
pub fn write_mixed_suite(
    dir: &Path,
    sat_count: usize,
    unsat_count: usize,
    seed: u64,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut written = Vec::new();

    for i in 1..=sat_count {
        let num_vars = rng.usize(3..=6);
        let num_clauses = rng.usize(num_vars..=num_vars * 2);
        let clauses = random_mixed_cnf(&mut rng, num_vars, num_clauses);
        let path = dir.join(format!("sat_{i}.cnf"));
        write_file(&path, num_vars, &clauses, Some("SAT test"))?;
        written.push(path);
    }

    for i in 1..=unsat_count {
        let (num_vars, clauses) = contradiction();
        let path = dir.join(format!("unsat_{i}.cnf"));
        write_file(&path, num_vars, &clauses, Some("UNSAT test"))?;
        written.push(path);
    }

    info!(count = written.len(), dir = %dir.display(), "generated mixed suite");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::dimacs::parse_file;

    #[test]
    fn test_random_clause_has_distinct_variables() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..100 {
            let clause = random_clause(&mut rng, 5, 3);
            assert_eq!(clause.len(), 3);
            assert_eq!(clause.variables().count(), 3);
            assert!(clause.iter().all(|l| (1..=5).contains(&l.variable())));
        }
    }

    #[test]
    fn test_generation_is_seeded() {
        let a = random_k_cnf(&mut fastrand::Rng::with_seed(42), 20, 85, 3);
        let b = random_k_cnf(&mut fastrand::Rng::with_seed(42), 20, 85, 3);
        assert_eq!(a, b);
        assert_eq!(a.len(), 85);
    }

    #[test]
    fn test_mixed_widths_in_range() {
        let mut rng = fastrand::Rng::with_seed(3);
        let clauses = random_mixed_cnf(&mut rng, 2, 50);
        assert!(clauses.iter().all(|c| (1..=2).contains(&c.len())));
    }

    #[test]
    fn test_clauses_for_ratio_truncates() {
        assert_eq!(clauses_for_ratio(20, 4.5), 90);
        assert_eq!(clauses_for_ratio(20, 4.26), 85);
        assert_eq!(clauses_for_ratio(0, 4.0), 0);
    }

    #[test]
    fn test_phase_transition_suite_on_disk() {
        let dir = std::env::temp_dir().join(format!("sat-phase-suite-{}", std::process::id()));
        let config = SuiteConfig {
            num_vars: 10,
            ratios: vec![2.0, 4.5],
            instances_per_ratio: 2,
            seed: 1,
        };
        let files = write_phase_transition_suite(&dir, &config).unwrap();
        assert_eq!(files.len(), 4);
        assert!(files[0].ends_with("n10_r2.0_i1.cnf"));

        let dimacs = parse_file(&files[3]).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(dimacs.declared_vars, Some(10));
        assert_eq!(dimacs.cnf.len(), 45);
        assert!((dimacs.ratio() - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_suite_rejects_too_few_variables() {
        let config = SuiteConfig {
            num_vars: 2,
            ..SuiteConfig::default()
        };
        let dir = std::env::temp_dir().join("sat-phase-never-written");
        assert!(matches!(
            write_phase_transition_suite(&dir, &config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_mixed_suite_on_disk() {
        let dir = std::env::temp_dir().join(format!("sat-phase-mixed-{}", std::process::id()));
        let files = write_mixed_suite(&dir, 2, 1, 9).unwrap();
        let unsat = parse_file(dir.join("unsat_1.cnf")).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(unsat.cnf.len(), 2);
    }
}
