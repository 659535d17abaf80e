//! End-to-end pipeline tests: database-style expressions in, emitted C
//! artifacts out, with the cross-representation properties checked on the way.

use gibbs625::core::model::composition::Composition;
use gibbs625::core::model::phase::Phase;
use gibbs625::core::symbolic::{Expr, parse_expr};
use gibbs625::engine::config::GeneratorConfig;
use gibbs625::engine::progress::ProgressReporter;
use gibbs625::workflows::generate::{self, PhaseExpressions};
use gibbs625::workflows::landscape;
use tempfile::tempdir;

const R_LN: &str = "8.3144598*T";

/// Regular-solution style Gibbs energies in each phase's native sublattice
/// symbols: ideal mixing entropy per sublattice plus a small interaction term.
fn test_expressions() -> PhaseExpressions {
    let gamma = parse_expr(&format!(
        "{R_LN}*(FCC_A10CR*log(FCC_A10CR) + FCC_A10NB*log(FCC_A10NB) + FCC_A10NI*log(FCC_A10NI)) \
         - 12000.0*FCC_A10CR*FCC_A10NI - 8000.0*FCC_A10NB*FCC_A10NI*FCC_A11VA"
    ))
    .unwrap();

    let delta = parse_expr(&format!(
        "0.25*{R_LN}*(D0A_NBNI30NB*log(D0A_NBNI30NB) + D0A_NBNI30NI*log(D0A_NBNI30NI)) \
         + 0.75*{R_LN}*(D0A_NBNI31CR*log(D0A_NBNI31CR) + D0A_NBNI31NI*log(D0A_NBNI31NI)) \
         - 15000.0*D0A_NBNI30NB*D0A_NBNI31NI - 2500.0"
    ))
    .unwrap();

    let mu = parse_expr(&format!(
        "7.0/13.0*{R_LN}*(D85_NI7NB61CR*log(D85_NI7NB61CR) + D85_NI7NB61NB*log(D85_NI7NB61NB) \
         + D85_NI7NB61NI*log(D85_NI7NB61NI)) \
         - 9000.0*D85_NI7NB60NB*D85_NI7NB61NI - 1800.0"
    ))
    .unwrap();

    let laves = parse_expr(&format!(
        "2.0/3.0*{R_LN}*(C14_LAVES0CR*log(C14_LAVES0CR) + C14_LAVES0NI*log(C14_LAVES0NI)) \
         + 1.0/3.0*{R_LN}*(C14_LAVES1CR*log(C14_LAVES1CR) + C14_LAVES1NB*log(C14_LAVES1NB)) \
         + 11000.0*C14_LAVES0CR*C14_LAVES1NB - 4200.0"
    ))
    .unwrap();

    PhaseExpressions {
        gamma,
        delta,
        mu,
        laves,
    }
}

/// Interior probes per phase, strictly inside every domain bound.
fn interior_probe(phase: Phase) -> Composition {
    match phase {
        Phase::Gamma => Composition::new(0.30, 0.15),
        Phase::Delta => Composition::new(0.10, 0.12),
        Phase::Mu => Composition::new(0.08, 0.52),
        Phase::Laves => Composition::new(0.35, 0.22),
    }
}

#[test]
fn generate_emits_all_three_representation_groups() {
    let dir = tempdir().unwrap();
    let config = GeneratorConfig::default();
    let result = generate::run(
        &test_expressions(),
        &config,
        dir.path(),
        false,
        &ProgressReporter::new(),
    )
    .unwrap();

    assert_eq!(result.artifacts.len(), 3);
    for prefix in ["energy625", "taylor625", "parabola625"] {
        assert!(dir.path().join(format!("{prefix}.c")).exists());
        assert!(dir.path().join(format!("{prefix}.h")).exists());
    }

    let energy = std::fs::read_to_string(dir.path().join("energy625.c")).unwrap();
    for name in ["g_gam", "g_del", "g_mu", "g_lav", "dg_gam_dxCr", "d2g_lav_dxNbNb"] {
        assert!(energy.contains(name), "missing routine {name}");
    }
    assert!(energy.contains("This file is part of 'ALLOY625'"));
}

#[test]
fn rerunning_the_pipeline_reproduces_artifacts_byte_for_byte() {
    let dir = tempdir().unwrap();
    let config = GeneratorConfig::default();
    let expressions = test_expressions();
    let reporter = ProgressReporter::new();

    generate::run(&expressions, &config, dir.path(), false, &reporter).unwrap();
    let first: Vec<String> = ["energy625.c", "taylor625.c", "parabola625.c"]
        .iter()
        .map(|name| std::fs::read_to_string(dir.path().join(name)).unwrap())
        .collect();

    generate::run(&expressions, &config, dir.path(), true, &reporter).unwrap();
    let second: Vec<String> = ["energy625.c", "taylor625.c", "parabola625.c"]
        .iter()
        .map(|name| std::fs::read_to_string(dir.path().join(name)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn pipeline_refuses_to_clobber_existing_artifacts() {
    let dir = tempdir().unwrap();
    let config = GeneratorConfig::default();
    let expressions = test_expressions();
    let reporter = ProgressReporter::new();

    generate::run(&expressions, &config, dir.path(), false, &reporter).unwrap();
    let result = generate::run(&expressions, &config, dir.path(), false, &reporter);
    assert!(result.is_err());
}

#[test]
fn polynomial_matches_raw_surface_at_each_expansion_anchor() {
    let config = GeneratorConfig::default();
    let surfaces = generate::build_surfaces(&test_expressions(), &config).unwrap();

    for (index, phase) in Phase::ALL.iter().enumerate() {
        let anchor = config.phase_params(*phase).expansion_anchor;
        let raw_value = surfaces.raw[index].eval_at(&anchor).unwrap();
        let poly_value = surfaces.polynomial[index].eval_at(&anchor).unwrap();
        assert!(
            (raw_value - poly_value).abs() <= 1e-8 * raw_value.abs(),
            "{phase}: polynomial does not match raw at the anchor"
        );
    }
}

#[test]
fn regularized_matches_raw_deep_in_the_interior() {
    let mut config = GeneratorConfig::default();
    // Wide enough blend to measure, narrow enough that interior probes sit
    // many alpha widths away from every boundary.
    for params in [
        &mut config.gamma,
        &mut config.delta,
        &mut config.mu,
        &mut config.laves,
    ] {
        params.alpha = 1.0e-3;
    }
    let surfaces = generate::build_surfaces(&test_expressions(), &config).unwrap();

    for (index, phase) in Phase::ALL.iter().enumerate() {
        let probe = interior_probe(*phase);
        let raw_value = surfaces.raw[index].eval_at(&probe).unwrap();
        let safe_value = surfaces.regularized[index].eval_at(&probe).unwrap();
        assert!(
            (raw_value - safe_value).abs() <= 1e-6 * raw_value.abs().max(1.0),
            "{phase}: regularized deviates in the interior ({safe_value} vs {raw_value})"
        );
    }
}

#[test]
fn delta_outside_cr_bound_is_dominated_by_the_cr_hi_funnel() {
    let config = GeneratorConfig::default();
    let surfaces = generate::build_surfaces(&test_expressions(), &config).unwrap();

    // x_cr = 0.9 is past the delta Cr bound of 0.75; x_nb = 0.1 is interior.
    let probe = Composition::new(0.9, 0.1);
    let delta_index = Phase::ALL.iter().position(|p| *p == Phase::Delta).unwrap();
    let blended = surfaces.regularized[delta_index].eval_at(&probe).unwrap();

    let funnel = config.delta.funnel.intercept + config.delta.funnel.slope * (0.9 - 0.75);
    assert!(
        (blended - funnel).abs() <= 1e-9 * funnel.abs(),
        "blend {blended} is not pinned to the Cr-hi funnel {funnel}"
    );
}

#[test]
fn regularized_surfaces_evaluate_over_the_whole_unit_square() {
    let config = GeneratorConfig::default();
    let surfaces = generate::build_surfaces(&test_expressions(), &config).unwrap();

    for surface in &surfaces.regularized {
        for &(x_cr, x_nb) in &[
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (0.5, 0.5),
            (0.9, 0.9),
        ] {
            let value = surface.eval_at(&Composition::new(x_cr, x_nb)).unwrap();
            assert!(
                value.is_finite(),
                "{}: non-finite energy at ({x_cr}, {x_nb})",
                surface.phase()
            );
        }
    }
}

#[test]
fn anchor_coincidence_and_divergence_both_expand_cleanly() {
    let mut config = GeneratorConfig::default();
    let expressions = test_expressions();

    // Divergent anchors (the default configuration).
    let divergent = generate::build_surfaces(&expressions, &config).unwrap();

    // Coincident anchors: expansion centered on the equilibrium corner.
    for params in [
        &mut config.gamma,
        &mut config.delta,
        &mut config.mu,
        &mut config.laves,
    ] {
        params.expansion_anchor = params.equilibrium_anchor;
    }
    let coincident = generate::build_surfaces(&expressions, &config).unwrap();

    for (index, phase) in Phase::ALL.iter().enumerate() {
        let anchor = config.phase_params(*phase).equilibrium_anchor;
        let raw_value = coincident.raw[index].eval_at(&anchor).unwrap();
        let poly_value = coincident.polynomial[index].eval_at(&anchor).unwrap();
        assert!((raw_value - poly_value).abs() <= 1e-8 * raw_value.abs());
        // The two conventions produce genuinely different polynomials.
        let probe = interior_probe(*phase);
        let divergent_value = divergent.polynomial[index].eval_at(&probe).unwrap();
        let coincident_value = coincident.polynomial[index].eval_at(&probe).unwrap();
        assert!(divergent_value != coincident_value, "{phase}: expansions collapsed");
    }
}

#[test]
fn landscape_sampling_covers_raw_and_regularized_representations() {
    let config = GeneratorConfig::default();
    let surfaces = generate::build_surfaces(&test_expressions(), &config).unwrap();
    let settings = gibbs625::engine::config::LandscapeSettings {
        steps: 11,
        workers: 6,
    };

    let raw_map = landscape::run(&surfaces.raw, &settings, &ProgressReporter::new()).unwrap();
    // Raw surfaces are undefined beyond the simplex: the far corner is empty.
    let corner = raw_map
        .rows
        .iter()
        .find(|row| row.x_cr == 1.0 && row.x_nb == 1.0)
        .unwrap();
    assert!(corner.energies.iter().all(|energy| energy.is_none()));

    let safe_map =
        landscape::run(&surfaces.regularized, &settings, &ProgressReporter::new()).unwrap();
    for row in &safe_map.rows {
        // The regularized surfaces cover the whole square. The only tolerated
        // gaps are roundoff-width slivers on the x_ni = 0 diagonal, where a
        // site fraction computes to a few ulps below zero while its blend
        // weight has not yet saturated.
        let hairline = (1.0 - row.x_cr - row.x_nb).abs() < 1e-12;
        assert!(
            hairline || row.energies.iter().all(|energy| energy.is_some()),
            "regularized hole at ({}, {})",
            row.x_cr,
            row.x_nb
        );
    }

    let mut buffer = Vec::new();
    safe_map.write_csv(&mut buffer).unwrap();
    assert!(buffer.starts_with(b"x_cr,x_nb,g_gam,g_del,g_mu,g_lav"));
}

#[test]
fn reduction_rejects_a_foreign_constituent_loudly() {
    let mut expressions = test_expressions();
    expressions.gamma = expressions.gamma + Expr::symbol("FCC_A10MO");
    let config = GeneratorConfig::default();
    let result = generate::build_surfaces(&expressions, &config);
    let message = result.err().unwrap().to_string();
    assert!(message.contains("FCC_A1"));
    assert!(message.contains("FCC_A10MO"));
}
