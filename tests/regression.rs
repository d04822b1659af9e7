use beamclip::{BinaryOp, Mesh, Polygon};
use libtest_mimic::{Arguments, Failed, Trial};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

/// What the result of a case should look like. Missing fields aren't
/// checked.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
struct Expectation {
    contours: Option<usize>,
    holes: Option<usize>,
    area: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug)]
struct RegressionCaseDeclaration {
    svg_path_1: String,
    svg_path_2: String,
    op: BinaryOp,
    #[serde(default)]
    expect: Expectation,
}

const TOLERANCE: f64 = 1e-9;
const TIME_LIMIT: Duration = Duration::from_secs(30);

fn main() {
    let args = Arguments::from_args();
    let tests = regression_tests();

    libtest_mimic::run(&args, tests).exit();
}

fn regression_tests() -> Vec<Trial> {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let file_paths = glob::glob(&format!("{ws}/tests/regression/**/*.yml")).unwrap();

    file_paths
        .into_iter()
        .map(|p| {
            let p = p.unwrap();
            let name = input_path_base(&p).display().to_string();
            Trial::test(name, || run_regression_case(p))
        })
        .collect()
}

fn input_path_base(input_path: &Path) -> &Path {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let base = format!("{ws}/tests/regression");
    input_path.strip_prefix(base).unwrap()
}

fn check(what: &str, expected: Option<f64>, actual: f64) -> Result<(), Failed> {
    match expected {
        Some(e) if (e - actual).abs() > TOLERANCE * e.abs().max(1.0) => {
            Err(format!("expected {what} {e}, got {actual}").into())
        }
        _ => Ok(()),
    }
}

/// Runs `f` on its own thread, so that a clip that never finishes fails the
/// case instead of stalling the whole run.
fn with_time_limit<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> Result<T, Failed> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(TIME_LIMIT).map_err(|e| match e {
        RecvTimeoutError::Timeout => format!("still running after {TIME_LIMIT:?}").into(),
        RecvTimeoutError::Disconnected => "panicked".into(),
    })
}

fn run_regression_case(path: PathBuf) -> Result<(), Failed> {
    let input = std::fs::read_to_string(&path)?;
    let case: RegressionCaseDeclaration = serde_yaml::from_str(&input)?;
    let subject = beamclip_util::svg_path_to_polygon(&case.svg_path_1, 1e-3)?;
    let clip = beamclip_util::svg_path_to_polygon(&case.svg_path_2, 1e-3)?;

    let (result, mesh) = {
        let (op, subject, clip) = (case.op, subject.clone(), clip.clone());
        with_time_limit(move || -> Result<_, beamclip::Error> {
            let result = beamclip::clip_to_polygon(op, &subject, &clip)?;
            let mesh = beamclip::clip_to_mesh(op, &subject, &clip)?;
            Ok((result, mesh))
        })??
    };
    let outcome = check_result(&case.expect, &result, &mesh);
    if outcome.is_err() && std::env::var_os("BEAMCLIP_DEBUG_SVG").is_some() {
        let out = beamclip_util::debug_output_path_for(&path);
        beamclip_util::save_render(&out, &subject, &clip, &result)?;
        beamclip_util::save_mesh(&out.with_extension("mesh.svg"), &mesh)?;
    }
    outcome
}

fn check_result(expect: &Expectation, result: &Polygon, mesh: &Mesh) -> Result<(), Failed> {
    check(
        "contour count",
        expect.contours.map(|c| c as f64),
        result.contours.len() as f64,
    )?;
    check(
        "hole count",
        expect.holes.map(|c| c as f64),
        result.hole_count() as f64,
    )?;
    check("area", expect.area, result.area())?;

    // Every hole should wind the other way from the outer contours.
    for c in &result.contours {
        if c.is_hole != (c.signed_area() < 0.0) {
            return Err(format!("badly oriented contour {c:?}").into());
        }
    }

    check("mesh area", Some(result.area()), mesh.area())?;
    Ok(())
}
