//! Loads a mesh, labels its connected shells and prints one frame's draw order.
//!
//! Usage:
//! ```text
//! cargo run --example inspect -- model.obj
//! cargo run --example inspect -- model.stl --depth-sort --legacy
//! ```
//!
//! Without a path a small built-in OBJ with two separate quads is used.

use std::process::ExitCode;

use facekit::display::{fit_scale, Camera};
use facekit::io::{load_faces, parse_obj};
use facekit::math::Vector3;
use facekit::operations::{AdjacencyRule, DepthOrder, DepthOrderParams, LabelComponents};
use facekit::FaceCollection;

const BUILTIN: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 2
v 1 0 2
v 1 1 2
v 0 1 2
vn 0 0 1
f 1//1 2//1 3//1 4//1
f 5 6 7 8
";

fn main() -> ExitCode {
    // Default: WARN for everything, INFO for facekit.
    // Override with RUST_LOG env var (e.g. RUST_LOG=facekit=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("facekit=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let depth_sort = args.iter().any(|a| a == "--depth-sort");
    let rule = if args.iter().any(|a| a == "--legacy") {
        AdjacencyRule::Legacy
    } else {
        AdjacencyRule::SharedEdge
    };
    let path = args.iter().find(|a| !a.starts_with("--"));

    let loaded = match path {
        Some(path) => load_faces(path),
        None => parse_obj(BUILTIN),
    };
    let mut faces: FaceCollection = match loaded {
        Ok(faces) => faces,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let labels = LabelComponents::new(rule).execute(&faces);
    faces.apply_labels(&labels);
    println!("faces: {}", faces.len());
    println!("components: {}", labels.component_count());
    for label in 1..=labels.component_count() {
        println!("  {label}: {:?}", labels.members(label));
    }
    match fit_scale(&faces) {
        Some(scale) => println!("fit scale: {scale:.4}"),
        None => println!("fit scale: n/a"),
    }

    let mut camera = Camera::new();
    camera.rotate_by(&Vector3::new(1.0, 1.0, 0.0), 30.0);
    let params = DepthOrderParams {
        depth_sort,
        ..DepthOrderParams::default()
    };
    let order = DepthOrder::new(camera.view_matrix(), params).execute(&faces);
    println!("draw order:");
    for entry in &order {
        let mark = if entry.visible { "" } else { " (culled)" };
        println!("  face {}{mark}", entry.index);
    }
    ExitCode::SUCCESS
}
