//! Every render program must parse and validate as WGSL, and the constants
//! the CPU mirrors rely on must agree with the shader side.

use tinsel::attributes::SNOW_EXTENT;
use tinsel::morph::{FOLIAGE_STAGGER, SPIRAL_STAGGER};
use tinsel::shader::ShaderProgram;
use tinsel::systems::{BREATH_AMPLITUDE, EDGE_FADE, FALL_SPEED, FLOAT_AMPLITUDE, SPIRAL_BREATH};

fn validate_wgsl(code: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(code).map_err(|e| format!("WGSL parse error: {:?}", e))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(module)
}

#[test]
fn test_all_programs_validate() {
    for program in ShaderProgram::ALL {
        if let Err(e) = validate_wgsl(&program.source()) {
            panic!("{} failed: {}", program.label(), e);
        }
    }
}

#[test]
fn test_programs_have_both_entry_points() {
    for program in ShaderProgram::ALL {
        let module = validate_wgsl(&program.source()).unwrap();
        let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"vs_main"), "{} lacks vs_main", program.label());
        assert!(names.contains(&"fs_main"), "{} lacks fs_main", program.label());
    }
}

#[test]
fn test_point_programs_read_the_shared_layout() {
    for program in [ShaderProgram::Foliage, ShaderProgram::Spiral, ShaderProgram::Snow] {
        let module = validate_wgsl(&program.source()).unwrap();
        let vs = module
            .entry_points
            .iter()
            .find(|e| e.name == "vs_main")
            .unwrap();
        // vertex_index plus the six-attribute point struct.
        assert_eq!(vs.function.arguments.len(), 2, "{}", program.label());
    }
}

fn f32_constant(module: &naga::Module, name: &str) -> f32 {
    let (_, constant) = module
        .constants
        .iter()
        .find(|(_, c)| c.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no WGSL constant named {name}"));
    match module.global_expressions[constant.init] {
        naga::Expression::Literal(naga::Literal::F32(value)) => value,
        ref other => panic!("{name} is not an f32 literal: {other:?}"),
    }
}

#[test]
fn test_stagger_matches_cpu_mirror() {
    let foliage = validate_wgsl(&ShaderProgram::Foliage.source()).unwrap();
    let spiral = validate_wgsl(&ShaderProgram::Spiral.source()).unwrap();
    assert_eq!(f32_constant(&foliage, "FOLIAGE_STAGGER"), FOLIAGE_STAGGER);
    assert_eq!(f32_constant(&spiral, "SPIRAL_STAGGER"), SPIRAL_STAGGER);
}

#[test]
fn test_breathing_matches_cpu_mirror() {
    let foliage = validate_wgsl(&ShaderProgram::Foliage.source()).unwrap();
    let spiral = validate_wgsl(&ShaderProgram::Spiral.source()).unwrap();
    assert_eq!(f32_constant(&foliage, "BREATH_AMPLITUDE"), BREATH_AMPLITUDE);
    assert_eq!(f32_constant(&foliage, "FLOAT_AMPLITUDE"), FLOAT_AMPLITUDE);
    assert_eq!(f32_constant(&spiral, "SPIRAL_BREATH"), SPIRAL_BREATH);
}

#[test]
fn test_snow_box_matches_cpu_mirror() {
    let snow = validate_wgsl(&ShaderProgram::Snow.source()).unwrap();
    assert_eq!(f32_constant(&snow, "SNOW_HEIGHT"), SNOW_EXTENT);
    assert_eq!(f32_constant(&snow, "FALL_SPEED"), FALL_SPEED);
    assert_eq!(f32_constant(&snow, "EDGE_FADE"), EDGE_FADE);
}

#[test]
fn test_point_programs_stagger_through_shared_helpers() {
    for (program, stagger) in [
        (ShaderProgram::Foliage, "FOLIAGE_STAGGER"),
        (ShaderProgram::Spiral, "SPIRAL_STAGGER"),
    ] {
        let src = program.source();
        let call = format!("ease_in_out_cubic(local_progress(progress, point.seed, {stagger}))");
        assert!(src.contains(&call), "{} does not ease its staggered progress", program.label());
    }
}
