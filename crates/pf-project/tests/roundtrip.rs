use pf_arch::element::{Batteries, DcBus, Motor, Propeller};
use pf_arch::{Architecture, ElectricalLayer, MechanicalLayer, ThrustLayer};
use pf_project::schema::*;
use pf_project::{load_json, load_yaml, save_json, save_yaml};

fn electric_case() -> CaseFile {
    CaseFile {
        version: 1,
        name: "Electric single".to_string(),
        description: Some("one motor lane".to_string()),
        architecture: Architecture::new(
            ThrustLayer::new(vec![Propeller::named("prop")]),
            MechanicalLayer::default().with_motors(Motor::default()),
        )
        .with_electric(
            ElectricalLayer::default()
                .with_dc_bus(DcBus::default())
                .with_batteries(Batteries::default()),
        ),
        runs: vec![RunDef {
            name: "cruise".to_string(),
            num_nodes: 2,
            density_kg_per_m3: PointValues::Scalar(1.0),
            airspeed_m_per_s: PointValues::Series(vec![80.0, 90.0]),
            rpm: Some(PointValues::Scalar(1900.0)),
            throttle: PointValues::Scalar(0.6),
            propulsor_active: PointValues::Scalar(1.0),
            duration_s: 60.0,
        }],
        solver: Some(SolverDef {
            max_iterations: Some(20),
            ..SolverDef::default()
        }),
    }
}

#[test]
fn roundtrip_yaml() {
    let case = electric_case();
    let path = std::env::temp_dir().join("pf_project_roundtrip.yaml");
    save_yaml(&path, &case).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(case, loaded);
}

#[test]
fn roundtrip_json() {
    let case = electric_case();
    let path = std::env::temp_dir().join("pf_project_roundtrip.json");
    save_json(&path, &case).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(case, loaded);
    assert_eq!(pf_project::load(&path).unwrap(), case);
}

#[test]
fn invalid_case_is_not_saved() {
    let mut case = electric_case();
    case.runs[0].num_nodes = 0;
    let path = std::env::temp_dir().join("pf_project_invalid.yaml");
    assert!(save_yaml(&path, &case).is_err());
}

#[test]
fn defaults_fill_missing_run_fields() {
    let yaml = r#"
version: 1
name: minimal
architecture:
  thrust:
    propellers: [{}]
  mech:
    engines: {}
runs:
  - name: point
    num_nodes: 1
"#;
    let case: CaseFile = serde_yaml::from_str(yaml).unwrap();
    let run = &case.runs[0];
    assert_eq!(run.density_kg_per_m3, PointValues::Scalar(1.225));
    assert_eq!(run.throttle, PointValues::Scalar(1.0));
    assert_eq!(run.duration_s, 1.0);
    pf_project::validate_case(&case).unwrap();

    let outcome = pf_project::run_one(&case, run).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["run"], "point");
    assert!(json["fuel_flow_kg_per_s"][0].as_f64().unwrap() > 0.0);
}
