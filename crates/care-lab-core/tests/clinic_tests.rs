//! Clinic workflow integration tests.

use chrono::{NaiveDate, NaiveDateTime};

use care_lab_core::admin::{LabPriceDraft, PriceDraft, TestDraft};
use care_lab_core::intake::TestSelection;
use care_lab_core::models::{Container, CostBreakdown, TestParameter};
use care_lab_core::store::StoreError;
use care_lab_core::{
    Clinic, ClinicError, Collection, CostPolicy, Lab, LabConfig, LabTest, NewPatient, PatientEdit,
    PriceEntry, Sex, Store,
};

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S").unwrap()
}

fn price(key: &str, matriz: f64, sigma: f64) -> PriceEntry {
    let mut entry = PriceEntry::for_test(key);
    entry.costs.matriz = CostBreakdown {
        manufacturing: 10.0,
        materials: 5.0,
        shipping: 2.0,
    };
    entry.costs.sigma = CostBreakdown {
        manufacturing: 8.0,
        materials: 3.0,
        shipping: 1.0,
    };
    entry.public_price_matriz = matriz;
    entry.public_price_sigma = sigma;
    entry
}

fn setup() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    store
        .replace_tests(&[
            LabTest::quantitative("T1".into(), "Glucosa".into(), "mg/dL".into(), "70-110".into()),
            LabTest::quantitative("T2".into(), "Creatinina".into(), "mg/dL".into(), "0.7-1.3".into()),
            LabTest::multi_parameter(
                "BH".into(),
                "Biometría hemática".into(),
                vec![TestParameter {
                    key: "HB".into(),
                    name: "Hemoglobina".into(),
                    unit: "g/dL".into(),
                    normal_range: "12-16".into(),
                }],
            ),
        ])
        .unwrap();
    store
        .replace_prices(&[price("T1", 100.0, 150.0), price("T2", 180.0, 200.0)])
        .unwrap();
    (dir, store)
}

fn new_patient(name: &str, tests: Vec<TestSelection>) -> NewPatient {
    NewPatient {
        name: name.to_string(),
        birth_date: Some("1985-03-10".to_string()),
        manual_age: None,
        sex: Sex::Female,
        diagnosis: "Control".to_string(),
        physician: "Dr. Ruiz".to_string(),
        tests,
    }
}

#[test]
fn test_folios_follow_daily_sequence() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);

    let mut folios = Vec::new();
    for i in 0..4 {
        let patient = clinic
            .register_patient(new_patient(&format!("P{}", i), vec![]), at("2025-06-01", "09:00:00"))
            .unwrap();
        folios.push(patient.folio);
    }
    assert_eq!(folios, vec!["250601001", "250601002", "250601003", "250601004"]);

    let next_day = clinic
        .register_patient(new_patient("Q", vec![]), at("2025-06-02", "08:00:00"))
        .unwrap();
    assert_eq!(next_day.folio, "250602001");
}

#[test]
fn test_deleted_folio_is_not_reused() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);
    let now = at("2025-06-01", "09:00:00");

    clinic.register_patient(new_patient("A", vec![]), now).unwrap();
    clinic.register_patient(new_patient("B", vec![]), now).unwrap();
    clinic.delete_patient("250601001").unwrap();

    let c = clinic.register_patient(new_patient("C", vec![]), now).unwrap();
    assert_eq!(c.folio, "250601003");
}

#[test]
fn test_registration_snapshots_prices_and_age() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);

    let patient = clinic
        .register_patient(
            new_patient(
                "Ana",
                vec![TestSelection::new("T1", Lab::Matriz), TestSelection::new("T2", Lab::Sigma)],
            ),
            at("2025-03-09", "10:00:00"),
        )
        .unwrap();

    // birthday is tomorrow
    assert_eq!(patient.age, 39);
    assert_eq!(patient.registered_at, "2025-03-09 10:00:00");
    assert_eq!(patient.tests[0].price, 100.0);
    assert_eq!(patient.tests[1].price, 200.0);

    // later catalog edits do not change the order
    store.upsert_price(&price("T1", 999.0, 999.0)).unwrap();
    let stored = clinic.patient(&patient.folio).unwrap();
    assert_eq!(stored.tests[0].price, 100.0);
}

#[test]
fn test_registration_with_unknown_test_is_rejected() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);

    let err = clinic
        .register_patient(
            new_patient("Ana", vec![TestSelection::new("NOPE", Lab::Matriz)]),
            at("2025-06-01", "09:00:00"),
        )
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(clinic.list_patients().unwrap().is_empty());
}

#[test]
fn test_worked_summary_example() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);

    let patient = clinic
        .register_patient(
            new_patient(
                "Ana",
                vec![TestSelection::new("T1", Lab::Matriz), TestSelection::new("T2", Lab::Sigma)],
            ),
            at("2025-06-01", "09:00:00"),
        )
        .unwrap();

    let summary = clinic.summary(&patient.folio).unwrap();
    let costs = summary.costs;
    assert_eq!(summary.policy, CostPolicy::BothLabs);
    assert_eq!(costs.subtotal, 300.0);
    assert_eq!(costs.manufacturing_matriz, 20.0);
    assert_eq!(costs.manufacturing_sigma, 16.0);
    assert_eq!(costs.total_manufacturing, 36.0);
    assert_eq!(costs.materials, 16.0);
    assert_eq!(costs.shipping, 6.0);
    assert_eq!(costs.margin, 242.0);
    assert_eq!(costs.tax, 48.0);
    assert_eq!(costs.total, 348.0);

    assert_eq!(summary.lines.len(), 2);
    assert_eq!(summary.lines[1].lab, Lab::Sigma);
    assert_eq!(summary.lines[1].list_price, Some(200.0));
}

#[test]
fn test_assigned_lab_policy_summary() {
    let (_dir, store) = setup();
    let config = LabConfig {
        cost_policy: CostPolicy::AssignedLab,
        ..LabConfig::default()
    };
    let clinic = Clinic::new(&store, &config);

    let patient = clinic
        .register_patient(
            new_patient(
                "Ana",
                vec![TestSelection::new("T1", Lab::Matriz), TestSelection::new("T2", Lab::Sigma)],
            ),
            at("2025-06-01", "09:00:00"),
        )
        .unwrap();

    let costs = clinic.summary(&patient.folio).unwrap().costs;
    assert_eq!(costs.manufacturing_matriz, 10.0);
    assert_eq!(costs.manufacturing_sigma, 8.0);
    assert_eq!(costs.materials, 8.0);
    assert_eq!(costs.shipping, 3.0);
    assert_eq!(costs.margin, 300.0 - 29.0);
}

#[test]
fn test_delete_patient_removes_results() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);
    let now = at("2025-06-01", "09:00:00");

    let keep = clinic
        .register_patient(new_patient("Keep", vec![TestSelection::new("T1", Lab::Matriz)]), now)
        .unwrap();
    let gone = clinic
        .register_patient(new_patient("Gone", vec![TestSelection::new("T1", Lab::Matriz)]), now)
        .unwrap();
    clinic.record_result(&keep.folio, "T1", "90", now).unwrap();
    clinic.record_result(&gone.folio, "T1", "95", now).unwrap();
    clinic.record_result(&gone.folio, "HB", "13", now).unwrap();

    clinic.delete_patient(&gone.folio).unwrap();

    assert!(matches!(
        clinic.patient(&gone.folio),
        Err(ClinicError::PatientNotFound(_))
    ));
    assert!(matches!(
        clinic.results(&gone.folio),
        Err(ClinicError::PatientNotFound(_))
    ));
    assert!(store.results_for(&gone.folio).unwrap().is_empty());
    assert!(store.get_result(&gone.folio, "T1").unwrap().is_none());
    assert_eq!(store.results_for(&keep.folio).unwrap().len(), 1);
}

#[test]
fn test_edit_adding_present_test_is_noop() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);

    let patient = clinic
        .register_patient(
            new_patient("Ana", vec![TestSelection::new("T1", Lab::Matriz)]),
            at("2025-06-01", "09:00:00"),
        )
        .unwrap();

    let edit = PatientEdit {
        add_tests: vec![
            TestSelection::new("T1", Lab::Sigma),
            TestSelection::new("T2", Lab::Matriz),
        ],
        ..PatientEdit::default()
    };
    let edited = clinic
        .edit_patient(&patient.folio, edit, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
        .unwrap();

    let keys: Vec<&str> = edited.tests.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["T1", "T2"]);
    // the existing T1 keeps its lab and price
    assert_eq!(edited.tests[0].processed_at, Lab::Matriz);
    assert_eq!(edited.tests[0].price, 100.0);
}

#[test]
fn test_edit_updates_personal_data() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);

    let patient = clinic
        .register_patient(new_patient("Ana", vec![]), at("2025-06-01", "09:00:00"))
        .unwrap();

    let edit = PatientEdit {
        name: Some("Ana María".to_string()),
        manual_age: Some("41".to_string()),
        physician: Some("Dra. Vega".to_string()),
        ..PatientEdit::default()
    };
    let edited = clinic
        .edit_patient(&patient.folio, edit, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
        .unwrap();
    assert_eq!(edited.name, "Ana María");
    assert_eq!(edited.age, 41);
    assert!(edited.birth_date.is_none());
    assert_eq!(edited.physician, "Dra. Vega");
    assert_eq!(edited.diagnosis, "Control");
}

#[test]
fn test_result_for_parameter_copies_reference() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);
    let now = at("2025-06-01", "09:00:00");

    let patient = clinic
        .register_patient(new_patient("Ana", vec![TestSelection::new("BH", Lab::Matriz)]), now)
        .unwrap();

    let result = clinic.record_result(&patient.folio, "HB", "11.2", now).unwrap();
    assert_eq!(result.name, "Hemoglobina");
    assert_eq!(result.unit, "g/dL");
    assert_eq!(result.normal_range, "12-16");

    // a second entry overwrites the first
    clinic.record_result(&patient.folio, "HB", "12.5", now).unwrap();
    let results = clinic.results(&patient.folio).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].value, "12.5");

    let err = clinic
        .record_result(&patient.folio, "XX", "1", now)
        .unwrap_err();
    assert!(matches!(err, ClinicError::TestNotFound(_)));
}

#[test]
fn test_report_lists_pending_tests() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);
    let now = at("2025-06-01", "09:00:00");

    let patient = clinic
        .register_patient(
            new_patient(
                "Ana",
                vec![TestSelection::new("T1", Lab::Matriz), TestSelection::new("T2", Lab::Matriz)],
            ),
            now,
        )
        .unwrap();
    clinic.record_result(&patient.folio, "T1", "150", now).unwrap();

    let report = clinic.report(&patient.folio, now.date()).unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.out_of_range_count(), 1);
    assert_eq!(report.pending, vec!["Creatinina".to_string()]);
    assert_eq!(report.printed_on, "01/06/2025");
}

#[test]
fn test_test_batch_skips_only_malformed_entry() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);

    let draft = |key: &str, container: &str| TestDraft {
        key: key.to_string(),
        name: format!("Prueba {}", key),
        sample_type: "Suero".to_string(),
        container_id: container.to_string(),
        unit: "mg/dL".to_string(),
        normal_range: "1-2".to_string(),
    };
    let outcome = clinic
        .save_test_batch(&[draft("A", "1"), draft("B", "dos"), draft("C", "3")])
        .unwrap();

    assert_eq!(outcome.saved, 2);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].key, "B");
    let keys: Vec<String> = store.list_tests().unwrap().into_iter().map(|t| t.key).collect();
    assert_eq!(keys, vec!["A", "C"]);
}

#[test]
fn test_price_batch_skips_only_malformed_entry() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);

    let lab = |manufacturing: &str| LabPriceDraft {
        manufacturing: manufacturing.to_string(),
        materials: "5".to_string(),
        shipping: "".to_string(),
        profit_pct: "50".to_string(),
        public_price: "100".to_string(),
        validated: "on".to_string(),
    };
    let drafts = vec![
        PriceDraft {
            id: "T1".to_string(),
            matriz: lab("10"),
            sigma: lab("20"),
        },
        PriceDraft {
            id: "T2".to_string(),
            matriz: lab("diez"),
            sigma: lab("20"),
        },
    ];
    let outcome = clinic.save_price_batch(&drafts).unwrap();

    assert_eq!(outcome.saved, 1);
    assert_eq!(outcome.skipped[0].key, "T2");
    let prices = store.price_catalog().unwrap();
    let t1 = prices.for_test("T1").unwrap();
    assert_eq!(t1.suggested_price(Lab::Matriz), 22.5);
    assert_eq!(t1.suggested_price(Lab::Sigma), 37.5);
    assert!(t1.is_validated(Lab::Sigma));
    assert!(prices.for_test("T2").is_none());
}

#[test]
fn test_hand_edited_patient_survives_registration() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);
    std::fs::write(
        store.path_of(Collection::Patients),
        r#"[{"folio": "250601001", "nombre": "Legado", "edad": "35", "sexo": "M",
            "fecha_registro": "2025-06-01 08:00:00", "pruebas": []}]"#,
    )
    .unwrap();

    let patient = clinic
        .register_patient(new_patient("Ana", vec![]), at("2025-06-01", "09:00:00"))
        .unwrap();
    assert_eq!(patient.folio, "250601002");

    let legacy = clinic.patient("250601001").unwrap();
    assert_eq!(legacy.name, "Legado");
    assert_eq!(legacy.age, 35);
    assert_eq!(clinic.list_patients().unwrap().len(), 2);
}

#[test]
fn test_unreadable_patient_record_blocks_registration() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);
    let path = store.path_of(Collection::Patients);
    let original = r#"[{"folio": "250601001", "nombre": "Sin sexo", "fecha_registro": ""}]"#;
    std::fs::write(&path, original).unwrap();

    let err = clinic
        .register_patient(new_patient("Ana", vec![]), at("2025-06-01", "09:00:00"))
        .unwrap_err();
    assert!(matches!(err, ClinicError::Store(StoreError::Malformed { .. })));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_parameter_results_complete_ordered_panel() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);
    let now = at("2025-06-01", "09:00:00");

    let patient = clinic
        .register_patient(
            new_patient(
                "Ana",
                vec![TestSelection::new("BH", Lab::Matriz), TestSelection::new("T1", Lab::Matriz)],
            ),
            now,
        )
        .unwrap();
    let report = clinic.report(&patient.folio, now.date()).unwrap();
    assert_eq!(report.pending, vec!["Biometría hemática".to_string(), "Glucosa".to_string()]);

    clinic.record_result(&patient.folio, "HB", "13", now).unwrap();
    let report = clinic.report(&patient.folio, now.date()).unwrap();
    assert_eq!(report.pending, vec!["Glucosa".to_string()]);
}

#[test]
fn test_upsert_test_and_price() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);

    let panel = LabTest::multi_parameter(
        "QS".into(),
        "Química sanguínea".into(),
        vec![TestParameter {
            key: "UREA".into(),
            name: "Urea".into(),
            unit: "mg/dL".into(),
            normal_range: "15-45".into(),
        }],
    );
    clinic.upsert_test(&panel).unwrap();
    assert_eq!(store.get_test("QS").unwrap().unwrap(), panel);
    assert_eq!(clinic.list_tests().unwrap().len(), 4);

    let blank = LabTest::quantitative(" ".into(), "Sin clave".into(), String::new(), String::new());
    assert!(matches!(
        clinic.upsert_test(&blank).unwrap_err(),
        ClinicError::InvalidInput(_)
    ));

    let mut entry = price("QS", 300.0, 320.0);
    entry.set_profit_pct(Lab::Matriz, 100.0);
    clinic.upsert_price(&entry).unwrap();
    let saved = store.price_catalog().unwrap().for_test("QS").cloned().unwrap();
    assert_eq!(saved.suggested_price(Lab::Matriz), 34.0);

    let err = clinic.upsert_price(&price("NOPE", 1.0, 1.0)).unwrap_err();
    assert!(matches!(err, ClinicError::TestNotFound(ref key) if key == "NOPE"));
    assert!(store.price_catalog().unwrap().for_test("NOPE").is_none());
}

#[test]
fn test_save_containers_rejects_duplicate_ids() {
    let (_dir, store) = setup();
    let config = LabConfig::default();
    let clinic = Clinic::new(&store, &config);
    let container = |id: i64, name: &str| Container {
        id,
        name: name.to_string(),
    };

    clinic
        .save_containers(&[container(1, "Tubo rojo"), container(2, "Tubo lila")])
        .unwrap();
    assert_eq!(clinic.list_containers().unwrap().len(), 2);

    let err = clinic
        .save_containers(&[container(1, "Tubo rojo"), container(1, "Frasco")])
        .unwrap_err();
    assert!(matches!(err, ClinicError::InvalidInput(_)));
    assert_eq!(clinic.list_containers().unwrap()[1].name, "Tubo lila");
}
