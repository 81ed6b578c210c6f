//! Integration tests for namespace access over synthetic containers.

use ndarray::{arr1, arr2, Array2, Array3};
use sofa::container::MemContainer;
use sofa::core::{NamespaceKind, NamespaceSpec};
use sofa::prelude::*;

/// Minimal layout: one receiver position and a listener description.
fn minimal() -> Sofa {
    let container = MemContainer::new("minimal")
        .with_dataset("ReceiverPosition", NdArray::from(arr2(&[[0.0, 0.0, 0.0]])))
        .with_attribute("ListenerDescription", "test listener");
    Sofa::from_container(Box::new(container))
}

/// Complete SimpleFreeFieldHRIR-like layout with 2 measurements,
/// 2 receivers and 8 samples.
fn hrir() -> MemContainer {
    let globals = [
        ("Conventions", "SOFA"),
        ("Version", "1.0"),
        ("SOFAConventions", "SimpleFreeFieldHRIR"),
        ("SOFAConventionsVersion", "1.0"),
        ("DataType", "FIR"),
        ("RoomType", "free field"),
        ("Title", "synthetic"),
        ("DateCreated", "2024-01-01 00:00:00"),
        ("DateModified", "2024-01-01 00:00:00"),
        ("APIName", "sofa-rs"),
        ("APIVersion", "0.1"),
        ("AuthorContact", "nobody@example.org"),
        ("Organization", "none"),
        ("License", "CC BY 4.0"),
        ("Comment", "generated for tests"),
    ];
    let mut ir = Array3::<f64>::zeros((2, 2, 8));
    ir[[0, 0, 0]] = 1.0;
    ir[[1, 1, 3]] = 0.5;

    let mut container = MemContainer::new("hrir.sofa");
    for (name, value) in globals {
        container = container.with_attribute(name, value);
    }
    container
        .with_attribute("ListenerShortName", "KEMAR")
        .with_dataset("ListenerPosition", NdArray::from(arr2(&[[0.0, 0.0, 0.0]])))
        .with_variable_attribute("ListenerPosition", "Type", "cartesian")
        .with_variable_attribute("ListenerPosition", "Units", "metre")
        .with_dataset("ListenerView", NdArray::from(arr2(&[[1.0, 0.0, 0.0]])))
        .with_dataset("ListenerUp", NdArray::from(arr2(&[[0.0, 0.0, 1.0]])))
        .with_dataset(
            "ReceiverPosition",
            NdArray::from(Array3::<f64>::zeros((2, 3, 1))),
        )
        .with_variable_attribute("ReceiverPosition", "Type", "cartesian")
        .with_variable_attribute("ReceiverPosition", "Units", "metre")
        .with_dataset(
            "SourcePosition",
            NdArray::from(arr2(&[[0.0, 0.0, 1.2], [90.0, 0.0, 1.2]])),
        )
        .with_variable_attribute("SourcePosition", "Type", "spherical")
        .with_variable_attribute("SourcePosition", "Units", "degree, degree, metre")
        .with_dataset("Data.IR", NdArray::from(ir))
        .with_dataset("Data.Delay", NdArray::from(Array2::<f64>::zeros((1, 2))))
        .with_dataset("Data.SamplingRate", NdArray::from(arr1(&[48000.0])))
        .with_variable_attribute("Data.SamplingRate", "Units", "hertz")
}

fn open_hrir() -> Sofa {
    Sofa::from_container(Box::new(hrir()))
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_minimal_end_to_end() {
    let sofa = minimal();

    let position = sofa.get("Receiver", "Position").expect("ReceiverPosition");
    assert_eq!(
        position,
        Value::Array(NdArray::from(arr2(&[[0.0, 0.0, 0.0]])))
    );

    let description = sofa.get("Listener", "Description").expect("ListenerDescription");
    assert_eq!(description, Value::from("test listener"));

    match sofa.get("Emitter", "Position") {
        Err(Error::NotFound { key }) => assert_eq!(key, "EmitterPosition"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_typed_getters_match_generic() {
    let sofa = minimal();
    assert_eq!(sofa.listener().description().unwrap(), "test listener");
    assert_eq!(
        sofa.receiver().position().unwrap(),
        NdArray::from(arr2(&[[0.0, 0.0, 0.0]]))
    );
    assert!(sofa.emitter().position().unwrap_err().is_not_found());
    assert!(sofa.receiver().description().unwrap_err().is_not_found());
}

#[test]
fn test_field_equals_direct_key_read() {
    let container = hrir();
    let sofa = Sofa::from_container(Box::new(container.clone()));

    for ns in sofa.convention().namespaces() {
        for field in ns.fields {
            let key = ns.key(field);
            let direct = container
                .dataset(&key)
                .unwrap()
                .or_else(|| container.attribute(&key).unwrap());
            match (sofa.get(ns.name, field), direct) {
                (Ok(value), Some(expected)) => assert_eq!(value, expected, "{}", key),
                (Err(e), None) => assert!(e.is_not_found(), "{}: {}", key, e),
                (got, expected) => panic!("{}: got {:?}, stored {:?}", key, got, expected),
            }
        }
    }
}

#[test]
fn test_dataset_wins_over_attribute() {
    let container = MemContainer::new("both")
        .with_dataset("SourceView", NdArray::from(arr2(&[[1.0, 0.0, 0.0]])))
        .with_attribute("SourceView", "shadowed");
    let sofa = Sofa::from_container(Box::new(container));
    assert!(sofa.get("Source", "View").unwrap().as_array().is_some());
    assert_eq!(sofa.attribute_text("SourceView").unwrap(), "shadowed");
}

#[test]
fn test_data_namespace_uses_dot() {
    let sofa = open_hrir();
    assert_eq!(sofa.data().namespace().key("IR"), "Data.IR");
    let rate = sofa.get("Data", "SamplingRate").unwrap();
    assert_eq!(rate.as_f64(), Some(48000.0));
    // the dotless key does not exist
    assert!(sofa.lookup("DataSamplingRate").unwrap_err().is_not_found());
    assert!(sofa.lookup("Data.SamplingRate").is_ok());
}

#[test]
fn test_get_path() {
    let sofa = open_hrir();
    assert_eq!(
        sofa.get_path("Listener.ShortName").unwrap(),
        Value::from("KEMAR")
    );
    assert_eq!(
        sofa.get_path("Data.SamplingRate").unwrap(),
        sofa.get("Data", "SamplingRate").unwrap()
    );
    assert!(sofa.get_path("Listener").unwrap_err().is_not_found());
    assert!(sofa.get_path(".Position").unwrap_err().is_not_found());
}

#[test]
fn test_variable_attribute_fields() {
    let sofa = open_hrir();
    assert_eq!(
        sofa.get("Source", "Position_Units").unwrap(),
        Value::from("degree, degree, metre")
    );
    assert_eq!(
        sofa.get("Data", "SamplingRate_Units").unwrap(),
        Value::from("hertz")
    );
    assert_eq!(
        sofa.variable_attribute("ListenerPosition", "Type").unwrap(),
        Value::from("cartesian")
    );
    match sofa.get("Emitter", "Position_Units") {
        Err(Error::NotFound { key }) => assert_eq!(key, "EmitterPosition_Units"),
        other => panic!("expected NotFound, got {:?}", other),
    }
    match sofa.variable_attribute("ListenerPosition", "Scale") {
        Err(Error::NotFound { key }) => assert_eq!(key, "ListenerPosition_Scale"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_unregistered_namespace() {
    let container = MemContainer::new("custom")
        .with_attribute("MicrophoneModel", "omni")
        .with_dataset("MicrophoneGain", NdArray::from(arr1(&[1.0, 0.5])));
    let sofa = Sofa::from_container(Box::new(container));

    assert_eq!(sofa.get("Microphone", "Model").unwrap(), Value::from("omni"));
    let mic = sofa.namespace("Microphone");
    assert_eq!(mic.array("Gain").unwrap().shape(), &[2]);
    assert_eq!(mic.fields().unwrap(), vec!["Gain".to_string(), "Model".to_string()]);
    assert!(mic.has("Model").unwrap());
    assert!(!mic.has("Position").unwrap());
}

#[test]
fn test_custom_convention_namespace() {
    let convention = Convention::sofa().with_namespace(NamespaceSpec {
        name: "Microphone",
        separator: ":",
        kind: NamespaceKind::Other,
        fields: &["Model"],
    });
    let container = MemContainer::new("custom").with_attribute("Microphone:Model", "omni");
    let sofa = Sofa::with_convention(Box::new(container), convention);
    assert_eq!(sofa.get("Microphone", "Model").unwrap(), Value::from("omni"));
}

#[test]
fn test_idempotent_access() {
    let sofa = open_hrir();
    let first = sofa.data().ir().unwrap();
    for _ in 0..3 {
        assert_eq!(sofa.data().ir().unwrap(), first);
    }
    let a = sofa.get("Listener", "ShortName").unwrap();
    let b = sofa.get("Listener", "ShortName").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_failed_lookup_keeps_handle_usable() {
    let sofa = open_hrir();
    let err = sofa.get("Listener", "Missing").unwrap_err();
    assert_eq!(err.to_string(), sofa.get("Listener", "Missing").unwrap_err().to_string());
    assert!(sofa.is_open());
    assert!(sofa.listener().position().is_ok());
}

// ============================================================================
// Typed readers
// ============================================================================

#[test]
fn test_audio_object_read() {
    let sofa = open_hrir();

    let listener = sofa.listener().read().unwrap();
    assert_eq!(listener.name, "Listener");
    assert_eq!(listener.len(), 1);
    assert_eq!(listener.position_type, "cartesian");
    assert_eq!(listener.position_units, "metre");
    assert!(listener.view.is_some());
    assert!(listener.up.is_some());
    assert_eq!(listener.description, None);
    assert_eq!(listener.to_string(), "1 Listener");

    let source = sofa.source().read().unwrap();
    assert!(source.is_spherical());
    assert_eq!(source.to_string(), "2 Source");

    // receiver positions are [R, C, I]
    let receiver = sofa.receiver().read().unwrap();
    assert_eq!(receiver.position.shape(), &[2, 3, 1]);

    assert!(sofa.emitter().read().unwrap_err().is_not_found());
}

#[test]
fn test_fir() {
    let sofa = open_hrir();
    let fir = sofa.data().fir().unwrap();
    assert_eq!(fir.num_measurements(), 2);
    assert_eq!(fir.num_receivers(), 2);
    assert_eq!(fir.num_samples(), 8);
    assert_eq!(fir.sampling_rate_hz(), Some(48000.0));
    assert_eq!(fir.sampling_rate_units, "hertz");
    assert_eq!(fir.ir.to_f64()[[1, 1, 3]], 0.5);
    assert_eq!(fir.delay.shape(), &[1, 2]);
}

#[test]
fn test_room() {
    let sofa = open_hrir();
    assert_eq!(sofa.room().room_type().unwrap(), "free field");
    assert_eq!(sofa.get("Room", "Type").unwrap(), Value::from("free field"));
    assert!(sofa.room().description().unwrap_err().is_not_found());
}

#[test]
fn test_globals() {
    let sofa = open_hrir();
    let globals = sofa.globals().unwrap();
    assert_eq!(globals.sofa_conventions, "SimpleFreeFieldHRIR");
    assert_eq!(globals.data_type, "FIR");
    assert_eq!(globals.comment.as_deref(), Some("generated for tests"));
    assert_eq!(globals.history, None);

    match minimal().globals() {
        Err(Error::NotFound { key }) => assert_eq!(key, "Conventions"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_check_report() {
    let report = open_hrir().check().unwrap();
    assert!(report.is_complete());
    assert_eq!(report.datatype.as_deref(), Some("FIR"));

    let report = minimal().check().unwrap();
    assert!(!report.is_complete());
    assert_eq!(report.missing_required.len(), 14);
    assert_eq!(report.datatype, None);
    assert!(!report.datatype_supported);
}

// ============================================================================
// Datatype gating
// ============================================================================

#[test]
fn test_unsupported_datatype() {
    let container = hrir().with_attribute("DataType", "TF");
    let sofa = Sofa::from_container(Box::new(container));

    for result in [
        sofa.get("Data", "IR").map(|_| ()),
        sofa.data().sampling_rate().map(|_| ()),
        sofa.data().fir().map(|_| ()),
        sofa.get_path("Data.Delay").map(|_| ()),
    ] {
        assert!(matches!(result, Err(Error::UnsupportedDatatype(_))), "{:?}", result);
    }

    // other namespaces are unaffected
    assert!(sofa.listener().position().is_ok());
    let report = sofa.check().unwrap();
    assert_eq!(report.datatype.as_deref(), Some("TF"));
    assert!(!report.datatype_supported);
}

#[test]
fn test_raw_key_readers_are_gated() {
    let container = hrir().with_attribute("DataType", "TF");
    let sofa = Sofa::from_container(Box::new(container));

    assert!(matches!(sofa.lookup("Data.IR"), Err(Error::UnsupportedDatatype(_))));
    assert!(matches!(
        sofa.variable_attribute("Data.SamplingRate", "Units"),
        Err(Error::UnsupportedDatatype(_))
    ));

    // keys outside the data namespace still read
    assert!(sofa.lookup("ListenerPosition").is_ok());
    assert_eq!(sofa.attribute_text("DataType").unwrap(), "TF");
    assert_eq!(sofa.globals().unwrap().data_type, "TF");
    assert_eq!(sofa.dataset_shape("Data.IR").unwrap(), vec![2, 2, 8]);
}

#[test]
fn test_missing_datatype_resolves_generically() {
    let container = MemContainer::new("no-datatype")
        .with_dataset("Data.Real", NdArray::from(Array3::<f64>::zeros((1, 2, 4))));
    let sofa = Sofa::from_container(Box::new(container));
    assert_eq!(sofa.datatype().unwrap(), None);
    assert!(sofa.get("Data", "Real").is_ok());
    assert!(sofa.data().ir().unwrap_err().is_not_found());
}

#[test]
fn test_extra_datatype() {
    let convention = Convention::sofa().with_datatype("FIR-E");
    let container = hrir().with_attribute("DataType", "FIR-E");
    let sofa = Sofa::with_convention(Box::new(container), convention);
    assert!(sofa.data().ir().is_ok());
}

// ============================================================================
// Shape policy
// ============================================================================

#[test]
fn test_shape_mismatch_only_in_typed_getters() {
    let container = MemContainer::new("bad-shape")
        .with_dataset("ListenerPosition", NdArray::from(arr1(&[0.0, 0.0, 0.0])))
        .with_dataset("SourcePosition", NdArray::from(arr2(&[[0.0, 0.0]])));
    let sofa = Sofa::from_container(Box::new(container));

    // generic access passes the stored shape through
    let raw = sofa.get("Listener", "Position").unwrap();
    assert_eq!(raw.as_array().map(|a| a.shape().to_vec()), Some(vec![3]));

    match sofa.listener().position() {
        Err(Error::ShapeMismatch { key, actual, .. }) => {
            assert_eq!(key, "ListenerPosition");
            assert_eq!(actual, vec![3]);
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
    assert!(matches!(
        sofa.source().position(),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_type_mismatch() {
    let container = MemContainer::new("bad-type")
        .with_attribute("ListenerPosition", "origin")
        .with_dataset("ListenerDescription", NdArray::from(arr1(&[1.0])));
    let sofa = Sofa::from_container(Box::new(container));
    assert!(matches!(
        sofa.listener().position(),
        Err(Error::TypeMismatch { expected: "array", .. })
    ));
    assert!(matches!(
        sofa.listener().description(),
        Err(Error::TypeMismatch { expected: "text", .. })
    ));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_close_then_access() {
    let sofa = open_hrir();
    assert!(sofa.is_open());
    assert!(sofa.close());
    assert!(!sofa.is_open());

    assert!(matches!(sofa.get("Listener", "Position"), Err(Error::UseAfterClose)));
    assert!(matches!(sofa.data().fir(), Err(Error::UseAfterClose)));
    assert!(matches!(sofa.attribute("Title"), Err(Error::UseAfterClose)));
    assert!(matches!(sofa.dataset_names(), Err(Error::UseAfterClose)));
    assert!(matches!(sofa.globals(), Err(Error::UseAfterClose)));
    assert!(matches!(sofa.check(), Err(Error::UseAfterClose)));
}

#[test]
fn test_double_close() {
    let sofa = open_hrir();
    assert!(sofa.close());
    assert!(!sofa.close());
    assert!(!sofa.close());
    assert!(matches!(sofa.lookup("Data.IR"), Err(Error::UseAfterClose)));
}

#[test]
fn test_view_outlives_close() {
    let sofa = open_hrir();
    let receiver = sofa.receiver();
    assert!(receiver.position().is_ok());
    sofa.close();
    assert!(matches!(receiver.position(), Err(Error::UseAfterClose)));
}

#[test]
fn test_shared_readers() {
    let sofa = open_hrir();
    let expected = sofa.data().ir().unwrap();
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                assert_eq!(sofa.data().ir().unwrap(), expected);
                assert_eq!(sofa.source().read().unwrap().len(), 2);
            });
        }
    });
}

#[test]
fn test_debug_shows_state() {
    let sofa = minimal();
    let debug = format!("{:?}", sofa);
    assert!(debug.contains("minimal"));
    assert!(debug.contains("open: true"));
    sofa.close();
    assert!(format!("{:?}", sofa).contains("open: false"));
}
