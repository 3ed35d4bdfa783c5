use skelconf_core::profile::calibration::AutoBoneSettings;
use skelconf_core::profile::{load_config, save_config, YamlStore};
use skelconf_core::{BoneNode, KeyedStore, OffsetParam, RawValue, SkeletonConfig, ToggleParam, ValueParam};
use tempfile::tempdir;

#[test]
fn missing_profile_loads_defaults() {
    let dir = tempdir().unwrap();
    let cfg = load_config(dir.path().join("absent.yaml"), true).unwrap();
    assert!(cfg.overrides().is_empty());
    assert_eq!(cfg.offset(OffsetParam::Chest), 0.32);
}

#[test]
fn saved_profile_reloads_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("profile.yaml");

    let mut cfg = SkeletonConfig::new(true);
    cfg.set_offset_auto(OffsetParam::ShouldersWidth, Some(0.41));
    cfg.set_toggle(ToggleParam::ForceArmsFromHmd, Some(true));
    cfg.set_value(ValueParam::KneeTrackerAnkleAveraging, Some(0.7));
    save_config(&cfg, &path).unwrap();

    let back = load_config(&path, true).unwrap();
    for p in OffsetParam::ALL {
        assert_eq!(back.offset(p), cfg.offset(p), "{p:?}");
    }
    for p in ToggleParam::ALL {
        assert_eq!(back.toggle(p), cfg.toggle(p), "{p:?}");
    }
    for p in ValueParam::ALL {
        assert_eq!(back.value(p), cfg.value(p), "{p:?}");
    }
    assert_eq!(back.node_offsets(), cfg.node_offsets());
    assert_eq!(back.node_offset(BoneNode::LeftShoulder).x, -0.205);
}

#[test]
fn saving_keeps_unrelated_sections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("profile.yaml");
    std::fs::write(&path, "server:\n  port: 6969\nautobone:\n  numEpochs: 12\n").unwrap();

    save_config(&SkeletonConfig::new(false), &path).unwrap();

    let store = YamlStore::load(&path).unwrap();
    assert_eq!(store.get("server.port"), Some(RawValue::I64(6969)));
    assert_eq!(store.get("body.hipsWidth"), Some(RawValue::F64(0.26)));
    assert_eq!(AutoBoneSettings::load(&store).unwrap().num_epochs, 12);
}

#[test]
fn unreadable_profile_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "body: {hipsWidth: [").unwrap();
    assert!(load_config(&path, true).is_err());
}
