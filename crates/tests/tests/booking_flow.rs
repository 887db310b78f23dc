use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::Path;

use charter_core::{CatalogStage, Field, ProductLine, Step, VesselKind};
use charter_desk::{BookingDesk, DeskSettings, LinkOpener};
use charter_observability::DeskMetrics;
use serde_json::json;
use tempfile::TempDir;

#[derive(Default)]
struct Recorder {
    links: RefCell<Vec<String>>,
}

impl LinkOpener for Recorder {
    fn open(&self, link: &str) -> io::Result<()> {
        self.links.borrow_mut().push(link.to_string());
        Ok(())
    }
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("asset has a parent")).unwrap();
    fs::write(path, b"\x89PNG").unwrap();
}

fn asset_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for relative in [
        "Sunday Kinga/boat2.png",
        "Sunday Kinga/boat1.png",
        "Sunday Kinga/boat.png",
        "Sunday Kinga/m-interior1.jpg",
        "Sunday Kinga/m-interior1.jpg",
        "Helia 44 Catamaran/boat1.png",
        "Helia 44 Catamaran/s-interior2.jpg",
        "Vaatea catamaran/u-interior3.jpg",
        "Vaatea catamaran/u-interior1.jpg",
        "Black Bird Heli/heli1.jpg",
        "Black Bird Heli/heli2.jpg",
        "Umoja/readme.txt",
        "Umoja/logo.png",
        "stray-boat1.png",
    ] {
        touch(dir.path(), relative);
    }
    dir
}

fn desk_for(dir: &TempDir) -> BookingDesk {
    let settings = DeskSettings {
        assets_root: dir.path().to_path_buf(),
        ..DeskSettings::default()
    };
    BookingDesk::from_settings(&settings, DeskMetrics::shared()).expect("desk should load")
}

fn fill_guest(desk_session: &mut charter_desk::BookingSession) {
    let wizard = desk_session.wizard_mut();
    wizard.set_name("Jane Doe");
    wizard.set_phone("255711111111");
    wizard.set_date("2025-06-01");
    wizard.set_passengers("4");
}

#[test]
fn asset_tree_becomes_a_sorted_catalog() {
    let dir = asset_tree();
    let desk = desk_for(&dir);
    let catalog = desk.catalog();

    let ids = catalog
        .vessels()
        .iter()
        .map(|vessel| vessel.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["black-bird-heli", "helia-44", "sunday-kinga", "vaatea"]);

    let kinga = catalog.find("sunday-kinga").unwrap();
    assert_eq!(kinga.thumbnail, "Sunday Kinga/boat1.png");
    assert_eq!(
        kinga.exterior,
        vec![
            "Sunday Kinga/boat1.png",
            "Sunday Kinga/boat2.png",
            "Sunday Kinga/boat.png"
        ]
    );
    assert_eq!(kinga.interior.len(), 1);

    let vaatea = catalog.find("vaatea").unwrap();
    assert!(vaatea.exterior.is_empty());
    assert!(vaatea.interior.contains(&vaatea.thumbnail));
    assert_eq!(
        vaatea.interior,
        vec!["Vaatea catamaran/u-interior1.jpg", "Vaatea catamaran/u-interior3.jpg"]
    );

    assert_eq!(catalog.find("black-bird-heli").unwrap().kind, VesselKind::Helicopter);
    assert_eq!(catalog.find("helia-44").unwrap().kind, VesselKind::Catamaran);
    assert!(catalog.find("umoja").is_none());

    for vessel in catalog.vessels() {
        if !vessel.exterior.is_empty() {
            assert!(vessel.exterior.contains(&vessel.thumbnail), "{}", vessel.id);
        }
    }
}

#[test]
fn yacht_booking_end_to_end() {
    let dir = asset_tree();
    let desk = desk_for(&dir);
    let mut session = desk.start_session(None);

    session.wizard_mut().set_phone("123456789");
    let errors = session.next().unwrap_err();
    assert!(errors.get(Field::Phone).is_some());
    assert_eq!(session.step(), Step::GuestDetails);

    fill_guest(&mut session);
    assert_eq!(
        session.next().unwrap(),
        Step::CatalogConfig {
            stage: CatalogStage::Browsing
        }
    );

    session.select_vessel("sunday-kinga").unwrap();
    session.select_tier("22 Max Catamaran").unwrap();
    assert_eq!(
        session
            .select_charter("Zanzibar Charter", "Full Day Cruise")
            .unwrap(),
        "$2,400"
    );
    {
        let wizard = session.wizard_mut();
        wizard.select_destination("Stone Town").unwrap();
        wizard.toggle_food("Fresh Lobster", true);
        wizard.toggle_drink("Cocktails", true);
        wizard.set_dj(true);
    }
    assert_eq!(session.next().unwrap(), Step::PersonalRequest);

    session.wizard_mut().set_allergies("");
    session.wizard_mut().set_special_occasion("Anniversary");
    assert_eq!(
        session.next().unwrap(),
        Step::Summary {
            product: ProductLine::Yacht
        }
    );

    let summary = session.summary();
    assert_eq!(summary.voyage.price.as_deref(), Some("$2,400"));

    let recorder = Recorder::default();
    let dispatch = session.submit(&recorder).unwrap();
    assert!(dispatch.message.contains("$2,400"));
    assert!(dispatch.message.contains("DJ Service: Yes"));
    assert!(dispatch.message.contains("Anniversary"));
    assert!(!dispatch.message.contains("Allergies:"));
    assert!(dispatch
        .link
        .starts_with("https://wa.me/255711942057?text="));
    assert_eq!(recorder.links.borrow().len(), 1);

    let snapshot = desk.metrics().snapshot();
    assert_eq!(snapshot.dispatches_total, 1);
    assert_eq!(snapshot.transitions_total, 3);
    assert_eq!(snapshot.validation_failures_total, 3);
}

#[test]
fn helicopter_preselection_goes_straight_to_summary() {
    let dir = asset_tree();
    let desk = desk_for(&dir);
    let mut session = desk.start_session(Some("black-bird-heli"));
    fill_guest(&mut session);

    assert_eq!(
        session.next().unwrap(),
        Step::CatalogConfig {
            stage: CatalogStage::Configuring(ProductLine::Helicopter)
        }
    );
    session
        .select_helicopter_service("Zanzibar Heli Charter", "Island Scenic Flight (30 Minutes)")
        .unwrap();
    assert_eq!(
        session.next().unwrap(),
        Step::Summary {
            product: ProductLine::Helicopter
        }
    );

    let dispatch = session.submit(&Recorder::default()).unwrap();
    assert!(dispatch.message.contains("Zanzibar - Abeid Amani Karume Airport"));
    assert!(dispatch.message.contains("$950"));
    assert!(!dispatch.message.contains("DJ Service"));
}

#[test]
fn back_from_summary_clears_the_vessel() {
    let dir = asset_tree();
    let desk = desk_for(&dir);
    let mut session = desk.start_session(Some("black-bird-heli"));
    fill_guest(&mut session);
    session.next().unwrap();
    session
        .select_helicopter_service("Dar Heli Charter", "Scenic City Flight (20 Minutes)")
        .unwrap();
    session.next().unwrap();

    assert_eq!(
        session.back(),
        Step::CatalogConfig {
            stage: CatalogStage::Browsing
        }
    );
    assert!(session.wizard().draft().vessel.is_none());
    assert!(session.wizard().draft().charter.is_empty());
    assert_eq!(session.back(), Step::GuestDetails);
}

#[test]
fn manifest_and_config_files_override_the_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("vessels.json");
    fs::write(
        &manifest,
        json!({
            "vessels": [
                {
                    "id": "ocean-star",
                    "name": "OCEAN STAR",
                    "exterior": ["/Ocean Star/boat1.png", "/Ocean Star/boat2.png"],
                    "thumbnail": "/Ocean Star/boat2.png"
                }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let config = dir.path().join("charter.json");
    fs::write(
        &config,
        json!({
            "deep_link_base": "https://wa.me/15550001111",
            "destinations": [{ "value": "marina", "label": "City Marina" }]
        })
        .to_string(),
    )
    .unwrap();

    let settings = DeskSettings {
        assets_root: dir.path().join("missing"),
        manifest: Some(manifest),
        config_file: Some(config),
        deep_link_base: None,
    };
    let desk = BookingDesk::from_settings(&settings, DeskMetrics::shared()).unwrap();
    assert_eq!(desk.catalog().len(), 1);
    assert_eq!(desk.catalog().vessels()[0].thumbnail, "/Ocean Star/boat2.png");
    assert_eq!(desk.config().destination_label("marina"), "City Marina");
    assert_eq!(desk.config().food_options.len(), 6);

    let mut session = desk.start_session(Some("ocean-star"));
    fill_guest(&mut session);
    session.next().unwrap();
    session.select_tier("20 Max Catamaran").unwrap();
    session.select_charter("Dar Yacht Charter", "Half Day Charter").unwrap();
    session.wizard_mut().select_destination("marina").unwrap();
    session.wizard_mut().toggle_food("BBQ Selection", true);
    session.wizard_mut().toggle_drink("Fresh Juices", true);
    session.next().unwrap();
    session.next().unwrap();

    let dispatch = session.submit(&Recorder::default()).unwrap();
    assert!(dispatch.link.starts_with("https://wa.me/15550001111?text="));
    assert!(dispatch.message.contains("City Marina"));
    assert!(dispatch.message.contains("DJ Service: No"));
}

#[test]
fn bad_sources_fail_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let settings = DeskSettings {
        assets_root: dir.path().join("missing"),
        ..DeskSettings::default()
    };
    let error = BookingDesk::from_settings(&settings, DeskMetrics::shared())
        .err()
        .expect("missing asset root should fail");
    assert!(format!("{error:#}").contains("failed scanning assets"));

    let tree = asset_tree();
    let settings = DeskSettings {
        assets_root: tree.path().to_path_buf(),
        deep_link_base: Some("ftp://example.com".to_string()),
        ..DeskSettings::default()
    };
    assert!(BookingDesk::from_settings(&settings, DeskMetrics::shared()).is_err());
}
