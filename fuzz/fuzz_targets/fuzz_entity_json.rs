#![no_main]

use std::path::PathBuf;
use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use modeldex::domain::value_objects::Fingerprint;
use modeldex::infrastructure::discovery::EntityFile;
use modeldex::infrastructure::load_entity;
use modeldex::Layer;
use tempfile::TempDir;

fn workspace() -> &'static TempDir {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| tempfile::tempdir().expect("temp dir"))
}

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = Fingerprint::from_definition(&value);
    }

    // The loader must report, never panic, on any file content
    let base = workspace().path();
    let root = base.join("Stage");
    let path: PathBuf = root.join("Sales").join("Customer").join("Customer.json");
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    std::fs::write(&path, data).expect("write definition");

    let file = EntityFile {
        path,
        layer: Layer::Stage,
        layer_root: root,
    };
    let _ = load_entity(&file, base);
});
