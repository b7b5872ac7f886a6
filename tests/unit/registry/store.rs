use super::*;
use crate::foundation::core::{Canvas, Fps};
use crate::schema::field::Field;

struct Blank;

impl Animation for Blank {
    type Config = serde_json::Value;

    fn schema(&self) -> Schema {
        Schema::new().field(Field::number("fontSize").default(40.0))
    }

    fn render(&self, _ctx: &RenderCtx, _config: &Self::Config) -> Scene {
        Scene::new()
    }
}

fn entry(id: &str, name: &str, category: Option<&str>) -> RegistryEntry {
    let e = RegistryEntry::new(id, name, Blank);
    match category {
        Some(c) => e.category(c),
        None => e,
    }
}

#[test]
fn register_then_get_returns_entry() {
    let mut reg = AnimationRegistry::new();
    reg.register(entry("fade", "Fade", Some("text")));
    let e = reg.get("fade").unwrap();
    assert_eq!(e.name, "Fade");
    assert_eq!(e.default_props, serde_json::json!({ "fontSize": 40.0 }));
    assert!(reg.get("missing").is_none());
}

#[test]
fn duplicate_id_replaces_in_place() {
    let mut reg = AnimationRegistry::new();
    reg.register(entry("a", "A", None));
    reg.register(entry("b", "B", None));
    reg.register(entry("a", "A2", None));
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.ids(), vec!["a", "b"]);
    assert_eq!(reg.get("a").unwrap().name, "A2");
}

#[test]
fn snapshot_is_unaffected_by_later_registration() {
    let mut reg = AnimationRegistry::new();
    reg.register(entry("a", "A", None));
    let snap = reg.all();
    reg.register(entry("b", "B", None));
    assert_eq!(snap.len(), 1);
    assert_eq!(reg.all().len(), 2);
}

#[test]
fn by_category_is_exact_and_skips_uncategorized() {
    let mut reg = AnimationRegistry::new();
    reg.register(entry("a", "A", Some("text")));
    reg.register(entry("b", "B", None));
    reg.register(entry("c", "C", Some("Text")));
    reg.register(entry("d", "D", Some("text")));

    let ids: Vec<_> = reg.by_category("text").iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d"]);
    assert!(reg.by_category("").is_empty());
    assert!(reg.by_category("shapes").is_empty());
    assert_eq!(reg.categories(), vec!["text", "Text"]);
}

#[test]
fn preview_validates_props() {
    let e = entry("a", "A", None);
    let ctx = RenderCtx {
        frame: 0,
        duration_frames: 10,
        fps: Fps::new(30, 1).unwrap(),
        canvas: Canvas {
            width: 8,
            height: 8,
        },
    };
    assert!(e.preview(&ctx, &serde_json::json!({})).is_ok());
    assert!(e.preview(&ctx, &serde_json::json!({ "fontSize": "big" })).is_err());
}
